//! Default merging
//!
//! # Merging Semantics
//!
//! - **Engagement**: by default the merge only runs when nothing was loaded
//!   (missing, empty or unparsable user file). [`MergeMode::Always`] runs it
//!   regardless.
//! - **Order**: the result follows the defaults document, node for node.
//! - **User values win**: a default whose path is already loaded is replaced
//!   by the loaded node, values and all.
//! - **Ignored paths**: defaults matching the ignore set are not copied.
//!   A loaded node is never dropped because it matches the ignore set.
//!
//! Merging a list that already holds every non-ignored default path returns
//! it unchanged, so the merge is idempotent.

use std::collections::HashMap;

use tracing::debug;

use crate::node::Node;

/// When the merge engages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Only when the loaded list is empty
    #[default]
    WhenEmpty,
    /// Every time; loaded nodes unknown to the defaults are appended last
    Always,
}

/// Paths excluded from being copied in from defaults
///
/// A path is ignored when it equals an entry ignoring ASCII case, or when it
/// contains an entry as a substring. Containment is case-sensitive: `Worlds`
/// ignores `Core.Worlds.Main` but `worlds` does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    entries: Vec<String>,
}

impl IgnoreSet {
    /// Create an empty ignore set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether `path` is ignored
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| path.contains(entry.as_str()) || path.eq_ignore_ascii_case(entry))
    }

    /// True when there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Reconciles loaded nodes against a defaults document
#[derive(Debug, Clone, Default)]
pub struct DefaultMerger {
    mode: MergeMode,
}

impl DefaultMerger {
    /// Create a merger with the given engagement mode
    #[must_use]
    pub const fn new(mode: MergeMode) -> Self {
        Self { mode }
    }

    /// Engagement mode
    #[must_use]
    pub const fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Whether a merge of `loaded` against `defaults` would do anything
    #[must_use]
    pub fn engages(&self, loaded: &[Node], defaults: &[Node]) -> bool {
        if defaults.is_empty() {
            return false;
        }
        match self.mode {
            MergeMode::WhenEmpty => loaded.is_empty(),
            MergeMode::Always => true,
        }
    }

    /// Merge `loaded` with `defaults`
    ///
    /// Returns `loaded` untouched when the merge does not engage.
    #[must_use]
    pub fn merge(&self, loaded: Vec<Node>, defaults: Vec<Node>, ignore: &IgnoreSet) -> Vec<Node> {
        if !self.engages(&loaded, &defaults) {
            debug!(loaded = loaded.len(), "Default merge not engaged");
            return loaded;
        }

        let mut by_path: HashMap<String, Node> = HashMap::with_capacity(loaded.len());
        let mut loaded_order = Vec::with_capacity(loaded.len());
        for node in loaded {
            loaded_order.push(node.path().to_string());
            by_path.entry(node.path().to_string()).or_insert(node);
        }

        let mut merged = Vec::with_capacity(defaults.len());
        let mut copied = 0usize;
        let mut skipped = 0usize;

        for default in defaults {
            if let Some(user) = by_path.remove(default.path()) {
                merged.push(user);
            } else if ignore.matches(default.path()) {
                skipped += 1;
            } else {
                copied += 1;
                merged.push(default);
            }
        }

        if self.mode == MergeMode::Always {
            for path in loaded_order {
                if let Some(user) = by_path.remove(&path) {
                    merged.push(user);
                }
            }
        }

        debug!(copied, skipped, total = merged.len(), "Merged defaults");
        merged
    }
}
