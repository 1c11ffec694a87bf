//! Load/merge/save orchestration
//!
//! A [`ConfigDocument`] binds a source, an optional defaults document and an
//! optional save destination. Loading decodes the source, seeds it from the
//! defaults when it came back empty, rebuilds the section tree and, when a
//! destination is bound, writes the result straight back.
//!
//! Nothing here is fatal: a missing or broken source decodes to no nodes,
//! and a failed save is reported as `false`.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec::{NodeCodec, YamlCodec};
use crate::error::DocumentError;
use crate::merge::{DefaultMerger, IgnoreSet, MergeMode};
use crate::node::Node;
use crate::section::ConfigSection;


/// Where a document is read from
pub enum Source {
    /// A file, opened for each load
    Path(PathBuf),
    /// An already open stream, consumed or released by the first load
    Reader(Box<dyn Read>),
}

impl Source {
    /// Wrap an open stream
    pub fn reader(reader: impl Read + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Take the source out of `slot` for one load
    ///
    /// Paths stay bound so the document can be reloaded; streams can only be
    /// read once and are removed.
    fn take(slot: &mut Option<Self>) -> Option<Self> {
        match slot {
            Some(Self::Path(path)) => Some(Self::Path(path.clone())),
            Some(Self::Reader(_)) => slot.take(),
            None => None,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Decode a source into nodes without merging or building a tree
///
/// Missing files, unreadable streams and parse failures all yield an empty
/// list. The stream is closed before this returns.
pub fn decode_only(source: Source, codec: &dyn NodeCodec) -> Vec<Node> {
    let mut reader: Box<dyn Read> = match source {
        Source::Path(path) => match File::open(&path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Source does not exist, treating as empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to open source");
                return Vec::new();
            }
        },
        Source::Reader(reader) => reader,
    };

    match codec.decode(&mut reader) {
        Ok(nodes) => {
            debug!(codec = codec.name(), nodes = nodes.len(), "Decoded source");
            nodes
        }
        Err(e) => {
            warn!(codec = codec.name(), error = %e, "Failed to decode source, treating as empty");
            Vec::new()
        }
    }
}

/// Outcome of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Nodes in the rebuilt tree
    pub nodes: usize,
    /// Whether defaults were merged in
    pub merged: bool,
    /// Save result, `None` when no destination is bound
    pub saved: Option<bool>,
}

/// A configuration tree bound to its source, defaults and destination
pub struct ConfigDocument {
    source: Option<Source>,
    defaults: Option<Source>,
    destination: Option<PathBuf>,
    codec: Box<dyn NodeCodec>,
    root: ConfigSection,
}

impl ConfigDocument {
    /// Create a document from optional source and defaults
    #[must_use]
    pub fn new(source: Option<Source>, defaults: Option<Source>) -> Self {
        Self {
            source,
            defaults,
            destination: None,
            codec: Box::new(YamlCodec::new()),
            root: ConfigSection::new(),
        }
    }

    /// Create a document for `file`, saved back to the same path on load
    pub fn from_paths(file: impl Into<PathBuf>, defaults: Option<PathBuf>) -> Self {
        let file = file.into();
        Self::new(Some(Source::Path(file.clone())), defaults.map(Source::Path))
            .with_destination(file)
    }

    /// Create a document from two open streams
    pub fn from_readers(file: impl Read + 'static, defaults: impl Read + 'static) -> Self {
        Self::new(Some(Source::reader(file)), Some(Source::reader(defaults)))
    }

    /// Save to `path` after every load
    #[must_use]
    pub fn with_destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    /// Use `codec` instead of YAML
    #[must_use]
    pub fn with_codec(mut self, codec: impl NodeCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Bound destination, if any
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// The section tree
    #[must_use]
    pub const fn root(&self) -> &ConfigSection {
        &self.root
    }

    /// Mutable access to the section tree
    pub fn root_mut(&mut self) -> &mut ConfigSection {
        &mut self.root
    }

    /// Load, copying defaults when the source is empty
    pub fn load(&mut self) -> LoadReport {
        self.load_with(true, &IgnoreSet::new())
    }

    /// Load, copying defaults only if `copy_defaults` is set
    pub fn load_defaults(&mut self, copy_defaults: bool) -> LoadReport {
        self.load_with(copy_defaults, &IgnoreSet::new())
    }

    /// Load, skipping defaults that match `ignore`
    ///
    /// The tree is replaced, not patched. Defaults are only read when
    /// `copy_defaults` is set and the source decoded to nothing.
    pub fn load_with(&mut self, copy_defaults: bool, ignore: &IgnoreSet) -> LoadReport {
        let loaded = Source::take(&mut self.source)
            .map(|source| decode_only(source, self.codec.as_ref()))
            .unwrap_or_default();

        let mut merged = false;
        let nodes = if copy_defaults && loaded.is_empty() {
            match Source::take(&mut self.defaults) {
                Some(defaults) => {
                    let defaults = decode_only(defaults, self.codec.as_ref());
                    let merger = DefaultMerger::new(MergeMode::WhenEmpty);
                    merged = merger.engages(&loaded, &defaults);
                    merger.merge(loaded, defaults, ignore)
                }
                None => loaded,
            }
        } else {
            loaded
        };

        // Streams are scoped to one load, read or not
        if matches!(self.defaults, Some(Source::Reader(_))) {
            self.defaults = None;
        }

        let count = nodes.len();
        self.root = ConfigSection::from_nodes(nodes);
        debug!(nodes = count, merged, "Loaded configuration");

        let saved = self.destination.as_deref().map(|dest| self.save(dest));

        LoadReport {
            nodes: count,
            merged,
            saved,
        }
    }

    /// Save the tree to `path`, creating it if needed
    ///
    /// Returns `false` on any failure; the cause is logged.
    pub fn save(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_save(path) {
            Ok(()) => {
                debug!(path = %path.display(), "Saved configuration");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to save configuration");
                false
            }
        }
    }

    /// Save the tree to `path`, reporting why it failed
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created, the tree cannot
    /// be encoded or the file cannot be written.
    pub fn try_save(&self, path: &Path) -> Result<(), DocumentError> {
        let create = |source| DocumentError::Create {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(create)?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(create)?;

        let mut buffer = Vec::new();
        self.codec
            .encode(&mut buffer, &self.root.flatten())
            .map_err(|source| DocumentError::Encode {
                path: path.to_path_buf(),
                source,
            })?;

        fs::write(path, buffer).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Encode the tree into `writer`
    pub fn save_to_writer(&self, writer: &mut dyn Write) -> bool {
        match self.codec.encode(writer, &self.root.flatten()) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to write configuration");
                false
            }
        }
    }
}

impl Deref for ConfigDocument {
    type Target = ConfigSection;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl DerefMut for ConfigDocument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CodecError, Result};
    use std::io::Cursor;
    use tempfile::TempDir;

    struct FailingCodec;

    impl NodeCodec for FailingCodec {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn decode(&self, _reader: &mut dyn Read) -> Result<Vec<Node>> {
            Err(CodecError::NotAMapping("a string"))
        }

        fn encode(&self, _writer: &mut dyn Write, _nodes: &[Node]) -> Result<()> {
            Err(CodecError::Unsupported {
                path: "A".to_string(),
                reason: "cannot encode".to_string(),
            })
        }
    }

    fn reader(text: &'static str) -> Source {
        Source::reader(Cursor::new(text))
    }

    #[test]
    fn test_load_without_source() {
        let mut doc = ConfigDocument::new(None, None);
        let report = doc.load();

        assert_eq!(report, LoadReport::default());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_load_source_only() {
        let mut doc = ConfigDocument::new(Some(reader("Core:\n  Name: Alice\n")), None);
        let report = doc.load();

        assert_eq!(report.nodes, 2);
        assert!(!report.merged);
        assert_eq!(report.saved, None);
        assert_eq!(doc.get_string("core.name"), "Alice");
    }

    #[test]
    fn test_defaults_seed_empty_source() {
        let mut doc = ConfigDocument::new(Some(reader("")), Some(reader("A: 1\nB: 2\n")));
        let report = doc.load();

        assert!(report.merged);
        assert_eq!(doc.get_string("A"), "1");
        assert_eq!(doc.get_int("B"), 2);
    }

    #[test]
    fn test_defaults_ignored_when_source_has_content() {
        let mut doc = ConfigDocument::from_readers(
            Cursor::new("A: user\n"),
            Cursor::new("A: default\nB: 2\n"),
        );
        let report = doc.load();

        assert!(!report.merged);
        assert_eq!(doc.get_string("A"), "user");
        assert!(!doc.contains("B"));
    }

    #[test]
    fn test_copy_defaults_disabled() {
        let mut doc = ConfigDocument::new(None, Some(reader("A: 1\n")));
        let report = doc.load_defaults(false);

        assert!(!report.merged);
        assert!(!doc.contains("A"));
    }

    #[test]
    fn test_ignore_applied_to_defaults() {
        let mut doc = ConfigDocument::new(
            None,
            Some(reader("Core:\n  Name: x\nWorlds:\n  Main: world\n")),
        );
        let ignore: IgnoreSet = ["Worlds"].into_iter().collect();
        doc.load_with(true, &ignore);

        assert!(doc.contains("Core.Name"));
        assert!(!doc.contains("Worlds"));
    }

    #[test]
    fn test_broken_source_degrades_to_defaults() {
        let mut doc = ConfigDocument::new(Some(reader("A: [broken")), Some(reader("A: 1\n")));
        let report = doc.load();

        assert!(report.merged);
        assert_eq!(doc.get_int("A"), 1);
    }

    #[test]
    fn test_reload_replaces_tree() {
        let mut doc = ConfigDocument::new(Some(reader("A: 1\n")), None);
        doc.load();
        doc.set("Extra", ["x"]);
        assert!(doc.contains("Extra"));

        // Stream sources are consumed by the first load
        let report = doc.load();
        assert_eq!(report.nodes, 0);
        assert!(!doc.contains("Extra"));
        assert!(!doc.contains("A"));
    }

    #[test]
    fn test_save_to_writer() {
        let mut doc = ConfigDocument::new(Some(reader("Core:\n  Name: Alice\n")), None);
        doc.load();

        let mut out = Vec::new();
        assert!(doc.save_to_writer(&mut out));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Core:"));
        assert!(text.contains("Name: Alice"));
    }

    #[test]
    fn test_source_debug() {
        assert_eq!(format!("{:?}", reader("")), "Reader(..)");
        assert!(format!("{:?}", Source::from(PathBuf::from("a.yml"))).contains("a.yml"));
    }

    #[test]
    fn test_custom_codec_failures_degrade() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.cfg");
        let mut doc = ConfigDocument::new(Some(reader("A: 1\n")), Some(reader("B: 2\n")))
            .with_codec(FailingCodec)
            .with_destination(dest.clone());
        assert_eq!(doc.destination(), Some(dest.as_path()));

        let report = doc.load();
        assert_eq!(report.nodes, 0);
        assert!(!report.merged);
        assert_eq!(report.saved, Some(false));
        assert!(doc.is_empty());

        doc.root_mut().set("A", ["1"]);
        assert_eq!(doc.root().get_int("A"), 1);
        assert!(!doc.save(&dest));
        assert!(!doc.save_to_writer(&mut Vec::new()));
    }

    #[test]
    fn test_unread_default_stream_released() {
        let mut doc = ConfigDocument::from_readers(Cursor::new("A: user\n"), Cursor::new("B: 2\n"));
        doc.load();

        assert!(doc.defaults.is_none());
        assert!(doc.source.is_none());
    }

    #[test]
    fn test_default_path_kept_for_reload() {
        let mut doc = ConfigDocument::new(
            Some(reader("A: user\n")),
            Some(Source::from(PathBuf::from("defaults.yml"))),
        );
        doc.load();

        assert!(matches!(doc.defaults, Some(Source::Path(_))));
    }
}
