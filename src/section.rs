//! Configuration section tree
//!
//! Every section corresponds to one path segment. A section may own a
//! [`Node`] (its payload) and any number of named child sections, kept in
//! insertion order. Lookup matches segments case-insensitively, preferring
//! an exact match when one exists.
//!
//! Building is tolerant of node order: intermediate segments that have not
//! been seen yet are created as empty, node-less containers and filled in if
//! their defining node shows up later.

mod scalar;

use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;

pub use scalar::FromScalar;

use crate::node::{Node, SEPARATOR};

/// A point in the configuration tree
#[derive(Debug, Clone, Default)]
pub struct ConfigSection {
    path: String,
    node: Option<Node>,
    children: IndexMap<String, ConfigSection>,
}

/// Case-insensitive segment comparison
fn segment_eq(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}{SEPARATOR}{segment}")
    }
}

/// Split a path into (parent segments, last segment)
fn split_last(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path.split(SEPARATOR).collect();
    let last = segments.pop().unwrap_or_default();
    (segments, last)
}

impl ConfigSection {
    /// Create an empty root section
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a section owning `node`
    #[must_use]
    pub fn with_node(node: Node) -> Self {
        Self {
            path: node.path().to_string(),
            node: Some(node),
            children: IndexMap::new(),
        }
    }

    /// Build a fresh tree from a flat node list
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut root = Self::new();
        root.build_from_nodes(nodes);
        root
    }

    /// Dotted path of this section, empty for the root
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The node owned by this section, if any
    #[must_use]
    pub fn own_node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Direct children in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigSection)> {
        self.children.iter().map(|(key, section)| (key.as_str(), section))
    }

    /// Number of direct children
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when there are no direct children
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn child_index(&self, segment: &str) -> Option<usize> {
        self.children.get_index_of(segment).or_else(|| {
            self.children
                .keys()
                .position(|key| segment_eq(key, segment))
        })
    }

    fn child(&self, segment: &str) -> Option<&ConfigSection> {
        self.child_index(segment)
            .and_then(|idx| self.children.get_index(idx))
            .map(|(_, section)| section)
    }

    /// Walk `segments` from here, creating empty containers for missing ones
    fn vivify(&mut self, segments: &[&str]) -> &mut ConfigSection {
        let mut section = self;
        for segment in segments {
            let idx = match section.child_index(segment) {
                Some(idx) => idx,
                None => {
                    let child = ConfigSection {
                        path: join(&section.path, segment),
                        ..ConfigSection::default()
                    };
                    section.children.insert_full((*segment).to_string(), child).0
                }
            };
            section = &mut section.children[idx];
        }
        section
    }

    /// Find the section at `path`
    ///
    /// Each segment descends one level. Returns `None` as soon as a segment
    /// is missing; lookup never creates sections.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&ConfigSection> {
        path.split(SEPARATOR)
            .try_fold(self, |section, segment| section.child(segment))
    }

    /// Alias of [`ConfigSection::resolve`]
    #[must_use]
    pub fn section(&self, path: &str) -> Option<&ConfigSection> {
        self.resolve(path)
    }

    /// Mutable variant of [`ConfigSection::resolve`]
    pub fn resolve_mut(&mut self, path: &str) -> Option<&mut ConfigSection> {
        let mut section = self;
        for segment in path.split(SEPARATOR) {
            let idx = section.child_index(segment)?;
            section = &mut section.children[idx];
        }
        Some(section)
    }

    /// Whether `path` resolves to a section
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// The node at `path`, if the section exists and owns one
    #[must_use]
    pub fn node(&self, path: &str) -> Option<&Node> {
        self.resolve(path).and_then(|section| section.node.as_ref())
    }

    /// Mutable access to the node at `path`
    pub fn node_mut(&mut self, path: &str) -> Option<&mut Node> {
        self.resolve_mut(path).and_then(|section| section.node.as_mut())
    }

    /// Whether `path` is a section with no recorded values
    ///
    /// Children are not consulted; a node may have both.
    #[must_use]
    pub fn is_section(&self, path: &str) -> bool {
        self.resolve(path)
            .is_some_and(|section| section.node.as_ref().is_none_or(Node::is_container))
    }

    /// Nodes below this section in pre-order
    fn collect_nodes<'a>(&'a self, out: &mut Vec<&'a Node>) {
        for child in self.children.values() {
            if let Some(node) = &child.node {
                out.push(node);
            }
            child.collect_nodes(out);
        }
    }

    /// Flatten the tree into nodes
    ///
    /// Pre-order: each child's own node, then its descendants, children in
    /// insertion order. Sections without a node contribute only their
    /// descendants.
    #[must_use]
    pub fn flatten(&self) -> Vec<Node> {
        let mut nodes = Vec::new();
        self.collect_nodes(&mut nodes);
        nodes.into_iter().cloned().collect()
    }

    /// Keys below this section, relative to it
    ///
    /// With `deep == false` only the first segment of each relative path is
    /// kept. Keys are de-duplicated in first-seen order.
    #[must_use]
    pub fn keys(&self, deep: bool) -> IndexSet<String> {
        let prefix = if self.path.is_empty() {
            None
        } else {
            Some(format!("{}{SEPARATOR}", self.path))
        };

        let mut nodes = Vec::new();
        self.collect_nodes(&mut nodes);

        let mut keys = IndexSet::new();
        for node in nodes {
            let path = node.path();
            let relative = match &prefix {
                Some(prefix)
                    if path.len() > prefix.len()
                        && path.is_char_boundary(prefix.len())
                        && segment_eq(&path[..prefix.len()], prefix) =>
                {
                    &path[prefix.len()..]
                }
                _ => path,
            };

            let key = if deep {
                relative
            } else {
                relative.split(SEPARATOR).next().unwrap_or(relative)
            };

            if !keys.contains(key) {
                keys.insert(key.to_string());
            }
        }
        keys
    }

    /// Attach `section` under its node's path
    ///
    /// Missing intermediate sections are created. An existing child with the
    /// same key is replaced in place. Returns `false` (and attaches nothing)
    /// when `section` owns no node, since there is no path to attach it at.
    pub fn create_section(&mut self, section: ConfigSection) -> bool {
        let Some(node) = &section.node else {
            return false;
        };
        let path = node.path().to_string();
        let (parents, last) = split_last(&path);

        let parent = self.vivify(&parents);
        parent.children.insert(last.to_string(), section);
        true
    }

    /// Attach every node under its path, in input order
    ///
    /// A node whose section already exists (created as an intermediate or by
    /// a duplicate path) replaces that section's node and keeps its
    /// children.
    pub fn build_from_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            let path = node.path().to_string();
            let (parents, last) = split_last(&path);

            let parent = self.vivify(&parents);
            match parent.children.get_mut(last) {
                Some(existing) => {
                    existing.path = node.path().to_string();
                    existing.node = Some(node);
                }
                None => {
                    parent
                        .children
                        .insert(last.to_string(), ConfigSection::with_node(node));
                }
            }
        }
    }

    /// Set the values at `path`, creating the section if needed
    pub fn set<I, S>(&mut self, path: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<&str> = path.split(SEPARATOR).collect();
        let section = self.vivify(&segments);
        let own_path = section.path.clone();
        section
            .node
            .get_or_insert_with(|| Node::container(own_path))
            .set_values(values);
    }

    /// Detach the section at `path`, keeping sibling order
    pub fn remove(&mut self, path: &str) -> Option<ConfigSection> {
        let (parent, last) = match path.rsplit_once(SEPARATOR) {
            Some((parent_path, last)) => (self.resolve_mut(parent_path)?, last),
            None => (self, path),
        };
        let idx = parent.child_index(last)?;
        parent.children.shift_remove_index(idx).map(|(_, section)| section)
    }

    /// Parse the first value at `path` as `T`
    ///
    /// `None` when the path is missing, has no values or does not parse.
    #[must_use]
    pub fn get<T: FromScalar>(&self, path: &str) -> Option<T> {
        self.node(path)
            .and_then(Node::first)
            .and_then(T::from_scalar)
    }

    /// Parse the first value at `path`, falling back to `default`
    #[must_use]
    pub fn get_or<T: FromScalar>(&self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    /// Integer at `path`, or 0
    #[must_use]
    pub fn get_int(&self, path: &str) -> i32 {
        self.get_int_or(path, 0)
    }

    /// Integer at `path`, or `default`
    #[must_use]
    pub fn get_int_or(&self, path: &str, default: i32) -> i32 {
        self.get_or(path, default)
    }

    /// Short integer at `path`, or 0
    #[must_use]
    pub fn get_short(&self, path: &str) -> i16 {
        self.get_short_or(path, 0)
    }

    /// Short integer at `path`, or `default`
    #[must_use]
    pub fn get_short_or(&self, path: &str, default: i16) -> i16 {
        self.get_or(path, default)
    }

    /// Boolean at `path`, or `false`
    #[must_use]
    pub fn get_bool(&self, path: &str) -> bool {
        self.get_bool_or(path, false)
    }

    /// Boolean at `path`, or `default` when it has no value
    ///
    /// Any stored text other than `true` reads as `false`.
    #[must_use]
    pub fn get_bool_or(&self, path: &str, default: bool) -> bool {
        self.get_or(path, default)
    }

    /// Double at `path`, or 0.0
    #[must_use]
    pub fn get_double(&self, path: &str) -> f64 {
        self.get_double_or(path, 0.0)
    }

    /// Double at `path`, or `default`
    #[must_use]
    pub fn get_double_or(&self, path: &str, default: f64) -> f64 {
        self.get_or(path, default)
    }

    /// Float at `path`, or 0.0
    #[must_use]
    pub fn get_float(&self, path: &str) -> f32 {
        self.get_float_or(path, 0.0)
    }

    /// Float at `path`, or `default`
    #[must_use]
    pub fn get_float_or(&self, path: &str, default: f32) -> f32 {
        self.get_or(path, default)
    }

    /// Decimal at `path`, or zero
    #[must_use]
    pub fn get_decimal(&self, path: &str) -> Decimal {
        self.get_decimal_or(path, Decimal::ZERO)
    }

    /// Decimal at `path`, or `default`
    #[must_use]
    pub fn get_decimal_or(&self, path: &str, default: Decimal) -> Decimal {
        self.get_or(path, default)
    }

    /// First string at `path`, or an empty string
    #[must_use]
    pub fn get_string(&self, path: &str) -> String {
        self.get_string_or(path, "")
    }

    /// First string at `path`, or `default`
    #[must_use]
    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.get(path).unwrap_or_else(|| default.to_string())
    }

    /// Every value at `path`, empty when missing
    #[must_use]
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.node(path)
            .map(|node| node.values().to_vec())
            .unwrap_or_default()
    }
}
