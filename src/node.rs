//! Flat configuration records

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Path separator between segments
pub const SEPARATOR: char = '.';

/// A dotted path and its ordered string values
///
/// Two nodes are equal when their paths are equal; the values are not
/// compared. Merging relies on this to find "the same key" in two documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    path: String,
    #[serde(default)]
    values: Vec<String>,
}

impl Node {
    /// Create a node from a path and its values
    pub fn new<P, I, S>(path: P, values: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a container node with no values
    pub fn container(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            values: Vec::new(),
        }
    }

    /// Full dotted path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Ordered values
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// First value, if any
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Replace the values
    pub fn set_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
    }

    /// Path segments in order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(SEPARATOR)
    }

    /// Last path segment
    #[must_use]
    pub fn key(&self) -> &str {
        self.path.rsplit(SEPARATOR).next().unwrap_or(&self.path)
    }

    /// True when no values are recorded
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
