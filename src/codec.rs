//! Decoder/encoder boundary
//!
//! A codec turns raw text into the flat, ordered node list the tree is built
//! from, and back. Decoders must emit a container's node before the nodes
//! of its descendants.

mod yaml;

use std::io::{Read, Write};

pub use yaml::YamlCodec;

use crate::error::Result;
use crate::node::Node;

/// Converts between a byte stream and flat nodes
pub trait NodeCodec {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Read every node from `reader`
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be read or parsed.
    fn decode(&self, reader: &mut dyn Read) -> Result<Vec<Node>>;

    /// Write `nodes` to `writer`
    ///
    /// # Errors
    ///
    /// Returns an error if the nodes cannot be represented or written.
    fn encode(&self, writer: &mut dyn Write, nodes: &[Node]) -> Result<()>;
}
