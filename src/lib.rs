//! # dotconf
//!
//! Hierarchical configuration trees addressed by dotted paths.
//!
//! A document is decoded into a flat, ordered list of [`Node`]s
//! (`Core.Server.Name = ["Alice"]`), optionally merged against a defaults
//! document, and built into a [`ConfigSection`] tree for lookup. Saving
//! flattens the tree back into nodes and hands them to a [`NodeCodec`].

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the dotconf library
pub mod error;

/// Flat dotted-path records
pub mod node;

/// The section tree and its query surface
pub mod section;

/// Reconciliation of loaded nodes against defaults
pub mod merge;

/// Decoder/encoder boundary and the YAML implementation
pub mod codec;

/// Load/merge/save orchestration
pub mod document;

pub use codec::{NodeCodec, YamlCodec};
pub use document::{ConfigDocument, LoadReport, Source, decode_only};
pub use error::{CodecError, DocumentError};
pub use merge::{DefaultMerger, IgnoreSet, MergeMode};
pub use node::Node;
pub use section::ConfigSection;
