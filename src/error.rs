//! Error types
//!
//! None of these escape the document API as hard failures: decode errors
//! degrade to an empty node list and save errors to `false`. They exist so
//! codecs can report what went wrong and the document can log it.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T, E = CodecError> = std::result::Result<T, E>;

/// Failures raised while decoding or encoding nodes
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading from or writing to the underlying stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML text could not be parsed or emitted
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// The top level of the document is not a mapping
    #[error("Document root must be a mapping, found {0}")]
    NotAMapping(&'static str),

    /// A construct that has no flat node representation
    #[error("Unsupported value at '{path}': {reason}")]
    Unsupported {
        /// Dotted path of the offending value
        path: String,
        /// What was found there
        reason: String,
    },
}

/// Failures preparing a save destination
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The destination file or its parent directory could not be created
    #[error("Failed to create destination {}: {source}", .path.display())]
    Create {
        /// Destination that could not be created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Writing the encoded document failed
    #[error("Failed to write destination {}: {source}", .path.display())]
    Write {
        /// Destination being written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Encoding the tree into the destination failed
    #[error("Failed to encode into {}: {source}", .path.display())]
    Encode {
        /// Destination being written
        path: PathBuf,
        /// Codec failure
        #[source]
        source: CodecError,
    },
}
