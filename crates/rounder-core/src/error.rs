//! Error types for the rounder-core library
//!
//! This module defines the error handling system for Rounder, using thiserror
//! for ergonomic error definitions and anyhow for flexible error sources.

use thiserror::Error;

/// Main error type for Rounder operations
#[derive(Error, Debug)]
pub enum Error {
    /// Deep-cloning the input failed because the value graph holds an opaque,
    /// non-cloneable resource. Raised only in copy mode, before any mutation.
    #[error("Cannot deep-clone value: '{type_name}' is not cloneable")]
    Unclonable { type_name: String },

    /// A transform that produces integers or significant digits was given
    /// something that is not a plain finite real number.
    #[error("Not a plain real number: {value}")]
    NonNumeric { value: String },

    /// The traversal exceeded the configured nesting-depth guard.
    #[error("Maximum nesting depth {limit} exceeded during traversal")]
    DepthExceeded { limit: usize },

    /// A caller-supplied transform function failed on a numeric leaf.
    #[error("Leaf transform failed: {source}")]
    LeafTransform {
        #[source]
        source: anyhow::Error,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Unsupported conversion or operation
    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error is scoped to a single node of the traversal.
    ///
    /// Node-level errors are suppressible by
    /// [`OnLeafError::KeepOriginal`](crate::OnLeafError::KeepOriginal);
    /// structural errors (clone failure, depth guard) always propagate.
    pub fn is_node_level(&self) -> bool {
        matches!(
            self,
            Error::NonNumeric { .. } | Error::LeafTransform { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
