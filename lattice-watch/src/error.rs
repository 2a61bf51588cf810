//! Error types.

use thiserror::Error;

use crate::watch::{CallbackShape, TraversalMode};

/// Errors raised when a watch is registered.
///
/// All of them are detected before any watch is created. Nothing in this
/// crate fails once a watch is running.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The root of a structural watch is not a record, sequence or map.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The mode reports per-value changes but no callback was supplied.
    #[error("{mode} watch requires a callback")]
    MissingCallback { mode: TraversalMode },

    /// The callback's shape is not one the mode can invoke.
    #[error("{mode} watch cannot invoke a {shape} callback")]
    UnsupportedCallbackShape {
        mode: TraversalMode,
        shape: CallbackShape,
    },

    /// A watch configuration could not be parsed.
    #[error("invalid watch configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WatchError>;
