//! Error types for the declaration store.

use routegraph_core::RouterId;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while populating the declaration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A route or inclusion referenced a router that was never added.
    #[error("unknown router: {0}")]
    UnknownRouter(RouterId),

    /// A router id was declared twice.
    #[error("duplicate router: {0}")]
    DuplicateRouter(RouterId),

    /// The application root was given a non-empty prefix.
    #[error("root router {id} must have an empty prefix, got {prefix:?}")]
    RootPrefix { id: RouterId, prefix: String },

    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest was not valid JSON or did not match the schema.
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
