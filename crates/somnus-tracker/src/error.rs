//! Error types for somnus-tracker.

/// Result type for somnus-tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in somnus-tracker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Storage failure from the underlying store.
    #[error("Storage error: {0}")]
    Store(#[from] somnus_store::Error),

    /// A blocking storage task was cancelled or panicked.
    #[error("Storage task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Rating outside the accepted range.
    #[error(transparent)]
    Rating(#[from] somnus_types::RatingError),

    /// The data-access handle cannot serve requests.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
