//! Error types for rating validation in somnus-types.

use thiserror::Error;

/// Errors that can occur when validating a quality rating.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RatingError {
    /// Rating outside the accepted `0..=5` range.
    #[error("Invalid rating: {0} (expected 0..=5)")]
    OutOfRange(i64),
}
