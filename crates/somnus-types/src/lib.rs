//! Shared types for somnus sleep session tracking.
//!
//! This crate provides the record and rating types used by the storage and
//! tracking layers.
//!
//! # Features
//!
//! - [`SleepSession`]: one start/stop interval with an optional rating
//! - [`Quality`]: validated rating values with display labels
//! - The in-progress sentinel (`end_time == start_time`) and the unrated
//!   sentinel ([`QUALITY_UNRATED`])
//!
//! # Example
//!
//! ```
//! use somnus_types::{Quality, SleepSession};
//!
//! let session = SleepSession::begin(1_700_000_000_000);
//! assert!(session.is_in_progress());
//! assert_eq!(Quality::try_from(5).unwrap(), Quality::Excellent);
//! ```

pub mod error;
pub mod types;

pub use error::RatingError;
pub use types::{QUALITY_UNRATED, Quality, SleepSession};
