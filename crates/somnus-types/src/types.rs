//! Core types for sleep session records.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// Sentinel rating value meaning "not yet rated".
pub const QUALITY_UNRATED: i64 = -1;

/// A single recorded sleep interval.
///
/// Timestamps are epoch milliseconds. A session where `end_time` equals
/// `start_time` has been started but not yet stopped. The `id` is assigned
/// by storage; a value of `0` means the record has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SleepSession {
    /// Storage-assigned row id (`0` until first insert).
    pub id: i64,
    /// When tracking started, epoch milliseconds.
    pub start_time: i64,
    /// When tracking stopped, epoch milliseconds. Equal to `start_time`
    /// while the session is still in progress.
    pub end_time: i64,
    /// Quality rating `0..=5`, or [`QUALITY_UNRATED`].
    pub quality: i64,
}

impl SleepSession {
    /// Start a new, unrated session at `now_ms`.
    ///
    /// The returned record carries the in-progress sentinel
    /// (`end_time == start_time`) and no storage id yet.
    #[must_use]
    pub fn begin(now_ms: i64) -> Self {
        Self {
            id: 0,
            start_time: now_ms,
            end_time: now_ms,
            quality: QUALITY_UNRATED,
        }
    }

    /// Whether this session has been started but not stopped.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.start_time == self.end_time
    }

    /// Elapsed time between start and stop, or `None` while in progress.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        if self.is_in_progress() {
            None
        } else {
            Some(self.end_time - self.start_time)
        }
    }

    /// Whether a quality rating has been recorded.
    #[must_use]
    pub fn is_rated(&self) -> bool {
        self.quality != QUALITY_UNRATED
    }
}

/// Quality rating for a completed sleep session.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new rating
/// granularities in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[repr(u8)]
pub enum Quality {
    /// Rating 0.
    VeryBad = 0,
    /// Rating 1.
    Poor = 1,
    /// Rating 2.
    SoSo = 2,
    /// Rating 3.
    Ok = 3,
    /// Rating 4.
    PrettyGood = 4,
    /// Rating 5.
    Excellent = 5,
}

impl Quality {
    /// Human-readable label used by the history summary.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Quality::VeryBad => "very bad",
            Quality::Poor => "poor",
            Quality::SoSo => "so-so",
            Quality::Ok => "OK",
            Quality::PrettyGood => "pretty good",
            Quality::Excellent => "excellent",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i64> for Quality {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Quality::VeryBad),
            1 => Ok(Quality::Poor),
            2 => Ok(Quality::SoSo),
            3 => Ok(Quality::Ok),
            4 => Ok(Quality::PrettyGood),
            5 => Ok(Quality::Excellent),
            other => Err(RatingError::OutOfRange(other)),
        }
    }
}
