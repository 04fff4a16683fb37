//! Sleep session tracking with observable state.
//!
//! This crate provides the state machine between a UI and the somnus
//! session store: start and stop a sleep interval, rate it, clear history,
//! and observe the resulting state through watch channels.
//!
//! # Features
//!
//! - [`SessionDao`]: async data-access boundary over the sessions table,
//!   with a live newest-first view of all rows
//! - [`SleepTracker`]: idle/tracking state machine with restart recovery
//! - [`Signal`]: consume-once one-shot events (rating prompt, clear notice)
//! - [`MemoryDao`]: in-memory DAO with failure injection for tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use somnus_store::Store;
//! use somnus_tracker::{SessionDao, SleepTracker, SqliteDao};
//!
//! # async fn run() -> somnus_tracker::Result<()> {
//! let store = Store::open_default()?;
//! let dao: Arc<dyn SessionDao> = Arc::new(SqliteDao::new(store)?);
//! let tracker = SleepTracker::new(dao).await?;
//!
//! tracker.start_tracking().await?;
//! assert!(tracker.is_tracking());
//!
//! tracker.stop_tracking().await?;
//! if let Some(closed) = tracker.rating_prompt() {
//!     tracker.rate_session(closed.id, 4).await?;
//!     tracker.dismiss_rating_prompt();
//! }
//! # Ok(())
//! # }
//! ```

mod dao;
mod error;
mod format;
mod mock;
mod signal;
mod tracker;

pub use dao::{SessionDao, SqliteDao};
pub use error::{Error, Result};
pub use format::{format_duration, format_history};
pub use mock::MemoryDao;
pub use signal::Signal;
pub use tracker::{HistoryView, SleepTracker};
