//! Local persistence for somnus sleep sessions.
//!
//! This crate provides SQLite-based storage for sleep session records,
//! backing the tracking layer with a single small table.
//!
//! # Features
//!
//! - Insert and update single session rows
//! - Fetch by id or most recent
//! - List all sessions newest first
//! - Unconditional full-table clear
//!
//! # Example
//!
//! ```no_run
//! use somnus_store::Store;
//! use somnus_types::SleepSession;
//!
//! let store = Store::open_default()?;
//!
//! let id = store.insert_session(&SleepSession::begin(1_700_000_000_000))?;
//! let latest = store.latest_session()?;
//! assert_eq!(latest.map(|s| s.id), Some(id));
//! # Ok::<(), somnus_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/somnus/data.db`
/// - macOS: `~/Library/Application Support/somnus/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\somnus\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("somnus")
        .join("data.db")
}
