//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use somnus_types::SleepSession;

use crate::error::{Error, Result};
use crate::schema;

/// SQLite-based store for sleep session records.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode for better concurrent read behavior
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

// Session operations
impl Store {
    /// Insert a session. Returns the storage-assigned row id.
    pub fn insert_session(&self, session: &SleepSession) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sessions (start_time, end_time, quality) VALUES (?1, ?2, ?3)",
            rusqlite::params![session.start_time, session.end_time, session.quality],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted session {}", id);
        Ok(id)
    }

    /// Replace the row matching `session.id`.
    ///
    /// An id that matches no row leaves the table unchanged.
    pub fn update_session(&self, session: &SleepSession) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE sessions SET start_time = ?2, end_time = ?3, quality = ?4 WHERE id = ?1",
            rusqlite::params![
                session.id,
                session.start_time,
                session.end_time,
                session.quality
            ],
        )?;

        if changed == 0 {
            debug!("Update matched no row for session {}", session.id);
        }
        Ok(())
    }

    /// Get a session by id.
    pub fn get_session(&self, id: i64) -> Result<Option<SleepSession>> {
        let session = self
            .conn
            .query_row(
                "SELECT id, start_time, end_time, quality FROM sessions WHERE id = ?",
                [id],
                row_to_session,
            )
            .optional()?;

        Ok(session)
    }

    /// Get the session with the greatest id.
    pub fn latest_session(&self) -> Result<Option<SleepSession>> {
        let session = self
            .conn
            .query_row(
                "SELECT id, start_time, end_time, quality FROM sessions
                 ORDER BY id DESC LIMIT 1",
                [],
                row_to_session,
            )
            .optional()?;

        Ok(session)
    }

    /// List all sessions, newest first.
    pub fn list_sessions(&self) -> Result<Vec<SleepSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, start_time, end_time, quality FROM sessions ORDER BY id DESC",
        )?;

        let sessions = stmt
            .query_map([], row_to_session)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sessions)
    }

    /// Delete every session. Returns the number of rows removed.
    pub fn clear_sessions(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM sessions", [])?;
        info!("Cleared {} session(s)", removed);
        Ok(removed)
    }

    /// Count stored sessions.
    pub fn count_sessions(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;

        Ok(count as u64)
    }
}

fn row_to_session(row: &Row) -> rusqlite::Result<SleepSession> {
    Ok(SleepSession {
        id: row.get(0)?,
        start_time: row.get(1)?,
        end_time: row.get(2)?,
        quality: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use somnus_types::QUALITY_UNRATED;

    fn create_test_session(start: i64, end: i64) -> SleepSession {
        SleepSession {
            id: 0,
            start_time: start,
            end_time: end,
            quality: QUALITY_UNRATED,
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.list_sessions().unwrap().is_empty());
        assert!(store.latest_session().unwrap().is_none());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");

        {
            let store = Store::open(&path).unwrap();
            store.insert_session(&create_test_session(1000, 1000)).unwrap();
        }

        // Reopen and verify the row survived
        let store = Store::open(&path).unwrap();
        assert_eq!(store.count_sessions().unwrap(), 1);
    }

    #[test]
    fn test_insert_then_get_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let session = create_test_session(1000, 5000);

        let id = store.insert_session(&session).unwrap();
        let fetched = store.get_session(id).unwrap().unwrap();

        // Field-for-field equal except for the storage-assigned id
        assert_eq!(fetched.start_time, session.start_time);
        assert_eq!(fetched.end_time, session.end_time);
        assert_eq!(fetched.quality, session.quality);
        assert_eq!(fetched.id, id);
    }

    #[test]
    fn test_get_missing_session() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_session(42).unwrap().is_none());
    }

    #[test]
    fn test_latest_session() {
        let store = Store::open_in_memory().unwrap();

        store.insert_session(&create_test_session(1000, 2000)).unwrap();
        let last = store.insert_session(&create_test_session(3000, 3000)).unwrap();

        let latest = store.latest_session().unwrap().unwrap();
        assert_eq!(latest.id, last);
        assert_eq!(latest.start_time, 3000);
    }

    #[test]
    fn test_list_sessions_newest_first() {
        let store = Store::open_in_memory().unwrap();

        for i in 0..5 {
            let start = 1000 * (i + 1);
            store.insert_session(&create_test_session(start, start)).unwrap();
        }

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 5);

        // Strictly decreasing ids
        for pair in sessions.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
    }

    #[test]
    fn test_update_session() {
        let store = Store::open_in_memory().unwrap();

        let id = store.insert_session(&create_test_session(1000, 1000)).unwrap();
        let mut session = store.get_session(id).unwrap().unwrap();
        session.end_time = 2000;
        session.quality = 4;

        store.update_session(&session).unwrap();

        let fetched = store.get_session(id).unwrap().unwrap();
        assert_eq!(fetched.end_time, 2000);
        assert_eq!(fetched.quality, 4);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let store = Store::open_in_memory().unwrap();
        store.insert_session(&create_test_session(1000, 2000)).unwrap();

        let mut stray = create_test_session(9000, 9000);
        stray.id = 999;
        store.update_session(&stray).unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, 1000);
    }

    #[test]
    fn test_clear_sessions() {
        let store = Store::open_in_memory().unwrap();

        store.insert_session(&create_test_session(1000, 2000)).unwrap();
        store.insert_session(&create_test_session(3000, 4000)).unwrap();

        let removed = store.clear_sessions().unwrap();
        assert_eq!(removed, 2);

        assert!(store.list_sessions().unwrap().is_empty());
        assert!(store.latest_session().unwrap().is_none());
        assert_eq!(store.count_sessions().unwrap(), 0);
    }

    #[test]
    fn test_clear_empty_table() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.clear_sessions().unwrap(), 0);
    }

    #[test]
    fn test_ids_keep_increasing_after_clear() {
        let store = Store::open_in_memory().unwrap();

        let first = store.insert_session(&create_test_session(1000, 1000)).unwrap();
        store.clear_sessions().unwrap();
        let second = store.insert_session(&create_test_session(2000, 2000)).unwrap();

        // AUTOINCREMENT never reuses ids
        assert!(second > first);
    }
}
