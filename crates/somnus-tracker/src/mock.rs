//! In-memory data-access implementation for testing.
//!
//! [`MemoryDao`] implements the [`SessionDao`] trait without a database,
//! allowing tracker code to be exercised in unit tests. It supports failure
//! injection for error-path tests and counts the mutations made through it.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;

use somnus_types::SleepSession;

use crate::dao::SessionDao;
use crate::error::{Error, Result};

/// A Vec-backed [`SessionDao`] for tests.
///
/// Rows are held in insertion order (ascending id); the live view publishes
/// them newest first, matching the production implementation.
pub struct MemoryDao {
    rows: Mutex<Vec<SleepSession>>,
    next_id: AtomicI64,
    insert_count: AtomicU32,
    update_count: AtomicU32,
    should_fail: AtomicBool,
    sessions_tx: watch::Sender<Vec<SleepSession>>,
    sessions_rx: watch::Receiver<Vec<SleepSession>>,
}

impl Default for MemoryDao {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDao {
    /// Create an empty in-memory DAO.
    pub fn new() -> Self {
        let (sessions_tx, sessions_rx) = watch::channel(Vec::new());
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            insert_count: AtomicU32::new(0),
            update_count: AtomicU32::new(0),
            should_fail: AtomicBool::new(false),
            sessions_tx,
            sessions_rx,
        }
    }

    /// Make every subsequent operation fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of inserts made through this handle.
    pub fn insert_count(&self) -> u32 {
        self.insert_count.load(Ordering::SeqCst)
    }

    /// Number of updates made through this handle.
    pub fn update_count(&self) -> u32 {
        self.update_count.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<()> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(Error::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<SleepSession>> {
        self.rows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn publish(&self, rows: &[SleepSession]) {
        let sessions: Vec<SleepSession> = rows.iter().rev().cloned().collect();
        self.sessions_tx.send_replace(sessions);
    }
}

#[async_trait]
impl SessionDao for MemoryDao {
    async fn insert(&self, mut session: SleepSession) -> Result<i64> {
        self.check_failure()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        session.id = id;

        let mut rows = self.lock_rows();
        rows.push(session);
        self.insert_count.fetch_add(1, Ordering::SeqCst);
        self.publish(&rows);
        Ok(id)
    }

    async fn update(&self, session: SleepSession) -> Result<()> {
        self.check_failure()?;

        let mut rows = self.lock_rows();
        if let Some(row) = rows.iter_mut().find(|row| row.id == session.id) {
            *row = session;
        }
        self.update_count.fetch_add(1, Ordering::SeqCst);
        self.publish(&rows);
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<SleepSession>> {
        self.check_failure()?;

        let rows = self.lock_rows();
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn latest(&self) -> Result<Option<SleepSession>> {
        self.check_failure()?;

        let rows = self.lock_rows();
        Ok(rows.last().cloned())
    }

    async fn clear(&self) -> Result<()> {
        self.check_failure()?;

        let mut rows = self.lock_rows();
        rows.clear();
        self.publish(&rows);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<SleepSession>> {
        self.sessions_rx.clone()
    }
}
