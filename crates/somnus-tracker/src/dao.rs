//! Data-access boundary for sleep session records.
//!
//! [`SessionDao`] is the explicit interface between the tracker and
//! persistence: four suspendable operations against the single sessions
//! table plus a live, push-updated view of all rows newest first. The
//! production implementation dispatches each blocking SQLite call to the
//! runtime's blocking pool and re-publishes the full result set after every
//! mutation.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task;

use somnus_store::Store;
use somnus_types::SleepSession;

use crate::error::Result;

/// Asynchronous access to the sessions table.
///
/// Implementations must re-emit the full, newest-first session list to
/// [`subscribe`](SessionDao::subscribe) observers after every mutation made
/// through the handle. Absent rows are `None`, not errors; storage failures
/// propagate to the caller.
#[async_trait]
pub trait SessionDao: Send + Sync {
    /// Append one record. Returns the storage-assigned id.
    async fn insert(&self, session: SleepSession) -> Result<i64>;

    /// Replace the row matching `session.id`. An id that matches no row
    /// leaves the table unchanged.
    async fn update(&self, session: SleepSession) -> Result<()>;

    /// Fetch a row by id.
    async fn get(&self, id: i64) -> Result<Option<SleepSession>>;

    /// Fetch the row with the greatest id.
    async fn latest(&self) -> Result<Option<SleepSession>>;

    /// Delete every row.
    async fn clear(&self) -> Result<()>;

    /// Live view of all sessions, newest first.
    fn subscribe(&self) -> watch::Receiver<Vec<SleepSession>>;
}

/// [`SessionDao`] over a [`Store`], one blocking task per call.
pub struct SqliteDao {
    store: Arc<Mutex<Store>>,
    sessions_tx: watch::Sender<Vec<SleepSession>>,
    sessions_rx: watch::Receiver<Vec<SleepSession>>,
}

impl SqliteDao {
    /// Wrap a store, seeding the live view with its current contents.
    pub fn new(store: Store) -> Result<Self> {
        let sessions = store.list_sessions()?;
        let (sessions_tx, sessions_rx) = watch::channel(sessions);

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            sessions_tx,
            sessions_rx,
        })
    }

    /// Run a read-only operation on the blocking pool.
    async fn read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Store) -> somnus_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let value = task::spawn_blocking(move || {
            let store = store.lock().unwrap_or_else(PoisonError::into_inner);
            op(&store)
        })
        .await??;

        Ok(value)
    }

    /// Run a mutation on the blocking pool, then publish the refreshed
    /// session list.
    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Store) -> somnus_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let (value, sessions) = task::spawn_blocking(move || {
            let store = store.lock().unwrap_or_else(PoisonError::into_inner);
            let value = op(&store)?;
            let sessions = store.list_sessions()?;
            Ok::<_, somnus_store::Error>((value, sessions))
        })
        .await??;

        self.sessions_tx.send_replace(sessions);
        Ok(value)
    }
}

#[async_trait]
impl SessionDao for SqliteDao {
    async fn insert(&self, session: SleepSession) -> Result<i64> {
        self.mutate(move |store| store.insert_session(&session)).await
    }

    async fn update(&self, session: SleepSession) -> Result<()> {
        self.mutate(move |store| store.update_session(&session)).await
    }

    async fn get(&self, id: i64) -> Result<Option<SleepSession>> {
        self.read(move |store| store.get_session(id)).await
    }

    async fn latest(&self) -> Result<Option<SleepSession>> {
        self.read(|store| store.latest_session()).await
    }

    async fn clear(&self) -> Result<()> {
        self.mutate(|store| store.clear_sessions().map(|_| ())).await
    }

    fn subscribe(&self) -> watch::Receiver<Vec<SleepSession>> {
        self.sessions_rx.clone()
    }
}
