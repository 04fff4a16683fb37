//! Sleep tracking state machine with observable state.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info};

use somnus_types::{Quality, SleepSession};

use crate::dao::SessionDao;
use crate::error::Result;
use crate::format::format_history;
use crate::signal::Signal;

/// Derived, displayable view of the session history.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    /// All sessions, newest first.
    pub sessions: Vec<SleepSession>,
    /// Plain-text summary of `sessions`.
    pub summary: String,
}

/// Tracks the current sleep session and exposes observable state.
///
/// The tracker is a small state machine: idle while no session is in
/// progress, tracking otherwise. Each action runs one ordered chain of
/// storage calls and updates the observable state only after the chain
/// completes. Storage failures abort the chain and are returned to the
/// caller.
pub struct SleepTracker {
    dao: Arc<dyn SessionDao>,
    current_tx: watch::Sender<Option<SleepSession>>,
    current_rx: watch::Receiver<Option<SleepSession>>,
    sessions_rx: watch::Receiver<Vec<SleepSession>>,
    history_rx: watch::Receiver<HistoryView>,
    rating_prompt: Signal<SleepSession>,
    clear_notice: Signal<()>,
}

impl SleepTracker {
    /// Create a tracker over the given data-access handle.
    ///
    /// Resumes a session left in progress by a previous run: if the most
    /// recent stored row carries the in-progress sentinel it becomes the
    /// current session, otherwise the tracker starts idle.
    pub async fn new(dao: Arc<dyn SessionDao>) -> Result<Self> {
        let current = dao.latest().await?.filter(SleepSession::is_in_progress);
        if let Some(session) = &current {
            info!(id = session.id, "Resuming in-progress sleep session");
        }

        let (current_tx, current_rx) = watch::channel(current);
        let sessions_rx = dao.subscribe();
        let history_rx = spawn_history_task(dao.subscribe());

        Ok(Self {
            dao,
            current_tx,
            current_rx,
            sessions_rx,
            history_rx,
            rating_prompt: Signal::new(),
            clear_notice: Signal::new(),
        })
    }

    /// Begin tracking a new session.
    ///
    /// No-op while a session is already in progress.
    pub async fn start_tracking(&self) -> Result<()> {
        if self.current_rx.borrow().is_some() {
            debug!("start_tracking ignored: session already in progress");
            return Ok(());
        }

        self.dao.insert(SleepSession::begin(now_ms())).await?;

        // Re-read through the sentinel check so the current session
        // carries its storage-assigned id
        let current = self.dao.latest().await?.filter(SleepSession::is_in_progress);
        if let Some(session) = &current {
            info!(id = session.id, "Started sleep session");
        }
        self.current_tx.send_replace(current);
        Ok(())
    }

    /// Stop the in-progress session.
    ///
    /// No-op while idle. The closed record is raised on the rating prompt
    /// signal so a UI can navigate to its rating screen.
    pub async fn stop_tracking(&self) -> Result<()> {
        let Some(mut session) = self.current_rx.borrow().clone() else {
            debug!("stop_tracking ignored: no session in progress");
            return Ok(());
        };

        session.end_time = now_ms();
        self.dao.update(session.clone()).await?;

        info!(id = session.id, "Stopped sleep session");
        self.current_tx.send_replace(None);
        self.rating_prompt.raise(session);
        Ok(())
    }

    /// Record a quality rating for a stored session.
    ///
    /// Ratings outside `0..=5` are rejected before touching storage. An id
    /// that matches no row is a no-op.
    pub async fn rate_session(&self, id: i64, rating: i64) -> Result<()> {
        let quality = Quality::try_from(rating)?;

        let Some(mut session) = self.dao.get(id).await? else {
            debug!("rate_session ignored: no session with id {}", id);
            return Ok(());
        };

        session.quality = quality as i64;
        self.dao.update(session).await?;
        info!(id, rating, "Rated sleep session");
        Ok(())
    }

    /// Delete every stored session and raise the clear notice.
    ///
    /// The current session is left untouched: a session in progress keeps
    /// tracking against a row that no longer exists, and stopping it later
    /// issues an update that matches nothing.
    pub async fn clear_all(&self) -> Result<()> {
        self.dao.clear().await?;
        self.clear_notice.raise(());
        Ok(())
    }

    // --- Observable state ---

    /// The in-progress session, if any.
    pub fn current_session(&self) -> Option<SleepSession> {
        self.current_rx.borrow().clone()
    }

    /// Whether a session is currently being tracked.
    pub fn is_tracking(&self) -> bool {
        self.current_rx.borrow().is_some()
    }

    /// Observe the current session.
    pub fn subscribe_current(&self) -> watch::Receiver<Option<SleepSession>> {
        self.current_tx.subscribe()
    }

    /// Whether any sessions are stored.
    pub fn has_sessions(&self) -> bool {
        !self.sessions_rx.borrow().is_empty()
    }

    /// The latest derived history view.
    pub fn history(&self) -> HistoryView {
        self.history_rx.borrow().clone()
    }

    /// Observe the derived history view.
    pub fn subscribe_history(&self) -> watch::Receiver<HistoryView> {
        self.history_rx.clone()
    }

    // --- One-shot signals ---

    /// The closed session pending a rating, if unconsumed.
    pub fn rating_prompt(&self) -> Option<SleepSession> {
        self.rating_prompt.peek()
    }

    /// Observe the rating prompt.
    pub fn subscribe_rating_prompt(&self) -> watch::Receiver<Option<SleepSession>> {
        self.rating_prompt.subscribe()
    }

    /// Reset the rating prompt after the observer has handled it.
    pub fn dismiss_rating_prompt(&self) {
        self.rating_prompt.reset();
    }

    /// Whether the clear notice is pending.
    pub fn clear_notice_pending(&self) -> bool {
        self.clear_notice.is_raised()
    }

    /// Observe the clear notice.
    pub fn subscribe_clear_notice(&self) -> watch::Receiver<Option<()>> {
        self.clear_notice.subscribe()
    }

    /// Reset the clear notice after the observer has handled it.
    pub fn dismiss_clear_notice(&self) {
        self.clear_notice.reset();
    }
}

/// Re-derive the history view on every emission of the live session list.
///
/// The task ends when the tracker (and every history subscriber) is
/// dropped, or when the data-access handle goes away.
fn spawn_history_task(
    mut sessions_rx: watch::Receiver<Vec<SleepSession>>,
) -> watch::Receiver<HistoryView> {
    let (tx, rx) = watch::channel(HistoryView::default());

    tokio::spawn(async move {
        loop {
            let sessions = sessions_rx.borrow_and_update().clone();
            let view = HistoryView {
                summary: format_history(&sessions),
                sessions,
            };
            if tx.send(view).is_err() {
                break;
            }
            if sessions_rx.changed().await.is_err() {
                break;
            }
        }
    });

    rx
}

/// Current wall-clock time in epoch milliseconds.
fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
