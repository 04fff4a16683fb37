//! Consume-once signals for UI-facing events.

use tokio::sync::watch;

/// A one-shot signal with a consume-once contract.
///
/// Carries either "no event" (`None`) or "event with payload" (`Some`).
/// Raising the signal notifies observers once; after an observer handles
/// the event it must be [`reset`](Signal::reset) so that re-observation
/// (e.g. after a UI rebuild) yields the neutral value again.
pub struct Signal<T> {
    tx: watch::Sender<Option<T>>,
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> Signal<T> {
    /// Create a signal in the neutral state.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        Self { tx, rx }
    }

    /// Get a receiver for observing the signal.
    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }

    /// Raise the signal with a payload.
    pub fn raise(&self, payload: T) {
        self.tx.send_replace(Some(payload));
    }

    /// Return the signal to its neutral value.
    pub fn reset(&self) {
        self.tx.send_replace(None);
    }

    /// The pending payload, if the signal has not been consumed.
    pub fn peek(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Whether an event is pending.
    pub fn is_raised(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_neutral() {
        let signal: Signal<u32> = Signal::new();
        assert!(!signal.is_raised());
        assert_eq!(signal.peek(), None);
    }

    #[test]
    fn test_raise_then_reset() {
        let signal = Signal::new();

        signal.raise(7u32);
        assert!(signal.is_raised());
        assert_eq!(signal.peek(), Some(7));

        signal.reset();
        assert!(!signal.is_raised());
        assert_eq!(signal.peek(), None);
    }

    #[tokio::test]
    async fn test_observers_see_raise_exactly_once() {
        let signal = Signal::new();
        let mut rx = signal.subscribe();

        signal.raise("done");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some("done"));

        // After reset, re-observation yields the neutral value, not the
        // previous payload
        signal.reset();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), None);
    }

    #[test]
    fn test_raise_overwrites_pending_payload() {
        let signal = Signal::new();

        signal.raise(1u32);
        signal.raise(2u32);
        assert_eq!(signal.peek(), Some(2));
    }

    #[test]
    fn test_late_subscriber_sees_pending_payload() {
        let signal = Signal::new();
        signal.raise(5u32);

        let rx = signal.subscribe();
        assert_eq!(*rx.borrow(), Some(5));
    }
}
