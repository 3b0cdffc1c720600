//! Debouncing of rapidly changing input.
//!
//! A [`DebounceTimer`] holds at most one pending delayed task. Every
//! [`push`](DebounceTimer::push) aborts that task and schedules a new one, so a
//! value reaches the settled channel only after no newer value has arrived for
//! the whole delay. Intermediate values are never queued.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

/// Delays values until input has been quiet for a fixed period.
///
/// Settled values are delivered on the receiver returned by
/// [`DebounceTimer::new`]. Dropping the timer cancels any pending value.
pub struct DebounceTimer<T> {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    settled_tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceTimer<T>
where
    T: Send + 'static,
{
    /// Create a timer and the receiver on which settled values arrive.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let timer = Self {
            delay,
            pending: None,
            settled_tx,
        };
        (timer, settled_rx)
    }

    /// The quiet period a value must survive before it settles.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value with `value` and restart the delay.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let tx = self.settled_tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            // Receiver gone means nobody cares about settled values anymore.
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any, without delivering it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                trace!("Cancelling pending debounced value");
            }
            handle.abort();
        }
    }

    /// Whether a value is still waiting out its delay.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for DebounceTimer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Instant};

    const DELAY: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_only_final_value_settles() {
        let (mut timer, mut rx) = DebounceTimer::new(DELAY);

        for text in ["r", "ru", "rus", "rust"] {
            timer.push(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }

        let started = Instant::now();
        assert_eq!(rx.recv().await.as_deref(), Some("rust"));
        // 100ms of the delay had already elapsed after the last push.
        assert!(started.elapsed() < DELAY);

        sleep(DELAY * 4).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_values_separated_by_delay_both_settle() {
        let (mut timer, mut rx) = DebounceTimer::new(DELAY);

        timer.push(1);
        sleep(DELAY + Duration::from_millis(10)).await;
        timer.push(2);

        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_value() {
        let (mut timer, mut rx) = DebounceTimer::new(DELAY);

        timer.push("draft");
        assert!(timer.is_pending());
        timer.cancel();
        assert!(!timer.is_pending());

        sleep(DELAY * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_settles_before_delay() {
        let (mut timer, mut rx) = DebounceTimer::new(DELAY);

        timer.push("early");
        tokio::task::yield_now().await;
        advance(DELAY - Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some("early"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_value() {
        let (mut timer, mut rx) = DebounceTimer::new(DELAY);
        timer.push(7u32);
        drop(timer);

        // Sender side is gone and the task was aborted, so the channel closes empty.
        assert_eq!(rx.recv().await, None);
    }
}
