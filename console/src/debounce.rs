use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Delivers the last scheduled value on `tx` once `delay` has passed without
/// another `schedule` call. Arming a new timer aborts the previous one, and
/// dropping the debouncer aborts whatever is still pending.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, value: T) {
        self.cancel();

        // Outside a runtime there is no timer to arm; deliver right away.
        if tokio::runtime::Handle::try_current().is_err() {
            debug!("no tokio runtime; delivering debounced value immediately");
            let _ = self.tx.send(value);
            return;
        }

        let tx = self.tx.clone();
        let deadline = Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if tx.is_closed() {
                return;
            }
            let _ = tx.send(value);
        }));
    }

    /// Abort the pending timer. Returns whether one was still armed.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(task) => {
                let armed = !task.is_finished();
                task.abort();
                armed
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::unbounded_channel;

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_quiet_period() {
        let (tx, mut rx) = unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(500), tx);
        debouncer.schedule("a");
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.schedule("ab");
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.schedule("abc");
        settle().await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(rx.try_recv().ok(), Some("abc"));
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_suppress_delivery() {
        let (tx, mut rx) = unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(500), tx);
        debouncer.schedule(1);
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        debouncer.schedule(2);
        drop(debouncer);
        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn delivers_immediately_without_runtime() {
        let (tx, mut rx) = unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(500), tx);
        debouncer.schedule(7);
        assert_eq!(rx.try_recv().ok(), Some(7));
        assert!(!debouncer.is_pending());
    }
}
