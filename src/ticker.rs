//! Cancellable periodic task driving the viewer's synthesis cycle

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Owner handle for a task that calls `on_tick` once per period.
///
/// The first call happens one full period after `spawn`. Dropping the handle
/// aborts the task; `stop` asks it to finish and waits for it.
pub(crate) struct Ticker {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub(crate) fn spawn<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Fires on an explicit stop and when the owner goes away
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => on_tick(),
                }
            }
        });

        Ticker {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Signal the task and wait until it has exited.
    pub(crate) async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("Ticker task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let ticker = Ticker::spawn(&Handle::current(), Duration::from_millis(100), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(301)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        ticker.stop().await;
        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_the_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let ticker = Ticker::spawn(&Handle::current(), Duration::from_millis(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        drop(ticker);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
