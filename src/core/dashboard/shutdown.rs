use std::time::Duration;
use tokio::sync::watch;

/// Shared `running` flag read by the render loop and every sampler loop.
///
/// Clearing it is one-way: once stopped, the flag never becomes true again.
#[derive(Debug, Clone)]
pub struct RunFlag {
    tx: watch::Sender<bool>,
}

impl RunFlag {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx }
    }

    pub fn is_running(&self) -> bool {
        *self.tx.borrow()
    }

    /// Clear the flag. Loops exit at their next iteration boundary.
    pub fn stop(&self) {
        self.tx.send_if_modified(|running| std::mem::replace(running, false));
    }

    /// Resolve once the flag is cleared.
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // wait_for only errors when the sender is gone, and we hold it
        let _ = rx.wait_for(|running| !*running).await;
    }

    /// Sleep for `period`, cut short if the flag is cleared meanwhile.
    ///
    /// Returns whether the loop should keep going.
    pub async fn sleep(&self, period: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(period) => self.is_running(),
            _ = self.stopped() => false,
        }
    }
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}
