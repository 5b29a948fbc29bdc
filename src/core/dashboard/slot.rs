//! Single-value handoff slots between a sampler task and the render loop.
//!
//! A slot holds at most one value. The writer replaces it as a whole unit,
//! the reader always sees either the previous or the new value, never a mix.

use std::sync::Arc;
use tokio::sync::watch;

/// Create a slot seeded with `initial`.
pub fn handoff_slot<T>(initial: T) -> (SlotWriter<T>, SlotReader<T>) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (SlotWriter { tx }, SlotReader { rx })
}

/// Producer half, owned by exactly one sampler task.
#[derive(Debug)]
pub struct SlotWriter<T> {
    tx: watch::Sender<Arc<T>>,
}

impl<T> SlotWriter<T> {
    /// Replace the slot content. Publishing never fails, even once the
    /// reader has gone away.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }
}

/// Consumer half, owned by the render loop.
#[derive(Debug, Clone)]
pub struct SlotReader<T> {
    rx: watch::Receiver<Arc<T>>,
}

impl<T> SlotReader<T> {
    /// Latest published value without waiting.
    pub fn latest(&self) -> Arc<T> {
        Arc::clone(&self.rx.borrow())
    }

    /// Latest value, plus whether it was published since the previous call.
    pub fn take_latest(&mut self) -> (Arc<T>, bool) {
        let fresh = self.rx.has_changed().unwrap_or(false);
        let value = Arc::clone(&self.rx.borrow_and_update());
        (value, fresh)
    }

    /// Wait for the next publish. Returns `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
