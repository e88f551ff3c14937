//! Cross-thread hand-off of decoded snapshots

use parking_lot::Mutex;
use tokio::sync::mpsc;

use worldsync_core::Message;

/// Default queue depth. The observer pushes on the order of once every few
/// seconds, so the queue rarely holds more than one snapshot.
pub const DEFAULT_CAPACITY: usize = 64;

/// Bounded hand-off queue between the network worker and the presentation
/// thread.
///
/// The worker enqueues decoded snapshots without ever blocking; the
/// presentation thread drains the queue on its own scheduling tick and runs
/// the consumer there. Consumer code never executes on the network thread,
/// preserving the single-writer rule over presentation state.
pub struct DispatchGate {
    tx: mpsc::Sender<Message>,
    rx: Mutex<mpsc::Receiver<Message>>,
}

impl DispatchGate {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        DispatchGate {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Enqueue one decoded snapshot. A full queue drops it with a warning;
    /// the next periodic push supersedes the lost state anyway.
    pub fn offer(&self, message: Message) {
        if let Err(error) = self.tx.try_send(message) {
            tracing::warn!(%error, "dispatch queue full, dropping snapshot");
        }
    }

    /// Take the next pending snapshot, if any. Never blocks.
    pub fn poll(&self) -> Option<Message> {
        self.rx.lock().try_recv().ok()
    }

    /// Drain every pending snapshot into `consumer` in arrival order,
    /// returning the number delivered. Intended to run once per
    /// presentation tick.
    pub fn drain<F: FnMut(Message)>(&self, mut consumer: F) -> usize {
        let mut rx = self.rx.lock();
        let mut delivered = 0;

        while let Ok(message) = rx.try_recv() {
            consumer(message);
            delivered += 1;
        }

        delivered
    }
}

impl Default for DispatchGate {
    fn default() -> Self {
        Self::new()
    }
}
