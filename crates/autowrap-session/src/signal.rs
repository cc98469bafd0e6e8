//! Write-completed signal
//!
//! Channel-based replacement for callback subscriptions: each subscriber
//! owns a receiver, and dropped receivers are pruned on the next publish.

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

/// Published once per completed outermost write session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteCompleted {
    /// Count of completed write sessions, starting at 1
    pub sequence: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Subscribers {
    senders: Mutex<Vec<Sender<WriteCompleted>>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self) -> Receiver<WriteCompleted> {
        let (tx, rx) = channel::unbounded();
        self.senders.lock().push(tx);
        rx
    }

    pub(crate) fn publish(&self, event: WriteCompleted) {
        let mut senders = self.senders.lock();
        let before = senders.len();
        senders.retain(|tx| tx.send(event).is_ok());
        if senders.len() != before {
            tracing::debug!("Pruned {} closed subscribers", before - senders.len());
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.lock().len()
    }
}
