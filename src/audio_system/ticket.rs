/// One-shot load result handles
///
/// A [`LoadTicket`] is handed out per interested party and resolves exactly
/// once, when the asset reaches a terminal state. If the loader drops the
/// promise side without resolving it (callbacks cleared, loader destroyed),
/// the ticket reports [`LoadOutcome::Cancelled`].
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::error::AudioError;

/// Final result of one asset load, as seen by a ticket holder
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    Failed(AudioError),
    Cancelled,
}

/// Receiving side of a load result
#[derive(Debug)]
pub struct LoadTicket {
    key: String,
    rx: Receiver<LoadOutcome>,
}

/// Sending side, owned by the loader until the load finishes
#[derive(Debug)]
pub(crate) struct LoadPromise {
    tx: Sender<LoadOutcome>,
}

impl LoadTicket {
    /// Create a connected ticket/promise pair
    pub(crate) fn pair(key: &str) -> (LoadTicket, LoadPromise) {
        let (tx, rx) = bounded(1);
        (
            LoadTicket {
                key: key.to_string(),
                rx,
            },
            LoadPromise { tx },
        )
    }

    /// A ticket that is already resolved
    pub(crate) fn resolved(key: &str, outcome: LoadOutcome) -> LoadTicket {
        let (ticket, promise) = Self::pair(key);
        promise.resolve(outcome);
        ticket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Non-blocking check; `None` while the load is still in flight
    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadOutcome::Cancelled),
        }
    }

    /// Block for at most `timeout`, for hosts that load on worker threads
    pub fn wait_timeout(&self, timeout: Duration) -> Option<LoadOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(LoadOutcome::Cancelled),
        }
    }
}

impl LoadPromise {
    pub(crate) fn resolve(self, outcome: LoadOutcome) {
        // The holder may have dropped its ticket; nothing to deliver then
        let _ = self.tx.try_send(outcome);
    }
}
