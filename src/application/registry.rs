//! Result registry
//!
//! Correlates a notification id with the wait handle of the blocked
//! dispatcher and, once resolved, with its outcome. Resolution is
//! first-writer-wins: the click/dismiss path and the timeout path may both
//! try, and only the first one is recorded.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::notification::{NotificationId, NotificationOutcome};

/// Registry invariant violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Notification {0} is already registered")]
    DuplicateIdentity(NotificationId),

    #[error("No outcome recorded for notification {0}")]
    UnknownIdentity(NotificationId),
}

/// Receiving half of a pending wait, held by the dispatcher
#[derive(Debug)]
pub struct WaitHandle {
    id: NotificationId,
    receiver: oneshot::Receiver<()>,
}

impl WaitHandle {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Wait until the id is resolved.
    ///
    /// Also returns if the wait entry is released without a resolution; the
    /// following `consume` then reports `UnknownIdentity`.
    pub async fn wait(self) {
        if self.receiver.await.is_err() {
            tracing::warn!(
                notification_id = %self.id,
                "Wait handle released without an outcome"
            );
        }
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    waits: HashMap<NotificationId, oneshot::Sender<()>>,
    outcomes: HashMap<NotificationId, NotificationOutcome>,
}

/// Process-wide store of pending waits and resolved outcomes
#[derive(Debug, Default)]
pub struct ResultRegistry {
    state: Mutex<RegistryState>,
}

impl ResultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        // Every critical section leaves both maps consistent, so a poisoned
        // lock still guards valid state
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create the wait handle for `id`
    pub fn register(&self, id: NotificationId) -> Result<WaitHandle, RegistryError> {
        let mut state = self.lock();
        if state.waits.contains_key(&id) || state.outcomes.contains_key(&id) {
            return Err(RegistryError::DuplicateIdentity(id));
        }

        let (sender, receiver) = oneshot::channel();
        state.waits.insert(id, sender);
        tracing::trace!(notification_id = %id, "Registered wait handle");

        Ok(WaitHandle { id, receiver })
    }

    /// Record `outcome` for `id` and wake its waiter.
    ///
    /// Returns `false` without changing anything when `id` has no pending
    /// wait, which covers unknown ids, duplicate events, and events that lose
    /// the race against an earlier resolution.
    pub fn resolve(&self, id: NotificationId, outcome: NotificationOutcome) -> bool {
        let mut state = self.lock();
        if state.outcomes.contains_key(&id) {
            tracing::debug!(notification_id = %id, %outcome, "Ignoring late resolution");
            return false;
        }
        let Some(sender) = state.waits.remove(&id) else {
            tracing::debug!(notification_id = %id, %outcome, "Ignoring resolution for unknown id");
            return false;
        };

        state.outcomes.insert(id, outcome);
        // The waiter may already have given up; the outcome stays for consume
        let _ = sender.send(());
        tracing::debug!(notification_id = %id, %outcome, "Resolved notification");

        true
    }

    /// Take the outcome for `id`. Succeeds at most once per resolution.
    pub fn consume(&self, id: NotificationId) -> Result<NotificationOutcome, RegistryError> {
        self.lock()
            .outcomes
            .remove(&id)
            .ok_or(RegistryError::UnknownIdentity(id))
    }

    /// Drop the wait entry for `id`, if any
    pub fn release(&self, id: NotificationId) {
        if self.lock().waits.remove(&id).is_some() {
            tracing::trace!(notification_id = %id, "Released unresolved wait handle");
        }
    }

    pub fn is_pending(&self, id: NotificationId) -> bool {
        self.lock().waits.contains_key(&id)
    }

    /// Number of ids still waiting for an outcome
    pub fn pending_count(&self) -> usize {
        self.lock().waits.len()
    }

    /// Number of outcomes not yet consumed
    pub fn unconsumed_count(&self) -> usize {
        self.lock().outcomes.len()
    }
}
