//! In-process wake scheduler on tokio timers
//!
//! Wake-ups live only as long as the process; a restart loses them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::ports::{ScheduleError, WakeScheduler};
use crate::domain::notification::NotificationId;

/// A scheduled payload whose time has come
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeEvent {
    pub id: NotificationId,
    pub payload: Vec<u8>,
}

type PendingWakes = Arc<Mutex<HashMap<NotificationId, (u64, JoinHandle<()>)>>>;

pub struct TokioWakeScheduler {
    sender: mpsc::Sender<WakeEvent>,
    pending: PendingWakes,
    generation: AtomicU64,
}

impl TokioWakeScheduler {
    /// Create a scheduler and the receiver its wake-ups are delivered on
    pub fn new() -> (Self, mpsc::Receiver<WakeEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let scheduler = Self {
            sender: tx,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        };
        (scheduler, rx)
    }

    fn lock(pending: &PendingWakes) -> std::sync::MutexGuard<'_, HashMap<NotificationId, (u64, JoinHandle<()>)>> {
        pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop a pending wake-up. Returns `true` if one was pending.
    pub fn cancel(&self, id: NotificationId) -> bool {
        match Self::lock(&self.pending).remove(&id) {
            Some((_, task)) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Ids with a wake-up still to fire, in ascending order
    pub fn pending(&self) -> Vec<NotificationId> {
        let mut ids: Vec<_> = Self::lock(&self.pending).keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Drop for TokioWakeScheduler {
    fn drop(&mut self) {
        for (_, (_, task)) in Self::lock(&self.pending).drain() {
            task.abort();
        }
    }
}

#[async_trait]
impl WakeScheduler for TokioWakeScheduler {
    async fn schedule_one_shot(
        &self,
        wake_at_millis: i64,
        payload: Vec<u8>,
        id: NotificationId,
    ) -> Result<(), ScheduleError> {
        if self.sender.is_closed() {
            return Err(ScheduleError::Rejected("wake receiver dropped".to_string()));
        }

        let delay_ms = wake_at_millis.saturating_sub(Utc::now().timestamp_millis()).max(0);
        let delay = StdDuration::from_millis(delay_ms as u64);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        // Hold the lock across spawn so the task cannot fire before it is recorded
        let mut pending = Self::lock(&self.pending);
        let task = {
            let sender = self.sender.clone();
            let pending = Arc::clone(&self.pending);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                {
                    let mut pending = Self::lock(&pending);
                    if pending.get(&id).map(|(g, _)| *g) == Some(generation) {
                        pending.remove(&id);
                    }
                }
                tracing::debug!(notification_id = %id, "Wake-up fired");
                if sender.send(WakeEvent { id, payload }).await.is_err() {
                    tracing::warn!(notification_id = %id, "Wake-up fired with no receiver");
                }
            })
        };

        if let Some((_, replaced)) = pending.insert(id, (generation, task)) {
            replaced.abort();
            tracing::debug!(notification_id = %id, "Replaced pending wake-up");
        }
        tracing::trace!(notification_id = %id, delay_ms, "Wake-up armed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_millis(ms: i64) -> i64 {
        Utc::now().timestamp_millis() + ms
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_with_payload() {
        let (scheduler, mut wakes) = TokioWakeScheduler::new();
        let id = NotificationId::new(3);

        scheduler
            .schedule_one_shot(in_millis(60_000), b"payload".to_vec(), id)
            .await
            .unwrap();
        assert_eq!(scheduler.pending(), vec![id]);

        let event = wakes.recv().await.unwrap();
        assert_eq!(event, WakeEvent { id, payload: b"payload".to_vec() });
        assert!(scheduler.pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn past_wake_time_fires_immediately() {
        let (scheduler, mut wakes) = TokioWakeScheduler::new();
        scheduler
            .schedule_one_shot(in_millis(-5_000), Vec::new(), NotificationId::new(1))
            .await
            .unwrap();

        assert_eq!(wakes.recv().await.unwrap().id, NotificationId::new(1));
    }

    #[tokio::test(start_paused = true)]
    async fn same_id_replaces_pending_wake() {
        let (scheduler, mut wakes) = TokioWakeScheduler::new();
        let id = NotificationId::new(8);

        scheduler
            .schedule_one_shot(in_millis(10_000), b"first".to_vec(), id)
            .await
            .unwrap();
        scheduler
            .schedule_one_shot(in_millis(20_000), b"second".to_vec(), id)
            .await
            .unwrap();
        assert_eq!(scheduler.pending(), vec![id]);

        assert_eq!(wakes.recv().await.unwrap().payload, b"second".to_vec());
        tokio::time::sleep(StdDuration::from_secs(60)).await;
        assert!(wakes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_wake() {
        let (scheduler, mut wakes) = TokioWakeScheduler::new();
        let id = NotificationId::new(2);
        scheduler
            .schedule_one_shot(in_millis(1_000), Vec::new(), id)
            .await
            .unwrap();

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));

        tokio::time::sleep(StdDuration::from_secs(5)).await;
        assert!(wakes.try_recv().is_err());
    }

    #[tokio::test]
    async fn rejects_when_receiver_is_gone() {
        let (scheduler, wakes) = TokioWakeScheduler::new();
        drop(wakes);

        let result = scheduler
            .schedule_one_shot(in_millis(1_000), Vec::new(), NotificationId::new(1))
            .await;
        assert!(matches!(result, Err(ScheduleError::Rejected(_))));
    }
}
