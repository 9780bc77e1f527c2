//! Wake scheduler port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::PayloadError;
use crate::domain::notification::NotificationId;

/// Scheduling errors
#[derive(Debug, Clone, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("Wake-up rejected: {0}")]
    Rejected(String),
}

/// Port for a one-shot wake-up mechanism.
///
/// When the wake time arrives, the implementation hands the payload back to
/// the host, which re-submits it through the immediate notification path.
#[async_trait]
pub trait WakeScheduler: Send + Sync {
    /// Arrange a single wake-up at `wake_at_millis` (Unix epoch milliseconds).
    ///
    /// Scheduling an id that already has a pending wake-up replaces it.
    async fn schedule_one_shot(
        &self,
        wake_at_millis: i64,
        payload: Vec<u8>,
        id: NotificationId,
    ) -> Result<(), ScheduleError>;
}

#[async_trait]
impl<T: WakeScheduler + ?Sized> WakeScheduler for Arc<T> {
    async fn schedule_one_shot(
        &self,
        wake_at_millis: i64,
        payload: Vec<u8>,
        id: NotificationId,
    ) -> Result<(), ScheduleError> {
        self.as_ref()
            .schedule_one_shot(wake_at_millis, payload, id)
            .await
    }
}
