//! Deferred scheduler
//!
//! Hands future-dated notifications to a wake scheduler as an encoded
//! payload. Nothing is awaited here: when the wake-up fires, the payload
//! comes back through `NotificationDispatcher::deliver_scheduled`.

use crate::domain::notification::{NotificationId, ScheduledNotification};

use super::ports::{ScheduleError, WakeScheduler};

pub struct DeferredScheduler<W: WakeScheduler> {
    waker: W,
}

impl<W: WakeScheduler> DeferredScheduler<W> {
    pub fn new(waker: W) -> Self {
        Self { waker }
    }

    pub async fn schedule(
        &self,
        id: NotificationId,
        notification: &ScheduledNotification,
    ) -> Result<(), ScheduleError> {
        let wake_at_millis = notification.wake_at_millis();
        let payload = notification.encode()?;

        tracing::debug!(
            notification_id = %id,
            wake_at_millis,
            payload_bytes = payload.len(),
            "Scheduling deferred notification"
        );

        self.waker
            .schedule_one_shot(wake_at_millis, payload, id)
            .await
    }
}
