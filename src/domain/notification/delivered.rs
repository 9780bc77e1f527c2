use chrono::{DateTime, Utc};
use serde::Serialize;

use super::identity::NotificationId;

/// A notification currently visible on the display surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveredNotification {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
    pub delivered_at: DateTime<Utc>,
}
