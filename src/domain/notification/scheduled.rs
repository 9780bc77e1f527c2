//! Scheduled notification payload
//!
//! The payload handed to a wake scheduler is a versioned JSON envelope:
//!
//! ```json
//! {"version":1,"notification":{"title":"..","description":"..",
//!   "delayUntil":"2026-01-01T09:00:00Z","clickable":true,"clearFromHistory":false,
//!   "displayOptions":{"iconRef":"dialog-information","colorHex":"#FFFFFF"}}}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::PayloadError;

use super::display::{AccentColor, DisplayOptions, IconRef};
use super::request::NotificationRequest;

/// Current payload schema version
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledDisplayOptions {
    pub icon_ref: Option<String>,
    pub color_hex: String,
}

/// The serializable subset of a deferred request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    pub title: String,
    pub description: String,
    pub delay_until: DateTime<Utc>,
    pub clickable: bool,
    pub clear_from_history: bool,
    pub display_options: ScheduledDisplayOptions,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    notification: &'a ScheduledNotification,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    notification: serde_json::Value,
}

impl ScheduledNotification {
    /// Snapshot a deferred request with its display options already resolved.
    /// Returns `None` for immediate requests.
    pub fn from_request(
        request: &NotificationRequest,
        icon: &IconRef,
        color: AccentColor,
    ) -> Option<Self> {
        let delay_until = request.delay_until?;
        Some(Self {
            title: request.title.clone(),
            description: request.description.clone(),
            delay_until,
            clickable: request.clickable,
            clear_from_history: request.clear_from_history,
            display_options: ScheduledDisplayOptions {
                icon_ref: Some(icon.as_str().to_string()),
                color_hex: color.to_hex(),
            },
        })
    }

    /// Wake time in milliseconds since the Unix epoch
    pub fn wake_at_millis(&self) -> i64 {
        self.delay_until.timestamp_millis()
    }

    pub fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        serde_json::to_vec(&EnvelopeRef {
            version: PAYLOAD_VERSION,
            notification: self,
        })
        .map_err(|e| PayloadError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        let envelope: Envelope =
            serde_json::from_slice(bytes).map_err(|e| PayloadError::Decode(e.to_string()))?;

        if envelope.version != PAYLOAD_VERSION {
            return Err(PayloadError::UnsupportedVersion {
                found: envelope.version,
                expected: PAYLOAD_VERSION,
            });
        }

        serde_json::from_value(envelope.notification)
            .map_err(|e| PayloadError::Decode(e.to_string()))
    }

    /// Rebuild the request that is shown when the wake-up fires.
    /// The delay is dropped so the request takes the immediate path.
    pub fn into_immediate_request(self) -> Result<NotificationRequest, PayloadError> {
        let color = self
            .display_options
            .color_hex
            .parse::<AccentColor>()
            .map_err(|e| PayloadError::Decode(e.to_string()))?;

        Ok(NotificationRequest {
            title: self.title,
            description: self.description,
            delay_until: None,
            clickable: self.clickable,
            clear_from_history: self.clear_from_history,
            custom_args: Default::default(),
            display: DisplayOptions {
                icon: self.display_options.icon_ref.and_then(IconRef::new),
                color: Some(color),
            },
        })
    }
}
