//! Notification request value object

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::display::{AccentColor, DisplayOptions, IconRef};

/// Everything a caller supplies when submitting a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub description: String,
    /// Show at this instant instead of immediately
    pub delay_until: Option<DateTime<Utc>>,
    pub clickable: bool,
    /// Remove from the notification center if the grace period runs out
    pub clear_from_history: bool,
    /// Extras delivered back with a click event
    pub custom_args: BTreeMap<String, String>,
    pub display: DisplayOptions,
}

impl NotificationRequest {
    /// Clickable, immediate notification with no extras
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            delay_until: None,
            clickable: true,
            clear_from_history: false,
            custom_args: BTreeMap::new(),
            display: DisplayOptions::default(),
        }
    }

    pub fn delay_until(mut self, at: DateTime<Utc>) -> Self {
        self.delay_until = Some(at);
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn clear_from_history(mut self, clear: bool) -> Self {
        self.clear_from_history = clear;
        self
    }

    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_args.insert(key.into(), value.into());
        self
    }

    pub fn icon(mut self, icon: IconRef) -> Self {
        self.display.icon = Some(icon);
        self
    }

    pub fn color(mut self, color: AccentColor) -> Self {
        self.display.color = Some(color);
        self
    }

    pub fn is_deferred(&self) -> bool {
        self.delay_until.is_some()
    }

    /// Name of the first missing required field, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.title.trim().is_empty() {
            Some("title")
        } else {
            None
        }
    }
}
