//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::notification::{AccentColor, IconRef};
use crate::domain::time::Duration;

/// Application name shown by the notification server
pub const DEFAULT_APP_NAME: &str = "Toastline";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub app_name: Option<String>,
    pub default_icon: Option<String>,
    pub default_color: Option<String>,
    pub grace_period: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            app_name: Some(DEFAULT_APP_NAME.to_string()),
            default_icon: None,
            default_color: None,
            grace_period: Some(Duration::default_grace_period().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            app_name: other.app_name.or(self.app_name),
            default_icon: other.default_icon.or(self.default_icon),
            default_color: other.default_color.or(self.default_color),
            grace_period: other.grace_period.or(self.grace_period),
        }
    }

    pub fn app_name_or_default(&self) -> &str {
        self.app_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_APP_NAME)
    }

    /// Configured default icon, if set and non-blank
    pub fn default_icon(&self) -> Option<IconRef> {
        self.default_icon.clone().and_then(IconRef::new)
    }

    /// Configured default accent color, ignoring unparsable values
    pub fn default_color(&self) -> Option<AccentColor> {
        self.default_color.as_ref().and_then(|s| s.parse().ok())
    }

    /// Grace period as parsed Duration, or 7s if not set/invalid
    pub fn grace_period_or_default(&self) -> Duration {
        self.grace_period
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_grace_period)
    }
}
