//! Notification outcome

use std::fmt;

/// Terminal classification of a notification's user interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationOutcome {
    Clicked,
    Dismissed,
    Timeout,
    /// Returned for deferred notifications, which have nothing to wait for yet
    NotApplicable,
}

impl NotificationOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clicked => "clicked",
            Self::Dismissed => "dismissed",
            Self::Timeout => "timeout",
            Self::NotApplicable => "not-applicable",
        }
    }

    /// Clicks only count on clickable notifications
    pub const fn for_clickable(self, clickable: bool) -> Self {
        match self {
            Self::Clicked if !clickable => Self::Dismissed,
            other => other,
        }
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
