//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod display;
pub mod events;
pub mod scheduler;

// Re-export common types
pub use config::ConfigStore;
pub use display::{
    ActiveNotification, DisplayError, DisplayPriority, DisplayRequest, DisplaySurface, EXTRA_TEXT,
    EXTRA_TITLE,
};
pub use events::{
    ActionToken, PlatformEvent, TokenKind, ACTION_CLICK, ACTION_DISMISS, EXTRA_NOTIFICATION_ID,
};
pub use scheduler::{ScheduleError, WakeScheduler};
