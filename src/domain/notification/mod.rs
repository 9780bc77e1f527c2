//! Notification value objects

mod delivered;
mod display;
mod identity;
mod outcome;
mod request;
mod scheduled;

pub use delivered::DeliveredNotification;
pub use display::{AccentColor, DisplayOptions, IconRef, FALLBACK_COLOR, FALLBACK_ICON};
pub use identity::{IdAllocator, NotificationId};
pub use outcome::NotificationOutcome;
pub use request::NotificationRequest;
pub use scheduled::{ScheduledDisplayOptions, ScheduledNotification, PAYLOAD_VERSION};
