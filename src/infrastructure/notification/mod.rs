//! Notification display surfaces

mod notify_rust;

pub use notify_rust::NotifyRustSurface;

use std::sync::Arc;

use crate::application::EventReceiver;

/// Create the display surface for the current platform
pub fn create_surface(app_name: &str, receiver: Arc<EventReceiver>) -> NotifyRustSurface {
    NotifyRustSurface::with_app_name(app_name, receiver)
}
