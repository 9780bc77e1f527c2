//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: the desktop
//! notification server, tokio timers, and the XDG config file.

pub mod config;
pub mod notification;
pub mod scheduler;

pub use config::XdgConfigStore;
pub use notification::{create_surface, NotifyRustSurface};
pub use scheduler::{TokioWakeScheduler, WakeEvent};
