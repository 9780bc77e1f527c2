//! Application layer - Use cases and port interfaces
//!
//! Contains the notification dispatcher, the registry it waits on,
//! and the trait definitions for external system interactions.

pub mod dispatcher;
pub mod ports;
pub mod receiver;
pub mod registry;
pub mod scheduler;

// Re-export use cases
pub use dispatcher::{DispatchError, DispatcherConfig, NotificationDispatcher};
pub use receiver::EventReceiver;
pub use registry::{RegistryError, ResultRegistry, WaitHandle};
pub use scheduler::DeferredScheduler;
