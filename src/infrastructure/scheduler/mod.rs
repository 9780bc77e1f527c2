//! Wake scheduler adapters

mod tokio_wake;

pub use tokio_wake::{TokioWakeScheduler, WakeEvent};
