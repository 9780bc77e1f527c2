//! Time value objects

mod duration;

pub use duration::{Duration, DEFAULT_GRACE_PERIOD_SECS};
