//! Notification identity and its allocator

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

/// Process-lifetime-unique identifier of a submitted notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NotificationId(u32);

impl NotificationId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Parse an id carried in an event payload.
    /// Negative or out-of-range values are not identities.
    pub fn from_event_value(raw: &str) -> Option<Self> {
        let value: i64 = raw.trim().parse().ok()?;
        u32::try_from(value).ok().map(Self)
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id counter.
///
/// Increments happen under a lock so concurrent submissions never share an id.
/// Once every `u32` has been handed out, allocation fails instead of wrapping.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: Mutex<u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn starting_at(first: u32) -> Self {
        Self {
            next: Mutex::new(u64::from(first)),
        }
    }

    /// Next unused id, or `None` when the id space is exhausted
    pub fn allocate(&self) -> Option<NotificationId> {
        let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
        let id = u32::try_from(*next).ok().map(NotificationId)?;
        *next += 1;
        Some(id)
    }
}
