//! Display surface port interface

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::notification::{AccentColor, IconRef, NotificationId};

use super::events::ActionToken;

/// Extra holding the title of an active notification
pub const EXTRA_TITLE: &str = "title";

/// Extra holding the body text of an active notification
pub const EXTRA_TEXT: &str = "text";

/// Display surface errors
#[derive(Debug, Clone, Error)]
pub enum DisplayError {
    #[error("Not supported by this notification server: {0}")]
    Unsupported(String),

    #[error("Failed to show notification: {0}")]
    PostFailed(String),

    #[error("Failed to cancel notification {id}: {message}")]
    CancelFailed { id: NotificationId, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPriority {
    Low,
    #[default]
    Default,
    High,
}

/// A fully resolved notification ready to be shown
#[derive(Debug, Clone)]
pub struct DisplayRequest {
    pub id: NotificationId,
    pub title: String,
    pub description: String,
    pub icon: IconRef,
    pub color: AccentColor,
    pub priority: DisplayPriority,
    /// Close the notification when it is clicked
    pub auto_cancel: bool,
    pub on_click: ActionToken,
    pub on_dismiss: ActionToken,
}

/// A notification the surface currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub id: NotificationId,
    pub extras: HashMap<String, String>,
    /// When it was posted, in milliseconds since the Unix epoch
    pub posted_at_millis: i64,
}

/// Port for the platform capability that renders notifications
#[async_trait]
pub trait DisplaySurface: Send + Sync {
    /// Show a notification. Returns once the platform has accepted it.
    async fn post(&self, request: DisplayRequest) -> Result<(), DisplayError>;

    /// Remove one notification from the screen and notification center
    async fn cancel(&self, id: NotificationId) -> Result<(), DisplayError>;

    /// Remove every notification this process posted
    async fn cancel_all(&self) -> Result<(), DisplayError>;

    /// Notifications that are still visible.
    /// Fails with `Unsupported` when the platform cannot enumerate them.
    async fn list_active(&self) -> Result<Vec<ActiveNotification>, DisplayError>;
}

#[async_trait]
impl<T: DisplaySurface + ?Sized> DisplaySurface for Arc<T> {
    async fn post(&self, request: DisplayRequest) -> Result<(), DisplayError> {
        self.as_ref().post(request).await
    }

    async fn cancel(&self, id: NotificationId) -> Result<(), DisplayError> {
        self.as_ref().cancel(id).await
    }

    async fn cancel_all(&self) -> Result<(), DisplayError> {
        self.as_ref().cancel_all().await
    }

    async fn list_active(&self) -> Result<Vec<ActiveNotification>, DisplayError> {
        self.as_ref().list_active().await
    }
}

/// Blanket implementation for boxed surfaces
#[async_trait]
impl DisplaySurface for Box<dyn DisplaySurface> {
    async fn post(&self, request: DisplayRequest) -> Result<(), DisplayError> {
        self.as_ref().post(request).await
    }

    async fn cancel(&self, id: NotificationId) -> Result<(), DisplayError> {
        self.as_ref().cancel(id).await
    }

    async fn cancel_all(&self) -> Result<(), DisplayError> {
        self.as_ref().cancel_all().await
    }

    async fn list_active(&self) -> Result<Vec<ActiveNotification>, DisplayError> {
        self.as_ref().list_active().await
    }
}
