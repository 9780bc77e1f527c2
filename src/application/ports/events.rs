//! Callback tokens and the platform events they produce
//!
//! A token is handed to the display surface together with the notification.
//! When the user acts on the notification the surface fires the matching
//! token and forwards the resulting [`PlatformEvent`] to the event receiver.
//! Tokens share a revocation flag with their clones, so the dispatcher can
//! disarm the copies it handed out once an outcome has been consumed.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::notification::NotificationId;

/// Event action for a click on the notification body
pub const ACTION_CLICK: &str = "toastline.action.CLICK";

/// Event action for a notification that was closed without a click
pub const ACTION_DISMISS: &str = "toastline.action.DISMISSED";

/// Extra carrying the notification id
pub const EXTRA_NOTIFICATION_ID: &str = "notification_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Click,
    Dismiss,
}

impl TokenKind {
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Click => ACTION_CLICK,
            Self::Dismiss => ACTION_DISMISS,
        }
    }
}

/// An event raised by the platform on behalf of a token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformEvent {
    pub action: String,
    pub extras: HashMap<String, String>,
}

impl PlatformEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}

/// Revocable callback token for one notification
#[derive(Debug, Clone)]
pub struct ActionToken {
    kind: TokenKind,
    id: NotificationId,
    extras: BTreeMap<String, String>,
    revoked: Arc<AtomicBool>,
}

impl ActionToken {
    /// Click token carrying the request's custom arguments
    pub fn click(id: NotificationId, custom_args: BTreeMap<String, String>) -> Self {
        Self {
            kind: TokenKind::Click,
            id,
            extras: custom_args,
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dismiss(id: NotificationId) -> Self {
        Self {
            kind: TokenKind::Dismiss,
            id,
            extras: BTreeMap::new(),
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }

    /// Build the event for this token, or `None` once revoked
    pub fn fire(&self) -> Option<PlatformEvent> {
        if self.is_revoked() {
            return None;
        }

        let mut event = PlatformEvent::new(self.kind.action());
        for (key, value) in &self.extras {
            event.extras.insert(key.clone(), value.clone());
        }
        // The id always wins over a custom arg of the same name
        event
            .extras
            .insert(EXTRA_NOTIFICATION_ID.to_string(), self.id.to_string());
        Some(event)
    }

    /// Disarm this token and every clone of it
    pub fn revoke(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::SeqCst)
    }
}
