//! Desktop notification surface using notify-rust
//!
//! On freedesktop systems each posted notification gets its own thread
//! that waits for the server to report an action or a close, then forwards
//! the matching token's event to the [`EventReceiver`]. Other platforms can
//! show notifications but report neither clicks nor closes, so their
//! notifications always end by timeout.
//!
//! The D-Bus handle is owned by the waiting thread, so `cancel` closes a
//! bubble by replacing it under the server id it was shown with: an empty
//! transient notification that expires after one millisecond. Platforms
//! without close reports keep no active set at all.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;

#[cfg(all(unix, not(target_os = "macos")))]
use crate::application::ports::DisplayPriority;
use crate::application::ports::{
    ActionToken, ActiveNotification, DisplayError, DisplayRequest, DisplaySurface, EXTRA_TEXT,
    EXTRA_TITLE,
};
use crate::application::EventReceiver;
use crate::domain::config::DEFAULT_APP_NAME;
use crate::domain::notification::NotificationId;

/// Action identifier freedesktop servers use for a click on the body
#[cfg(all(unix, not(target_os = "macos")))]
const DEFAULT_ACTION: &str = "default";

/// Pseudo-action notify-rust reports when the notification is closed
#[cfg(all(unix, not(target_os = "macos")))]
const CLOSED_ACTION: &str = "__closed";

/// Whether the platform reports clicks and closes back to us
const REPORTS_ACTIONS: bool = cfg!(all(unix, not(target_os = "macos")));

#[derive(Debug, Clone)]
struct ActiveEntry {
    title: String,
    description: String,
    posted_at_millis: i64,
    /// Id the notification server assigned, once it has accepted the post
    server_id: Option<u32>,
    on_click: ActionToken,
    on_dismiss: ActionToken,
}

impl ActiveEntry {
    fn disarm(&self) {
        self.on_click.revoke();
        self.on_dismiss.revoke();
    }
}

type ActiveSet = Arc<Mutex<HashMap<NotificationId, ActiveEntry>>>;

/// Cross-platform display surface using notify-rust
pub struct NotifyRustSurface {
    /// Application name for notifications
    app_name: String,
    receiver: Arc<EventReceiver>,
    active: ActiveSet,
}

impl NotifyRustSurface {
    /// Create a surface delivering user actions to `receiver`
    pub fn new(receiver: Arc<EventReceiver>) -> Self {
        Self::with_app_name(DEFAULT_APP_NAME, receiver)
    }

    /// Create with custom app name
    pub fn with_app_name(app_name: impl Into<String>, receiver: Arc<EventReceiver>) -> Self {
        Self {
            app_name: app_name.into(),
            receiver,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    fn lock_active(active: &ActiveSet) -> std::sync::MutexGuard<'_, HashMap<NotificationId, ActiveEntry>> {
        active.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn build(app_name: &str, request: &DisplayRequest) -> notify_rust::Notification {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(app_name)
            .summary(&request.title)
            .body(&request.description)
            .icon(request.icon.as_str());

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification
                .urgency(urgency_for(request.priority))
                .action(DEFAULT_ACTION, "Open")
                .hint(notify_rust::Hint::Custom(
                    "x-toastline-accent-color".to_string(),
                    request.color.to_hex(),
                ));
            if !request.auto_cancel {
                notification.hint(notify_rust::Hint::Resident(true));
            }
        }

        notification
    }

    /// Start tracking a posted notification so its actions can be forwarded
    fn track(&self, request: &DisplayRequest) {
        if !REPORTS_ACTIONS {
            return;
        }
        Self::lock_active(&self.active).insert(
            request.id,
            ActiveEntry {
                title: request.title.clone(),
                description: request.description.clone(),
                posted_at_millis: Utc::now().timestamp_millis(),
                server_id: None,
                on_click: request.on_click.clone(),
                on_dismiss: request.on_dismiss.clone(),
            },
        );
    }

    /// Close an entry's bubble on the notification server
    async fn close_on_server(&self, id: NotificationId, entry: &ActiveEntry) -> Result<(), DisplayError> {
        #[cfg(all(unix, not(target_os = "macos")))]
        if let Some(server_id) = entry.server_id {
            let notification = closing_notification(&self.app_name, server_id);
            tokio::task::spawn_blocking(move || notification.show().map(drop))
                .await
                .map_err(|e| e.to_string())
                .and_then(|shown| shown.map_err(|e| e.to_string()))
                .map_err(|message| DisplayError::CancelFailed { id, message })?;
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        let _ = (id, entry);

        Ok(())
    }
}

/// freedesktop servers have no "high but not sticky" level; `Critical`
/// bubbles never expire, so high priority maps to `Normal`
#[cfg(all(unix, not(target_os = "macos")))]
fn urgency_for(priority: DisplayPriority) -> notify_rust::Urgency {
    match priority {
        DisplayPriority::Low => notify_rust::Urgency::Low,
        DisplayPriority::Default | DisplayPriority::High => notify_rust::Urgency::Normal,
    }
}

/// Replacement for `server_id` that the server drops almost at once
#[cfg(all(unix, not(target_os = "macos")))]
fn closing_notification(app_name: &str, server_id: u32) -> notify_rust::Notification {
    let mut notification = notify_rust::Notification::new();
    notification
        .appname(app_name)
        .id(server_id)
        .urgency(notify_rust::Urgency::Low)
        .hint(notify_rust::Hint::Transient(true))
        .timeout(notify_rust::Timeout::Milliseconds(1));
    notification
}

#[cfg(all(unix, not(target_os = "macos")))]
fn forward_action(
    action: &str,
    id: NotificationId,
    active: &ActiveSet,
    receiver: &EventReceiver,
) {
    let Some(entry) = NotifyRustSurface::lock_active(active).remove(&id) else {
        return;
    };

    let token = if action == CLOSED_ACTION {
        &entry.on_dismiss
    } else if action == DEFAULT_ACTION {
        &entry.on_click
    } else {
        tracing::debug!(notification_id = %id, action, "Unknown notification action");
        &entry.on_dismiss
    };

    if let Some(event) = token.fire() {
        receiver.receive(&event);
    }
}

#[async_trait]
impl DisplaySurface for NotifyRustSurface {
    async fn post(&self, request: DisplayRequest) -> Result<(), DisplayError> {
        let id = request.id;
        let notification = Self::build(&self.app_name, &request);

        self.track(&request);

        let (accepted_tx, accepted_rx) = oneshot::channel();
        #[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(unused_variables))]
        let (active, receiver) = (Arc::clone(&self.active), Arc::clone(&self.receiver));

        // notify-rust blocks on D-Bus; the same thread then waits for the
        // user's action so the handle never leaves it. Detached, so a bubble
        // still on screen does not hold the process open at exit.
        let spawned = std::thread::Builder::new()
            .name(format!("toastline-notification-{}", id))
            .spawn(move || match notification.show() {
                Ok(handle) => {
                    #[cfg(all(unix, not(target_os = "macos")))]
                    {
                        let _ = accepted_tx.send(Ok(Some(handle.id())));
                        handle.wait_for_action(|action| forward_action(action, id, &active, &receiver));
                    }

                    #[cfg(not(all(unix, not(target_os = "macos"))))]
                    {
                        let _ = accepted_tx.send(Ok(None));
                        drop(handle);
                    }
                }
                Err(e) => {
                    let _ = accepted_tx.send(Err(DisplayError::PostFailed(e.to_string())));
                }
            });
        if let Err(e) = spawned {
            Self::lock_active(&self.active).remove(&id);
            return Err(DisplayError::PostFailed(e.to_string()));
        }

        let posted = accepted_rx
            .await
            .unwrap_or_else(|_| Err(DisplayError::PostFailed("notification thread exited".to_string())));

        let mut active = Self::lock_active(&self.active);
        match posted {
            Ok(server_id) => {
                // Already gone if the user acted before acceptance was read
                if let Some(entry) = active.get_mut(&id) {
                    entry.server_id = server_id;
                }
                Ok(())
            }
            Err(e) => {
                active.remove(&id);
                Err(e)
            }
        }
    }

    async fn cancel(&self, id: NotificationId) -> Result<(), DisplayError> {
        let Some(entry) = Self::lock_active(&self.active).remove(&id) else {
            return Ok(());
        };
        entry.disarm();
        self.close_on_server(id, &entry).await?;
        tracing::debug!(notification_id = %id, "Cleared notification");
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), DisplayError> {
        let drained: Vec<_> = Self::lock_active(&self.active).drain().collect();
        for (_, entry) in &drained {
            entry.disarm();
        }

        let mut first_error = None;
        for (id, entry) in &drained {
            if let Err(e) = self.close_on_server(*id, entry).await {
                tracing::warn!(notification_id = %id, error = %e, "Failed to close notification");
                first_error.get_or_insert(e);
            }
        }
        tracing::debug!(count = drained.len(), "Cleared all notifications");

        first_error.map_or(Ok(()), Err)
    }

    async fn list_active(&self) -> Result<Vec<ActiveNotification>, DisplayError> {
        // Without close reports nothing is tracked
        if !REPORTS_ACTIONS {
            return Err(DisplayError::Unsupported(
                "this platform does not report closed notifications".to_string(),
            ));
        }

        let active = Self::lock_active(&self.active);
        let mut list: Vec<_> = active
            .iter()
            .map(|(id, entry)| ActiveNotification {
                id: *id,
                extras: HashMap::from([
                    (EXTRA_TITLE.to_string(), entry.title.clone()),
                    (EXTRA_TEXT.to_string(), entry.description.clone()),
                ]),
                posted_at_millis: entry.posted_at_millis,
            })
            .collect();
        list.sort_by_key(|n| n.id);
        Ok(list)
    }
}
