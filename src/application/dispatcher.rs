//! Notification dispatcher use case
//!
//! `notify` posts a notification and waits for the first of: a click or
//! dismiss event delivered through the [`EventReceiver`], or the grace period
//! running out. Deferred requests are handed to the [`DeferredScheduler`] and
//! return `NotApplicable` straight away.
//!
//! [`EventReceiver`]: super::receiver::EventReceiver

use std::sync::Arc;

use chrono::DateTime;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::domain::config::AppConfig;
use crate::domain::error::PayloadError;
use crate::domain::notification::{
    AccentColor, DeliveredNotification, IconRef, IdAllocator, NotificationId, NotificationOutcome,
    NotificationRequest, ScheduledNotification,
};
use crate::domain::time::Duration;

use super::ports::{
    ActionToken, ActiveNotification, DisplayError, DisplayPriority, DisplayRequest,
    DisplaySurface, ScheduleError, WakeScheduler, EXTRA_TEXT, EXTRA_TITLE,
};
use super::registry::{RegistryError, ResultRegistry};
use super::scheduler::DeferredScheduler;

/// Errors from the dispatcher
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid notification: {0}")]
    InvalidInput(String),

    #[error("Display failed: {0}")]
    Display(#[from] DisplayError),

    #[error("Scheduling failed: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Scheduled payload rejected: {0}")]
    Payload(#[from] PayloadError),

    #[error("Internal error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Notification ids exhausted")]
    IdsExhausted,
}

/// Bookkeeping for one immediate notification.
///
/// Dropping it, whether `notify` returned or its future was dropped, stops
/// the timeout, revokes both tokens and clears the registry entries.
struct InFlight {
    id: NotificationId,
    registry: Arc<ResultRegistry>,
    on_click: ActionToken,
    on_dismiss: ActionToken,
    timeout: Option<JoinHandle<()>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(timeout) = self.timeout.take() {
            timeout.abort();
        }
        self.on_click.revoke();
        self.on_dismiss.revoke();
        self.registry.release(self.id);
        let _ = self.registry.consume(self.id);
    }
}

/// Defaults applied to every request, fixed when the dispatcher is built
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    pub default_icon: Option<IconRef>,
    pub default_color: Option<AccentColor>,
    /// How long to wait for a click or dismiss before giving up
    pub grace_period: Duration,
}

impl From<&AppConfig> for DispatcherConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_icon: config.default_icon(),
            default_color: config.default_color(),
            grace_period: config.grace_period_or_default(),
        }
    }
}

pub struct NotificationDispatcher<S, W>
where
    S: DisplaySurface + 'static,
    W: WakeScheduler,
{
    surface: Arc<S>,
    scheduler: DeferredScheduler<W>,
    registry: Arc<ResultRegistry>,
    ids: IdAllocator,
    config: DispatcherConfig,
}

impl<S, W> NotificationDispatcher<S, W>
where
    S: DisplaySurface + 'static,
    W: WakeScheduler,
{
    /// Build a dispatcher. The registry is shared with the event receiver
    /// that the surface delivers clicks and dismissals to.
    pub fn new(
        surface: Arc<S>,
        waker: W,
        registry: Arc<ResultRegistry>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            surface,
            scheduler: DeferredScheduler::new(waker),
            registry,
            ids: IdAllocator::new(),
            config,
        }
    }

    pub fn registry(&self) -> Arc<ResultRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Show a notification and wait for what the user did with it.
    ///
    /// Deferred requests are scheduled and return `NotApplicable` at once.
    /// Immediate requests block until clicked, dismissed, or the grace
    /// period elapses.
    pub async fn notify(
        &self,
        request: NotificationRequest,
    ) -> Result<NotificationOutcome, DispatchError> {
        if let Some(field) = request.missing_field() {
            return Err(DispatchError::InvalidInput(format!("{} is required", field)));
        }

        let id = self.ids.allocate().ok_or(DispatchError::IdsExhausted)?;
        let icon = IconRef::resolve(request.display.icon.as_ref(), self.config.default_icon.as_ref());
        let color = AccentColor::resolve(request.display.color, self.config.default_color);

        if let Some(scheduled) = ScheduledNotification::from_request(&request, &icon, color) {
            self.scheduler.schedule(id, &scheduled).await?;
            tracing::info!(notification_id = %id, delay_until = %scheduled.delay_until, "Notification scheduled");
            return Ok(NotificationOutcome::NotApplicable);
        }

        // Register before posting so an immediate click cannot be missed
        let wait = self.registry.register(id)?;
        let mut in_flight = InFlight {
            id,
            registry: Arc::clone(&self.registry),
            on_click: ActionToken::click(id, request.custom_args.clone()),
            on_dismiss: ActionToken::dismiss(id),
            timeout: None,
        };

        let display = DisplayRequest {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            icon,
            color,
            priority: DisplayPriority::High,
            auto_cancel: true,
            on_click: in_flight.on_click.clone(),
            on_dismiss: in_flight.on_dismiss.clone(),
        };

        self.surface.post(display).await?;
        tracing::debug!(notification_id = %id, title = %request.title, "Notification posted");

        in_flight.timeout = Some(self.arm_timeout(id, request.clear_from_history));

        wait.wait().await;

        let consumed = self.registry.consume(id);
        // The timeout task decided this one; let it finish clearing
        if let Ok(NotificationOutcome::Timeout) = consumed {
            if let Some(timeout) = in_flight.timeout.take() {
                let _ = timeout.await;
            }
        }
        drop(in_flight);

        let outcome = consumed
            .inspect_err(|e| tracing::error!(notification_id = %id, error = %e, "Registry invariant violated"))?
            .for_clickable(request.clickable);

        tracing::info!(notification_id = %id, %outcome, "Notification finished");
        Ok(outcome)
    }

    /// Re-enter the immediate path with a payload produced by the scheduler
    pub async fn deliver_scheduled(
        &self,
        payload: &[u8],
    ) -> Result<NotificationOutcome, DispatchError> {
        let request = ScheduledNotification::decode(payload)?.into_immediate_request()?;
        self.notify(request).await
    }

    /// Remove every notification from the surface.
    /// Pending `notify` calls still end through their own timeout.
    pub async fn cancel_all(&self) -> Result<(), DispatchError> {
        self.surface.cancel_all().await?;
        Ok(())
    }

    /// Notifications still visible on the surface.
    /// Empty when the platform cannot enumerate them.
    pub async fn list_delivered(&self) -> Vec<DeliveredNotification> {
        match self.surface.list_active().await {
            Ok(active) => active.into_iter().map(to_delivered).collect(),
            Err(DisplayError::Unsupported(reason)) => {
                tracing::debug!(%reason, "Listing delivered notifications is unsupported");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list delivered notifications");
                Vec::new()
            }
        }
    }

    fn arm_timeout(&self, id: NotificationId, clear_from_history: bool) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let surface = Arc::clone(&self.surface);
        let grace = self.config.grace_period;

        tokio::spawn(async move {
            tokio::time::sleep(grace.as_std()).await;

            if !registry.resolve(id, NotificationOutcome::Timeout) {
                return;
            }
            tracing::debug!(notification_id = %id, grace_period = %grace, "Notification timed out");

            if clear_from_history {
                if let Err(e) = surface.cancel(id).await {
                    tracing::warn!(notification_id = %id, error = %e, "Failed to clear timed out notification");
                }
            }
        })
    }
}

fn to_delivered(active: ActiveNotification) -> DeliveredNotification {
    let extra = |key: &str| active.extras.get(key).cloned().unwrap_or_default();
    DeliveredNotification {
        id: active.id,
        title: extra(EXTRA_TITLE),
        description: extra(EXTRA_TEXT),
        delivered_at: DateTime::from_timestamp_millis(active.posted_at_millis).unwrap_or_default(),
    }
}
