//! Dispatcher integration tests against in-memory adapters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;

use toastline::application::ports::{
    ActiveNotification, DisplayError, DisplayRequest, DisplaySurface, PlatformEvent,
    ScheduleError, WakeScheduler, EXTRA_NOTIFICATION_ID,
};
use toastline::application::{
    DispatchError, DispatcherConfig, EventReceiver, NotificationDispatcher, ResultRegistry,
};
use toastline::domain::notification::{
    AccentColor, IconRef, NotificationId, NotificationOutcome, NotificationRequest,
    ScheduledNotification,
};
use toastline::domain::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Reaction {
    Click,
    Dismiss,
}

/// Surface that answers each post with a scripted user reaction
struct ScriptedSurface {
    receiver: Arc<EventReceiver>,
    reactions: Mutex<Vec<Option<(Reaction, StdDuration)>>>,
    posted: Mutex<Vec<DisplayRequest>>,
    cancelled: Mutex<Vec<NotificationId>>,
    fired: Arc<Mutex<Vec<PlatformEvent>>>,
    cancel_all_calls: AtomicUsize,
}

impl ScriptedSurface {
    fn new(receiver: Arc<EventReceiver>, reactions: Vec<Option<(Reaction, StdDuration)>>) -> Self {
        Self {
            receiver,
            reactions: Mutex::new(reactions.into_iter().rev().collect()),
            posted: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            fired: Arc::new(Mutex::new(Vec::new())),
            cancel_all_calls: AtomicUsize::new(0),
        }
    }

    fn posted(&self) -> Vec<DisplayRequest> {
        self.posted.lock().unwrap().clone()
    }

    fn cancelled(&self) -> Vec<NotificationId> {
        self.cancelled.lock().unwrap().clone()
    }

    fn fired(&self) -> Vec<PlatformEvent> {
        self.fired.lock().unwrap().clone()
    }
}

#[async_trait]
impl DisplaySurface for ScriptedSurface {
    async fn post(&self, request: DisplayRequest) -> Result<(), DisplayError> {
        let reaction = self.reactions.lock().unwrap().pop().flatten();
        if let Some((reaction, after)) = reaction {
            let token = match reaction {
                Reaction::Click => request.on_click.clone(),
                Reaction::Dismiss => request.on_dismiss.clone(),
            };
            let receiver = Arc::clone(&self.receiver);
            let fired = Arc::clone(&self.fired);
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                if let Some(event) = token.fire() {
                    receiver.receive(&event);
                    fired.lock().unwrap().push(event);
                }
            });
        }
        self.posted.lock().unwrap().push(request);
        Ok(())
    }

    async fn cancel(&self, id: NotificationId) -> Result<(), DisplayError> {
        self.cancelled.lock().unwrap().push(id);
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), DisplayError> {
        self.cancel_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<ActiveNotification>, DisplayError> {
        Err(DisplayError::Unsupported("scripted".to_string()))
    }
}

#[derive(Default)]
struct RecordingWaker {
    calls: Mutex<Vec<(i64, Vec<u8>, NotificationId)>>,
}

impl RecordingWaker {
    fn calls(&self) -> Vec<(i64, Vec<u8>, NotificationId)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WakeScheduler for RecordingWaker {
    async fn schedule_one_shot(
        &self,
        wake_at_millis: i64,
        payload: Vec<u8>,
        id: NotificationId,
    ) -> Result<(), ScheduleError> {
        self.calls.lock().unwrap().push((wake_at_millis, payload, id));
        Ok(())
    }
}

struct Harness {
    dispatcher: NotificationDispatcher<ScriptedSurface, Arc<RecordingWaker>>,
    surface: Arc<ScriptedSurface>,
    waker: Arc<RecordingWaker>,
    registry: Arc<ResultRegistry>,
}

fn harness_with(
    reactions: Vec<Option<(Reaction, StdDuration)>>,
    config: DispatcherConfig,
) -> Harness {
    let registry = Arc::new(ResultRegistry::new());
    let receiver = Arc::new(EventReceiver::new(Arc::clone(&registry)));
    let surface = Arc::new(ScriptedSurface::new(receiver, reactions));
    let waker = Arc::new(RecordingWaker::default());
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&surface),
        Arc::clone(&waker),
        Arc::clone(&registry),
        config,
    );
    Harness {
        dispatcher,
        surface,
        waker,
        registry,
    }
}

fn harness(reactions: Vec<Option<(Reaction, StdDuration)>>) -> Harness {
    harness_with(reactions, DispatcherConfig::default())
}

fn secs(n: u64) -> StdDuration {
    StdDuration::from_secs(n)
}

#[tokio::test(start_paused = true)]
async fn click_after_one_second_is_clicked() {
    let h = harness(vec![Some((Reaction::Click, secs(1)))]);
    let started = Instant::now();

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("Deploy", "finished"))
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::Clicked);
    let elapsed = started.elapsed();
    assert!(elapsed >= secs(1) && elapsed < secs(7), "elapsed {:?}", elapsed);
    assert_eq!(h.registry.pending_count(), 0);
    assert_eq!(h.registry.unconsumed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn dismiss_is_dismissed() {
    let h = harness(vec![Some((Reaction::Dismiss, secs(2)))]);

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("Deploy", "finished"))
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::Dismissed);
}

#[tokio::test(start_paused = true)]
async fn no_reaction_times_out_after_grace_period_and_clears() {
    let h = harness(vec![None]);
    let started = Instant::now();

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("Reminder", "stretch").clear_from_history(true))
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::Timeout);
    assert!(started.elapsed() >= secs(7));
    let posted_id = h.surface.posted()[0].id;
    assert_eq!(h.surface.cancelled(), vec![posted_id]);
}

#[tokio::test(start_paused = true)]
async fn timeout_without_clear_leaves_notification() {
    let h = harness(vec![None]);

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("Reminder", "stretch"))
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::Timeout);
    assert!(h.surface.cancelled().is_empty());
}

#[tokio::test(start_paused = true)]
async fn configured_grace_period_is_used() {
    let config = DispatcherConfig {
        grace_period: Duration::from_secs(2),
        ..Default::default()
    };
    let h = harness_with(vec![None], config);
    let started = Instant::now();

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("Quick", ""))
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::Timeout);
    let elapsed = started.elapsed();
    assert!(elapsed >= secs(2) && elapsed < secs(7), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn late_click_does_not_overwrite_timeout() {
    let h = harness(vec![Some((Reaction::Click, secs(10)))]);

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("Late", ""))
        .await
        .unwrap();
    assert_eq!(outcome, NotificationOutcome::Timeout);

    // Tokens are revoked once the outcome is read
    tokio::time::sleep(secs(5)).await;
    assert!(h.surface.fired().is_empty());
    assert_eq!(h.registry.unconsumed_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn abandoned_notify_leaves_nothing_behind() {
    let h = harness(vec![Some((Reaction::Click, secs(5)))]);

    let abandoned = tokio::time::timeout(
        secs(1),
        h.dispatcher
            .notify(NotificationRequest::new("Abandoned", "").clear_from_history(true)),
    )
    .await;
    assert!(abandoned.is_err());

    // Past both the click and the grace period
    tokio::time::sleep(secs(30)).await;

    assert_eq!(h.registry.pending_count(), 0);
    assert_eq!(h.registry.unconsumed_count(), 0);
    let posted = h.surface.posted();
    assert!(posted[0].on_click.is_revoked());
    assert!(posted[0].on_dismiss.is_revoked());
    assert!(h.surface.fired().is_empty());
    assert!(h.surface.cancelled().is_empty());
}

#[tokio::test(start_paused = true)]
async fn click_on_non_clickable_is_dismissed() {
    let h = harness(vec![Some((Reaction::Click, secs(1)))]);

    let outcome = h
        .dispatcher
        .notify(NotificationRequest::new("FYI", "").clickable(false))
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::Dismissed);
}

#[tokio::test(start_paused = true)]
async fn click_event_carries_custom_args() {
    let h = harness(vec![Some((Reaction::Click, secs(1)))]);

    h.dispatcher
        .notify(NotificationRequest::new("Build", "").arg("job", "42"))
        .await
        .unwrap();

    let fired = h.surface.fired();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].extra("job"), Some("42"));
    let posted_id = h.surface.posted()[0].id;
    assert_eq!(
        fired[0].extra(EXTRA_NOTIFICATION_ID),
        Some(posted_id.to_string().as_str())
    );
}

#[tokio::test(start_paused = true)]
async fn display_options_fall_back_to_config_then_defaults() {
    let config = DispatcherConfig {
        default_color: Some("#112233".parse().unwrap()),
        ..Default::default()
    };
    let h = harness_with(
        vec![Some((Reaction::Dismiss, secs(1))), Some((Reaction::Dismiss, secs(1)))],
        config,
    );

    h.dispatcher
        .notify(NotificationRequest::new("Plain", ""))
        .await
        .unwrap();
    h.dispatcher
        .notify(
            NotificationRequest::new("Styled", "")
                .icon(IconRef::new("mail-unread").unwrap())
                .color("#FF0000".parse().unwrap()),
        )
        .await
        .unwrap();

    let posted = h.surface.posted();
    assert_eq!(posted[0].icon, IconRef::fallback());
    assert_eq!(posted[0].color.to_hex(), "#112233");
    assert_eq!(posted[1].icon.as_str(), "mail-unread");
    assert_eq!(posted[1].color.to_hex(), "#FF0000");
    assert_ne!(posted[0].id, posted[1].id);
}

#[tokio::test(start_paused = true)]
async fn concurrent_notifications_resolve_independently() {
    let h = harness(vec![
        Some((Reaction::Click, secs(3))),
        Some((Reaction::Dismiss, secs(1))),
    ]);

    let (first, second) = tokio::join!(
        h.dispatcher.notify(NotificationRequest::new("First", "")),
        h.dispatcher.notify(NotificationRequest::new("Second", "")),
    );

    assert_eq!(first.unwrap(), NotificationOutcome::Clicked);
    assert_eq!(second.unwrap(), NotificationOutcome::Dismissed);
    assert_eq!(h.registry.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn deferred_request_is_scheduled_not_posted() {
    let h = harness(vec![]);
    let at = Utc::now() + chrono::Duration::seconds(60);

    let outcome = h
        .dispatcher
        .notify(
            NotificationRequest::new("Stand-up", "in the big room")
                .delay_until(at)
                .icon(IconRef::new("x-office-calendar").unwrap()),
        )
        .await
        .unwrap();

    assert_eq!(outcome, NotificationOutcome::NotApplicable);
    assert!(h.surface.posted().is_empty());
    assert_eq!(h.registry.pending_count(), 0);

    let calls = h.waker.calls();
    assert_eq!(calls.len(), 1);
    let (wake_at, payload, _) = &calls[0];
    assert_eq!(*wake_at, at.timestamp_millis());

    let scheduled = ScheduledNotification::decode(payload).unwrap();
    assert_eq!(scheduled.title, "Stand-up");
    assert_eq!(scheduled.description, "in the big room");
    assert_eq!(scheduled.display_options.icon_ref.as_deref(), Some("x-office-calendar"));
    assert_eq!(scheduled.display_options.color_hex, AccentColor::fallback().to_hex());
}

#[tokio::test(start_paused = true)]
async fn scheduled_payload_reenters_immediate_path() {
    let h = harness(vec![Some((Reaction::Click, secs(1)))]);
    let at = Utc::now() + chrono::Duration::seconds(60);

    h.dispatcher
        .notify(NotificationRequest::new("Tea", "ready").delay_until(at))
        .await
        .unwrap();
    let (_, payload, _) = h.waker.calls().remove(0);

    let outcome = h.dispatcher.deliver_scheduled(&payload).await.unwrap();

    assert_eq!(outcome, NotificationOutcome::Clicked);
    let posted = h.surface.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].title, "Tea");
    assert_eq!(posted[0].description, "ready");
}

#[tokio::test]
async fn corrupt_scheduled_payload_is_rejected() {
    let h = harness(vec![]);

    let result = h.dispatcher.deliver_scheduled(b"<xml/>").await;

    assert!(matches!(result, Err(DispatchError::Payload(_))));
    assert!(h.surface.posted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_all_leaves_pending_waits_alone() {
    let h = harness(vec![None]);

    let (outcome, pending_during) = tokio::join!(
        h.dispatcher.notify(NotificationRequest::new("Busy", "")),
        async {
            tokio::time::sleep(secs(1)).await;
            h.dispatcher.cancel_all().await.unwrap();
            h.registry.pending_count()
        },
    );

    assert_eq!(pending_during, 1);
    assert_eq!(h.surface.cancel_all_calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.unwrap(), NotificationOutcome::Timeout);
}

#[tokio::test]
async fn unsupported_listing_is_empty() {
    let h = harness(vec![]);
    assert!(h.dispatcher.list_delivered().await.is_empty());
}
