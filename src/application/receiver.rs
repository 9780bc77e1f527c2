//! Event receiver
//!
//! Turns click/dismiss events from the platform into registry resolutions.
//! Invoked from whatever thread the display surface delivers events on.

use std::sync::Arc;

use crate::domain::notification::{NotificationId, NotificationOutcome};

use super::ports::{PlatformEvent, ACTION_CLICK, ACTION_DISMISS, EXTRA_NOTIFICATION_ID};
use super::registry::ResultRegistry;

pub struct EventReceiver {
    registry: Arc<ResultRegistry>,
}

impl EventReceiver {
    pub fn new(registry: Arc<ResultRegistry>) -> Self {
        Self { registry }
    }

    /// Outcome an event action stands for; unknown actions count as dismissals
    pub fn outcome_for(action: &str) -> NotificationOutcome {
        match action {
            ACTION_CLICK => NotificationOutcome::Clicked,
            ACTION_DISMISS => NotificationOutcome::Dismissed,
            _ => NotificationOutcome::Dismissed,
        }
    }

    /// Resolve the notification an event refers to.
    ///
    /// Returns `true` if this event decided the outcome. Events without a
    /// valid id, and events for notifications that are already resolved,
    /// are ignored.
    pub fn receive(&self, event: &PlatformEvent) -> bool {
        let Some(id) = event
            .extra(EXTRA_NOTIFICATION_ID)
            .and_then(NotificationId::from_event_value)
        else {
            tracing::debug!(action = %event.action, "Dropping event without a valid notification id");
            return false;
        };

        let outcome = Self::outcome_for(&event.action);
        tracing::trace!(notification_id = %id, action = %event.action, %outcome, "Received platform event");
        self.registry.resolve(id, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ActionToken;
    use std::collections::BTreeMap;

    fn setup() -> (Arc<ResultRegistry>, EventReceiver) {
        let registry = Arc::new(ResultRegistry::new());
        let receiver = EventReceiver::new(Arc::clone(&registry));
        (registry, receiver)
    }

    #[test]
    fn click_event_resolves_clicked() {
        let (registry, receiver) = setup();
        let id = NotificationId::new(1);
        let _handle = registry.register(id).unwrap();

        let event = ActionToken::click(id, BTreeMap::new()).fire().unwrap();
        assert!(receiver.receive(&event));
        assert_eq!(registry.consume(id), Ok(NotificationOutcome::Clicked));
    }

    #[test]
    fn dismiss_event_resolves_dismissed() {
        let (registry, receiver) = setup();
        let id = NotificationId::new(2);
        let _handle = registry.register(id).unwrap();

        let event = ActionToken::dismiss(id).fire().unwrap();
        assert!(receiver.receive(&event));
        assert_eq!(registry.consume(id), Ok(NotificationOutcome::Dismissed));
    }

    #[test]
    fn unknown_action_defaults_to_dismissed() {
        let (registry, receiver) = setup();
        let id = NotificationId::new(3);
        let _handle = registry.register(id).unwrap();

        let event = PlatformEvent::new("something.else").with_extra(EXTRA_NOTIFICATION_ID, "3");
        assert!(receiver.receive(&event));
        assert_eq!(registry.consume(id), Ok(NotificationOutcome::Dismissed));
    }

    #[test]
    fn events_without_valid_id_are_ignored() {
        let (registry, receiver) = setup();
        let _handle = registry.register(NotificationId::new(0)).unwrap();

        assert!(!receiver.receive(&PlatformEvent::new(ACTION_CLICK)));
        assert!(!receiver.receive(
            &PlatformEvent::new(ACTION_CLICK).with_extra(EXTRA_NOTIFICATION_ID, "-1")
        ));
        assert!(!receiver.receive(
            &PlatformEvent::new(ACTION_CLICK).with_extra(EXTRA_NOTIFICATION_ID, "zero")
        ));
        assert!(registry.is_pending(NotificationId::new(0)));
    }

    #[test]
    fn duplicate_delivery_is_harmless() {
        let (registry, receiver) = setup();
        let id = NotificationId::new(4);
        let _handle = registry.register(id).unwrap();
        let event = ActionToken::click(id, BTreeMap::new()).fire().unwrap();

        assert!(receiver.receive(&event));
        assert!(!receiver.receive(&event));
        assert_eq!(registry.unconsumed_count(), 1);
    }
}
