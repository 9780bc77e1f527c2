//! Command runner for `send`

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::application::ports::ConfigStore;
use crate::application::{
    DispatchError, DispatcherConfig, EventReceiver, NotificationDispatcher, ResultRegistry,
};
use crate::domain::config::AppConfig;
use crate::domain::notification::{IconRef, NotificationOutcome, NotificationRequest};
use crate::infrastructure::{
    create_surface, NotifyRustSurface, TokioWakeScheduler, WakeEvent, XdgConfigStore,
};

use super::args::SendArgs;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured grace period
pub const ENV_GRACE_PERIOD: &str = "TOASTLINE_GRACE_PERIOD";

type Dispatcher = NotificationDispatcher<NotifyRustSurface, TokioWakeScheduler>;

fn build_dispatcher(config: &AppConfig) -> (Dispatcher, mpsc::Receiver<WakeEvent>) {
    let registry = Arc::new(ResultRegistry::new());
    let receiver = Arc::new(EventReceiver::new(Arc::clone(&registry)));
    let surface = Arc::new(create_surface(config.app_name_or_default(), receiver));
    let (waker, wakes) = TokioWakeScheduler::new();

    let dispatcher =
        NotificationDispatcher::new(surface, waker, registry, DispatcherConfig::from(config));
    (dispatcher, wakes)
}

/// Turn `send` arguments into a request. `now` anchors `--in`.
pub fn build_request(args: &SendArgs, now: DateTime<Utc>) -> Result<NotificationRequest, String> {
    let mut request = NotificationRequest::new(args.title.clone(), args.body.clone().unwrap_or_default())
        .clickable(args.clickable)
        .clear_from_history(args.clear);

    for (key, value) in &args.args {
        request = request.arg(key.clone(), value.clone());
    }
    if let Some(name) = &args.icon {
        let icon = IconRef::new(name.clone()).ok_or("Icon name must not be blank")?;
        request = request.icon(icon);
    }
    if let Some(color) = args.color {
        request = request.color(color);
    }

    let delay_until = match (args.delay, args.at) {
        (Some(delay), _) => Some(
            now.checked_add_signed(delay.as_chrono())
                .ok_or_else(|| format!("Delay too long: {}", delay))?,
        ),
        (None, Some(at)) => Some(at),
        (None, None) => None,
    };
    if let Some(at) = delay_until {
        request = request.delay_until(at);
    }

    Ok(request)
}

/// Post a notification and print its outcome. A deferred send prints
/// `not-applicable`, stays alive until the wake-up, then prints the outcome
/// of the delivered notification.
pub async fn run_send(args: SendArgs, config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let request = match build_request(&args, Utc::now()) {
        Ok(request) => request,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let deferred_until = request.delay_until;

    let (dispatcher, mut wakes) = build_dispatcher(&config);
    let waiting = presenter.format_waiting(dispatcher.config().grace_period.as_secs());

    if deferred_until.is_none() {
        presenter.start_spinner(&waiting);
    }
    let result = dispatcher.notify(request).await;
    presenter.stop_spinner();
    if let Err(code) = report(&presenter, result) {
        return code;
    }

    let Some(at) = deferred_until else {
        return ExitCode::from(EXIT_SUCCESS);
    };

    presenter.info(&presenter.format_scheduled(at));
    presenter.start_spinner("Waiting for scheduled time...");
    let wake = wakes.recv().await;
    presenter.stop_spinner();

    let Some(wake) = wake else {
        presenter.error("Scheduler stopped before the notification was due");
        return ExitCode::from(EXIT_ERROR);
    };
    tracing::debug!(notification_id = %wake.id, "Delivering scheduled notification");

    presenter.start_spinner(&waiting);
    let result = dispatcher.deliver_scheduled(&wake.payload).await;
    presenter.stop_spinner();

    match report(&presenter, result) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => code,
    }
}

fn report(
    presenter: &Presenter,
    result: Result<NotificationOutcome, DispatchError>,
) -> Result<(), ExitCode> {
    match result {
        Ok(outcome) => {
            presenter.outcome(outcome);
            Ok(())
        }
        Err(DispatchError::InvalidInput(message)) => {
            presenter.error(&message);
            Err(ExitCode::from(EXIT_USAGE_ERROR))
        }
        Err(e) => {
            presenter.error(&e.to_string());
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Config values taken from the environment
pub fn env_config() -> AppConfig {
    AppConfig {
        grace_period: env::var(ENV_GRACE_PERIOD).ok().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, path = %store.path().display(), "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}
