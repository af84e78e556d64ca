//! # locportd: location capability daemon
//!
//! Composition root that drives the live capability layer on top of the
//! virtual hardware and streams every action to stdout.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Construct the virtual hardware and the live `LocationManager` over it
//! - Attach subscribers: one prints each action as a JSON line, one logs
//!   notable actions
//! - Apply properties, request authorization, monitor geofences, start updates
//! - Replay the configured route until it ends or SIGINT arrives
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::sync::watch;
use tokio_stream::StreamExt as _;
use tracing_subscriber::EnvFilter;

use locport_adapter_live::LiveLocationManager;
use locport_adapter_virtual::{RouteReplay, VirtualLocationHardware};
use locport_app::{ActionStream, LocationManager};
use locport_domain::action::Action;

use config::{AuthorizationRequest, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Hardware + capability layer
    let hardware = VirtualLocationHardware::new(&config.simulation);
    let live = Arc::new(
        LiveLocationManager::new(hardware.clone())
            .context("failed to start the live location manager")?,
    );
    let manager = live.to_manager();

    // Subscribers
    let (shutdown, stopped) = watch::channel(false);
    let printer = tokio::spawn(print_actions(manager.delegate(), stopped.clone()));
    let watcher = tokio::spawn(log_actions(manager.delegate(), stopped));

    start_tracking(&manager, &config).await;

    let replay = RouteReplay::start(
        hardware,
        config.simulation.route.clone(),
        config.replay_interval(),
    );

    tokio::select! {
        result = replay => {
            result.context("route replay task failed")?;
        }
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for the interrupt signal")?;
            tracing::info!("interrupt received");
        }
    }

    tracing::info!("shutting down");
    manager.stop_updating_location();
    if config.tracking.heading {
        manager.stop_updating_heading();
    }
    live.flush().await;

    // Subscribers drain what is already queued, then stop.
    shutdown.send_replace(true);
    let (printed, watched) = tokio::join!(printer, watcher);
    printed.context("action printer failed")?;
    watched.context("action logger failed")?;

    Ok(())
}

async fn start_tracking(manager: &LocationManager, config: &Config) {
    if !config.properties.is_empty() {
        manager.set(config.properties.clone());
    }

    match config.tracking.request {
        AuthorizationRequest::WhenInUse => manager.request_when_in_use_authorization(),
        AuthorizationRequest::Always => manager.request_always_authorization(),
    }

    for fence in &config.geofences {
        manager.start_monitoring(fence.region());
    }

    if config.tracking.heading {
        if manager.heading_available() {
            manager.start_updating_heading();
        } else {
            tracing::warn!("heading requested but unavailable on this platform");
        }
    }
    manager.start_updating_location();

    if let Some(purpose) = &config.tracking.full_accuracy_purpose {
        match manager
            .request_temporary_full_accuracy_authorization(purpose.as_str())
            .await
        {
            Ok(()) => tracing::info!(purpose, "full accuracy granted"),
            Err(err) => tracing::warn!(purpose, %err, "full accuracy not granted"),
        }
    }

    tracing::info!(
        authorization = %manager.authorization_status(),
        geofences = config.geofences.len(),
        "tracking started"
    );
}

/// Next action. Once shutdown is requested, only what is already queued.
async fn next_action(
    actions: &mut ActionStream,
    stopped: &mut watch::Receiver<bool>,
) -> Option<Action> {
    if !*stopped.borrow() {
        tokio::select! {
            biased;
            action = actions.next() => return action,
            _ = stopped.changed() => {}
        }
    }
    actions.try_recv()
}

/// Write every action as one JSON line on stdout.
async fn print_actions(mut actions: ActionStream, mut stopped: watch::Receiver<bool>) {
    while let Some(action) = next_action(&mut actions, &mut stopped).await {
        let line = match serde_json::to_string(&action) {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(%err, action = action.name(), "failed to encode action");
                continue;
            }
        };
        if writeln!(std::io::stdout().lock(), "{line}").is_err() {
            tracing::debug!("stdout closed, stopping printer");
            break;
        }
    }
}

/// Log the actions an operator cares about.
async fn log_actions(mut actions: ActionStream, mut stopped: watch::Receiver<bool>) {
    while let Some(action) = next_action(&mut actions, &mut stopped).await {
        match &action {
            Action::DidChangeAuthorization(status) => {
                tracing::info!(%status, "authorization changed");
            }
            Action::DidEnterRegion(region) => {
                tracing::info!(region = %region.identifier, "entered region");
            }
            Action::DidExitRegion(region) => {
                tracing::info!(region = %region.identifier, "exited region");
            }
            other => {
                if let Some(error) = other.error() {
                    tracing::warn!(action = other.name(), %error, "location service failure");
                }
            }
        }
    }
}
