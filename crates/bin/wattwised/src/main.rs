//! # wattwised: wattwise daemon
//!
//! Composition root that wires the price source, the shared price store and
//! the configured best-price things together and runs the refresh loop.
//!
//! ## Responsibilities
//! - Load configuration (file, env vars) and initialise logging
//! - Construct the aWATTar source, the system clock and the event bus
//! - Construct one best-price handler per `[[best_price]]` table
//! - Every tick: refresh the store when needed, then republish all channels
//! - Shut down on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use wattwise_adapter_awattar::AwattarApi;
use wattwise_app::clock::SystemClock;
use wattwise_app::event_bus::InProcessEventBus;
use wattwise_app::ports::EventPublisher;
use wattwise_app::services::best_price_handler::BestPriceHandler;
use wattwise_app::services::price_store::{PriceStore, RefreshOutcome};
use wattwise_domain::error::WattwiseError;
use wattwise_domain::event::{Event, EventType};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let zone = config.zone()?;
    let clock = SystemClock::new(zone);
    let store = Arc::new(PriceStore::new());
    let source = AwattarApi::new(config.awattar.clone())?;
    let event_bus = InProcessEventBus::new(256);

    let handlers = config
        .best_price
        .iter()
        .map(|thing| {
            BestPriceHandler::new(thing.name.clone(), thing.config, Arc::clone(&store), clock)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if handlers.is_empty() {
        tracing::warn!("no [[best_price]] things configured, only prices will be fetched");
    }

    let logger = tokio::spawn(log_events(event_bus.subscribe()));

    tracing::info!(
        endpoint = source.endpoint(),
        %zone,
        things = handlers.len(),
        interval_secs = config.refresh_interval_secs,
        "wattwised started"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tick(&store, &source, &clock, &event_bus, &handlers).await;
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("shutting down");
                break;
            }
        }
    }

    logger.abort();
    Ok(())
}

async fn tick(
    store: &PriceStore,
    source: &AwattarApi,
    clock: &SystemClock,
    event_bus: &InProcessEventBus,
    handlers: &[BestPriceHandler<SystemClock>],
) {
    if let Some(event) = refresh_event(store.refresh_if_needed(source, clock).await)
        && let Err(err) = event_bus.publish(event).await
    {
        tracing::warn!(error = %error_chain(err), "failed to publish refresh event");
    }

    for handler in handlers {
        handler.refresh_all(event_bus);
    }
}

fn refresh_event(result: Result<RefreshOutcome, WattwiseError>) -> Option<Event> {
    match result {
        Ok(RefreshOutcome::Replaced(count)) => Some(Event::new(
            EventType::PricesRefreshed,
            None,
            serde_json::json!({ "quotes": count }),
        )),
        Ok(RefreshOutcome::Skipped | RefreshOutcome::Empty) => None,
        Err(err) => {
            let error = error_chain(err);
            tracing::error!(%error, "price refresh failed, keeping previous series");
            Some(Event::new(
                EventType::RefreshFailed,
                None,
                serde_json::json!({ "error": error }),
            ))
        }
    }
}

/// `err` followed by each of its sources, colon separated.
fn error_chain(err: WattwiseError) -> String {
    format!("{:#}", anyhow::Error::from(err))
}

async fn log_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => match event.as_channel_update() {
                Some((channel, state)) => tracing::debug!(%channel, %state, "channel updated"),
                None => tracing::info!(event_type = ?event.event_type, data = %event.data, "event"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event logger lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
