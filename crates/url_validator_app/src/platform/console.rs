//! Console presentation: every stdin line replaces the whole input field.

use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use log::LevelFilter;
use url_validator_core::{Phase, StatusBroadcaster};
use validator_logging::validator_info;

use super::config::{config_path, load_config};
use super::coordinator::Coordinator;
use super::logging;
use super::render::{status_summary, subscribe_console};

const SETTLE_POLL: Duration = Duration::from_millis(25);

pub fn run_app() -> anyhow::Result<()> {
    let path = config_path();
    let config = load_config(&path);
    logging::initialize(config.log_destination, LevelFilter::Info);
    validator_info!("Starting with config {:?} from {:?}", config, path);

    let status = Arc::new(StatusBroadcaster::new());
    subscribe_console(&status);
    let coordinator =
        Coordinator::spawn(&config, status.clone()).context("failed to start validator")?;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        coordinator.set_text(line);
    }

    // Let the last edit clear the debounce window and its probe finish.
    let deadline = Instant::now()
        + config.debounce() * 2
        + config.probe_settings().request_timeout
        + config.probe_settings().connect_timeout;
    thread::sleep(config.debounce() + SETTLE_POLL);
    while !is_settled(&status) && Instant::now() < deadline {
        thread::sleep(SETTLE_POLL);
    }

    println!("{}", status_summary(&status.snapshot()));
    coordinator.shutdown();
    Ok(())
}

fn is_settled(status: &StatusBroadcaster) -> bool {
    let view = status.snapshot();
    view.phase == Phase::Idle && !view.network_activity
}
