//! Dry-run engine binary for the Ringside agent plugin.
//!
//! Stands in for the host fighting engine: it builds two agent controllers
//! around the configured demo policies, drives them through a full match
//! of synthetic snapshots, and logs what they did.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ringside-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Install the Ctrl-C stop handler
//! 4. Run the match on a blocking thread
//! 5. Log the result

mod driver;
mod error;
mod policies;

use std::path::Path;
use std::sync::Arc;

use ringside_core::RingsideConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::driver::MatchControl;
use crate::error::EngineError;

/// Application entry point for the dry-run engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a controller fails to
/// start, or the driver task dies.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. The log level lives there, so this comes first.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("ringside-engine starting");
    info!(
        input_delay_frames = config.controller.input_delay_frames,
        rounds = config.match_settings.rounds,
        frames_per_round = config.match_settings.frames_per_round,
        seed = config.match_settings.seed,
        "Configuration loaded"
    );

    // 3. Install the Ctrl-C stop handler.
    let control = Arc::new(MatchControl::new());
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current tick");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 4. Run the match. Controllers block on OS threads, so keep the driver
    //    off the async workers.
    let driver_control = Arc::clone(&control);
    let summary = tokio::task::spawn_blocking(move || driver::run_match(&config, &driver_control))
        .await
        .map_err(|e| EngineError::Driver {
            message: format!("{e}"),
        })??;

    // 5. Log results.
    driver::log_match_end(&summary);
    info!("ringside-engine shutdown complete");

    Ok(())
}

/// Load configuration from `ringside-config.yaml`.
///
/// Looks for the file relative to the current working directory; a missing
/// file means all defaults.
fn load_config() -> Result<RingsideConfig, EngineError> {
    let config_path = Path::new("ringside-config.yaml");
    if config_path.exists() {
        Ok(RingsideConfig::from_file(config_path)?)
    } else {
        // Defaults still honour RINGSIDE_LOG.
        Ok(RingsideConfig::parse("")?)
    }
}
