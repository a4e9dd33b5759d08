//! World engine binary for the citysim Shenzhen simulation.
//!
//! # Startup sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `citysim-config.yaml`
//! 3. Restore the snapshot, or found a fresh city
//! 4. Pick the judgment oracle: a language model when `LLM_BACKEND` is
//!    set, the deterministic fallback otherwise
//! 5. Spawn the boundary API
//! 6. Tick until `Ctrl-C`, autosaving along the way
//! 7. Save a final snapshot

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use citysim_core::oracle::Oracle;
use citysim_core::{FakeOracle, SimulationConfig, TickSummary, World, WorldState, persistence};
use citysim_observer::AppState;
use citysim_oracle::LlmOracle;

use crate::error::EngineError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "citysim-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("citysim-engine starting");
    run().await?;
    info!("citysim-engine stopped");
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = load_config(Path::new(CONFIG_PATH)).context("loading configuration")?;
    info!(
        world_name = %config.world.name,
        seed = ?config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        oracle_timeout_ms = config.world.oracle_timeout_ms,
        snapshot = %config.world.snapshot_path.display(),
        "configuration loaded"
    );

    let state = restore_or_found(&config)
        .await
        .context("restoring the world")?;
    let oracle = choose_oracle().context("configuring the judgment oracle")?;
    let world = Arc::new(World::new(state, config.clone(), oracle));

    let app_state = Arc::new(AppState::new(Arc::clone(&world)));
    let _observer = citysim_observer::spawn_observer(config.server.clone(), Arc::clone(&app_state))
        .map_err(EngineError::from)
        .context("starting the boundary API")?;

    tick_loop(&world, &app_state, &config).await;

    if let Err(e) = world.save_snapshot(&config.world.snapshot_path).await {
        error!(error = %e, "final snapshot failed");
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

async fn restore_or_found(config: &SimulationConfig) -> Result<WorldState, EngineError> {
    if let Some(state) = persistence::load(&config.world.snapshot_path).await? {
        return Ok(state);
    }
    let mut rng = config
        .world
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    Ok(WorldState::new(config, &mut rng))
}

fn choose_oracle() -> Result<Arc<dyn Oracle>, EngineError> {
    if let Some(oracle) = LlmOracle::from_env()? {
        return Ok(Arc::new(oracle));
    }
    info!("no LLM backend configured, judging with the fallback oracle");
    Ok(Arc::new(FakeOracle::new()))
}

/// Tick every `tick_interval_ms` until `Ctrl-C`.
async fn tick_loop(world: &World, app_state: &AppState, config: &SimulationConfig) {
    let mut interval = tokio::time::interval(Duration::from_millis(config.world.tick_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval fires immediately.
    interval.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match world.tick().await {
                    Ok(summary) => {
                        log_summary(&summary);
                        app_state.broadcast(&summary);
                        if autosave_due(summary.tick, config.world.autosave_every_ticks)
                            && let Err(e) = world.save_snapshot(&config.world.snapshot_path).await
                        {
                            warn!(error = %e, tick = summary.tick, "autosave failed");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "tick failed, stopping the loop");
                        return;
                    }
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                }
                info!("shutdown requested");
                return;
            }
        }
    }
}

fn autosave_due(tick: u64, every: u64) -> bool {
    tick.checked_rem(every).is_some_and(|r| r == 0)
}

fn log_summary(summary: &TickSummary) {
    info!(
        tick = summary.tick,
        time = %summary.time,
        weather = ?summary.weather,
        alive = summary.alive,
        deaths = summary.deaths.len(),
        evictions = summary.evictions.len(),
        rule_executions = summary.rule_executions,
        "tick complete"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn autosave_cadence() {
        assert!(autosave_due(10, 10));
        assert!(autosave_due(20, 10));
        assert!(!autosave_due(15, 10));
        assert!(!autosave_due(10, 0));
    }

    #[test]
    fn shipped_config_parses() {
        let config = SimulationConfig::parse(include_str!("../../../citysim-config.yaml")).unwrap();
        assert_eq!(config.economy.rent_hour, 8);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn missing_config_means_defaults() {
        let config = load_config(Path::new("/nonexistent/citysim-config.yaml")).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[tokio::test]
    async fn fresh_world_when_no_snapshot() {
        let mut config = SimulationConfig::default();
        config.world.seed = Some(1);
        config.world.snapshot_path = std::env::temp_dir().join("citysim-engine-never-saved.json");
        let state = restore_or_found(&config).await.unwrap();
        assert_eq!(state.bots.len(), 10);
        assert_eq!(state.tick(), 0);
    }
}
