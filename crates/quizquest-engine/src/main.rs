//! Engine binary for QuizQuest.
//!
//! Wires the content catalog, the progression ledger and the configured
//! progress store together and drives a scripted playthrough through them,
//! logging every completion, level-up and badge.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `QUIZQUEST_CONFIG` or `quizquest-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the starting content catalog
//! 4. Build the progression ledger (curve, badge rules, replay policy)
//! 5. Open the configured progress store
//! 6. Run the scripted playthrough
//! 7. Log the final profile

mod error;
mod playthrough;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use quizquest_core::{LogFormat, LoggingConfig, ProgressionConfig, StoreBackend};
use quizquest_db::{
    CompletionService, MemoryProgressStore, PgProgressStore, PostgresConfig, PostgresPool,
    ProgressStore,
};
use quizquest_ledger::ProgressionLedger;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::playthrough::{PlaythroughReport, run_playthrough};

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "quizquest-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the playthrough fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = run().await {
        tracing::error!(kind = err.kind().as_str(), error = %err, "quizquest-engine failed");
        return Err(err.into());
    }
    Ok(())
}

async fn run() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        backend = ?config.store.backend,
        replay_policy = ?config.rewards.replay_policy,
        "quizquest-engine starting"
    );

    // 3. Build the starting catalog.
    let catalog = Arc::new(quizquest_content::create_starting_catalog()?);
    info!(
        worlds = catalog.world_count(),
        levels = catalog.total_levels(),
        badges = catalog.badges().len(),
        "Starting catalog built"
    );

    // 4. Build the ledger.
    let ledger = ProgressionLedger::from_config(catalog, &config)?;
    info!(
        base_xp = ledger.curve().base_xp(),
        increment_xp = ledger.curve().increment_xp(),
        rules = ledger.rules().rules().len(),
        "Progression ledger ready"
    );

    // 5-6. Open the store and play.
    let report = match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory progress store");
            let service =
                CompletionService::new(MemoryProgressStore::new(), ledger, config.store.max_retries);
            play(&service, &config).await?
        }
        StoreBackend::Postgres => {
            let pg = PostgresPool::connect(&PostgresConfig::from_store_config(&config.store))
                .await
                ?;
            pg.run_migrations().await?;
            let service = CompletionService::new(
                PgProgressStore::new(pg.pool()),
                ledger,
                config.store.max_retries,
            );
            let report = play(&service, &config).await;
            pg.close().await;
            report?
        }
    };

    // 7. Log the final profile.
    let profile = &report.profile;
    info!(
        owner = %report.owner,
        completions = report.completions,
        xp = profile.xp,
        player_level = profile.player_level,
        xp_for_next_level = profile.xp_for_next_level,
        completed_levels = profile.completed_levels,
        total_levels = profile.total_levels,
        earned_badges = profile.earned_badges.len(),
        locked_badges = profile.locked_badges.len(),
        "Playthrough finished"
    );
    if let Ok(json) = serde_json::to_string(profile) {
        tracing::debug!(profile = %json, "Final profile");
    }

    Ok(())
}

async fn play<S: ProgressStore>(
    service: &CompletionService<S>,
    config: &ProgressionConfig,
) -> Result<PlaythroughReport, EngineError> {
    let today = Utc::now().date_naive();
    run_playthrough(service, &config.playthrough, today).await
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level` when set.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Load configuration from `QUIZQUEST_CONFIG`, falling back to
/// `quizquest-config.yaml`.
///
/// If the file does not exist, defaults are used (with `DATABASE_URL`
/// still applied).
fn load_config() -> Result<(ProgressionConfig, PathBuf), EngineError> {
    let path = std::env::var_os("QUIZQUEST_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = ProgressionConfig::from_file(&path)?;
        Ok((config, path))
    } else {
        let mut config = ProgressionConfig::default();
        config.store.apply_env_overrides();
        Ok((config, path))
    }
}
