use anyhow::Result;
use moka::future::Cache;
use sea_orm::Database;
use serde::Deserialize;
use std::time::Duration;

use crate::schemas::AppState;

/// Cache tuning sourced from the environment. The database URL and bind
/// address arrive through the CLI, which carries its own env-backed
/// defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Maximum number of cached responses
    pub cache_capacity: u64,
    /// Cache time-to-live in seconds
    pub cache_ttl_seconds: u64,
}

impl Settings {
    /// Loads settings from the environment, filling in defaults for anything
    /// unset. A `.env` file is honored when present.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("cache_capacity", 1000u64)?
            .set_default("cache_ttl_seconds", 300u64)?
            .add_source(config::Environment::default())
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Initialize application state against the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let settings = Settings::load()?;

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Initialize cache. Invalidation closures let the employee update path
    // drop every cached working-hours range of one employee at once.
    let cache = Cache::builder()
        .max_capacity(settings.cache_capacity)
        .time_to_live(Duration::from_secs(settings.cache_ttl_seconds))
        .support_invalidation_closures()
        .build();

    Ok(AppState { db, cache })
}
