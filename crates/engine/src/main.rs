//! `workforce-setup`: prepare a PostgreSQL database for the engine.
//!
//! Connects, health-checks, applies migrations, and seeds the first
//! administrator when `ADMIN_EMAIL` is set.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workforce_core::clock::SystemClock;
use workforce_core::password::Argon2Verifier;
use workforce_engine::config::{AdminSeed, DatabaseConfig, EngineConfig};
use workforce_engine::store::PgStore;
use workforce_engine::Workforce;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workforce_engine=debug,workforce_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let db_config = DatabaseConfig::from_env()?;
    let engine_config = EngineConfig::from_env()?;
    let admin_seed = AdminSeed::from_env()?;
    tracing::info!(
        max_connections = db_config.max_connections,
        stats_utc_offset = %engine_config.stats_utc_offset,
        "Loaded configuration"
    );

    // --- Database ---
    let pool = workforce_db::create_pool(&db_config.url, db_config.max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    workforce_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    workforce_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Admin seed ---
    let Some(seed) = admin_seed else {
        tracing::info!("ADMIN_EMAIL not set; skipping admin seed");
        return Ok(());
    };
    let workforce = Workforce::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(SystemClock),
        Arc::new(Argon2Verifier),
        engine_config,
    );
    workforce
        .ensure_admin(&seed)
        .await
        .context("Failed to seed admin")?;

    Ok(())
}
