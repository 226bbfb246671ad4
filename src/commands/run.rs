use anyhow::{Context, Result};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::env;
use tracing::{info, warn};

use super::migrate::run_pending_migrations;
use crate::settings::Settings;
use crate::stripe_client::StripeConfig;
use crate::web::{AppState, PgPool, start_web_server};

const DB_POOL_SIZE: u32 = 10;

/// Build the r2d2 connection pool from `DATABASE_URL`.
pub fn build_pool() -> Result<PgPool> {
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment variables")?;

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(DB_POOL_SIZE)
        .build(manager)
        .context("failed to build database connection pool")?;

    Ok(pool)
}

/// `run` subcommand: migrate, wire up state, and serve until shutdown.
#[tracing::instrument(skip_all)]
pub async fn handle_run(interface: String, port: u16) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "run");
    });

    let pool = build_pool()?;
    info!("Connected to PostgreSQL, pool size {}", DB_POOL_SIZE);

    // Schema first; nothing below works against a stale database
    {
        let pool = pool.clone();
        tokio::task::spawn_blocking(move || run_pending_migrations(&pool)).await??;
    }

    // Metrics recorder must be installed before the first counter is touched
    crate::metrics::init_metrics();

    // A missing Stripe config keeps the server up for /status and /metrics
    // but answers webhooks with 503 instead of processing them blind
    let stripe_config = match StripeConfig::from_env() {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(error = %e, "Stripe is not configured; webhook endpoint will return 503");
            None
        }
    };

    let settings = Settings::from_env();
    info!(
        pending_fallback_enabled = settings.pending_fallback_enabled,
        "Loaded runtime settings"
    );

    let app_state = AppState {
        pool,
        stripe_config,
        settings,
    };

    start_web_server(interface, port, app_state).await
}
