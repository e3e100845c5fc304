//! Vitrine portfolio backend.
//!
//! Main entry point. Initializes logging, configuration, the database
//! pool, and the external-service clients, then serves HTTP until a
//! shutdown signal arrives.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use vitrine_api::{start_server, AppState, Config};
use vitrine_checkout::StripeCheckoutClient;
use vitrine_core::{storage::Storage, PostgresStore};
use vitrine_mailer::HttpMailer;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.rust_log);

    info!("Starting Vitrine portfolio backend");
    info!(
        database_url = %config.database_url_masked(),
        port = config.port,
        frontend_url = %config.frontend_url,
        "Configuration loaded"
    );

    let db_pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    run_migrations(&db_pool).await?;
    info!("Database schema ready");

    let storage = Arc::new(Storage::new(db_pool.clone()));
    let store = Arc::new(PostgresStore::new(storage));

    let mailer =
        Arc::new(HttpMailer::new(config.to_mailer_config()).context("Failed to build mailer")?);
    let checkout = Arc::new(
        StripeCheckoutClient::new(config.to_checkout_config())
            .context("Failed to build checkout client")?,
    );

    let state =
        AppState::new(store.clone(), store, mailer, checkout, config.webhook_secret.clone());

    let addr = config.parse_server_addr()?;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(state, addr).await {
            error!(error = %e, "Server failed");
        }
    });

    info!(%addr, "Vitrine is ready to receive requests");

    server_handle.await.context("Server task panicked")?;

    db_pool.close().await;
    info!("Database connections closed");

    info!("Vitrine shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the database connection pool with retry logic.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    loop {
        match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connection_timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                // Verify connection works
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(_e) if retries < MAX_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_RETRIES,
                    "Database connection failed, retrying..."
                );
                tokio::time::sleep(RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}

/// Creates the schema if it does not exist yet.
async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            message TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create submissions table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL,
            amount NUMERIC NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create payments table")?;

    // Reconciliation looks up the newest payment per email.
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_payments_email_created
        ON payments(email, created_at DESC)
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create payments email index")?;

    Ok(())
}
