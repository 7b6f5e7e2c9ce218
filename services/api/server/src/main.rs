use anyhow::Context;
use std::sync::Arc;

use history_api::metrics::ServerMetrics;
use history_api::shutdown::{ShutdownCoordinator, listen_for_shutdown_signals};

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("./../../../db/migrations");

fn main() {
    let config = history_api::Config::load().expect("Failed to load config");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime")
        .block_on(async {
            if let Err(e) = setup(config).await {
                tracing::error!("Fatal error during setup: {e:#}");
                std::process::exit(1);
            }
        });
}

async fn setup(config: history_api::Config) -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize tracing filter")?;

    let use_json = config.log_format != "pretty";

    if use_json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .json();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .pretty();
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    };

    let addr: String = format!("0.0.0.0:{}", config.api_service_port);
    tracing::info!(
        version = history_api::VERSION.unwrap_or("unknown"),
        "Starting search-history service at: {addr}"
    );

    let db_pool = postgres_models::connection::establish_connection(
        config.database_url.clone(),
    )
    .await
    .context("Failed to connect to Postgres")?;

    let db_pool_conn = db_pool
        .get_owned()
        .await
        .context("Failed to get connection from pool for migrations")?;

    postgres_models::connection::run_migrations(db_pool_conn, MIGRATIONS)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to run database migrations")?;

    let shutdown = Arc::new(ShutdownCoordinator::new(db_pool.clone()));

    let metrics = Arc::new(
        ServerMetrics::new().context("Failed to create server metrics")?,
    );

    let app_state = history_api::AppState {
        metrics,
        pool: db_pool,
        config: Arc::new(config),
        shutdown: shutdown.clone(),
    };
    let app = history_api::app(app_state);

    // Spawn shutdown signal handler
    let shutdown_handle = shutdown.clone();
    tokio::spawn(async move {
        listen_for_shutdown_signals().await;
        shutdown_handle.shutdown().await;
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    let shutdown_for_serve = shutdown.clone();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_for_serve.wait_for_shutdown().await
    })
    .await
    .context("Server exited with error")?;

    Ok(())
}
