//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the LIMS gateway REST API on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server (with OpenAPI/Swagger
//! UI). The workspace's main `lims-run` binary serves the same router with graceful shutdown.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{config_from_env, router, AppState};

/// Main entry point for the LIMS REST API server
///
/// Starts the REST API server on the configured address (default: 0.0.0.0:3000).
/// See [`config_from_env`] for the environment variables read at startup.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the environment configuration is missing or malformed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config_from_env()?;
    let addr = cfg.rest_addr();

    tracing::info!("-- Starting LIMS REST API on {}", addr);
    tracing::info!("-- Upstream laboratory API at {}", cfg.api_base_url());

    let app = router(AppState::from_config(&cfg)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
