use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{config_from_env, router, AppState};

/// Main entry point for the LIMS gateway
///
/// Serves the REST API (default 0.0.0.0:3000) and forwards authenticated calls to the
/// laboratory API. Stops cleanly on Ctrl-C or SIGTERM.
///
/// # Environment Variables
/// - `LIMS_API_URL` (or `NEXT_PUBLIC_API_URL`): upstream laboratory API base URL
/// - `LIMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `LIMS_UPSTREAM_TIMEOUT_SECS`: upstream request timeout, `0` disables (default: 30)
/// - `LIMS_PAGE_SIZE`: default list page size (default: 10)
///
/// # Returns
/// * `Ok(())` - If the server starts, runs and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lims_run=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config_from_env()?;
    let rest_addr = cfg.rest_addr();

    tracing::info!("++ Starting LIMS REST on {}", rest_addr);
    match cfg.upstream_timeout() {
        Some(timeout) => tracing::info!(
            "++ Upstream {} (timeout {}s)",
            cfg.api_base_url(),
            timeout.as_secs()
        ),
        None => tracing::info!("++ Upstream {} (no timeout)", cfg.api_base_url()),
    }

    let app = router(AppState::from_config(&cfg)?);

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("++ LIMS REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {:?}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
