mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use menudeals_feed::{DecodeOptions, SlidingWindowLimiter};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = menudeals_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let limiter = Arc::new(SlidingWindowLimiter::new(
        config.rate_limit_quota,
        config.rate_limit_window(),
    ));
    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&limiter),
        config.rate_limit_cleanup_interval(),
    )
    .await?;

    let state = AppState {
        limiter,
        decode_options: DecodeOptions {
            currency_symbol: config.currency_symbol.clone(),
        },
    };
    let app = build_app(state, config.max_payload_bytes);

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        quota = config.rate_limit_quota,
        window_secs = config.rate_limit_window_secs,
        "menudeals-server listening"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
