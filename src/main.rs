use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comment_dispatch::config::Config;
use comment_dispatch::dispatch::Dispatcher;
use comment_dispatch::github::GitHubClients;
use comment_dispatch::server::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comment_dispatch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    let registry = config
        .build_registry()
        .context("invalid command configuration")?;
    let clients = GitHubClients::from_token(
        config.github_token.clone(),
        config.github_api_url.as_deref(),
    )
    .context("failed to build GitHub client")?;

    info!(
        commands = ?registry.tokens(),
        handler_timeout = ?config.handler_timeout(),
        "Starting"
    );

    let dispatcher = Dispatcher::new(Arc::new(registry), clients, config.dispatch_config());
    let tracker = TaskTracker::new();
    let app_state = AppState::new(config.webhook_secret.clone(), dispatcher, tracker.clone());
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("listening on {}", config.listen);

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("server error")?;

    // Stop accepting work, then let in-flight commands finish.
    tracker.close();
    info!(in_flight = tracker.len(), "Draining in-flight commands");
    tracker.wait().await;
    info!("Shut down cleanly");

    Ok(())
}

/// Cancels `shutdown` on SIGINT or SIGTERM.
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
    shutdown.cancel();
}
