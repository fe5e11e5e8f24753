//! ATHYRE Storefront - Public activewear store.
//!
//! Serves the Rise collection, the session cart, the gift card configurator,
//! and the styling assistant on port 3000 (see `STOREFRONT_PORT`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use athyre_storefront::config::StorefrontConfig;
use athyre_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "athyre_storefront=info,tower_http=debug";

#[tokio::main]
async fn main() -> ExitCode {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            // No subscriber yet
            #[allow(clippy::print_stderr)]
            {
                eprintln!("athyre-storefront: {err}");
            }
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the subscriber that feeds it
    let _sentry = init_sentry(&config);
    init_tracing();

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "storefront stopped");
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr();
    let state = AppState::new(config)?;
    tracing::info!(
        products = state.catalog().products().len(),
        articles = state.catalog().articles().len(),
        "catalog ready"
    );

    let app = athyre_storefront::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("storefront shut down cleanly");
    Ok(())
}

fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Into::into),
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Warnings and errors become Sentry events, info and debug breadcrumbs
    let sentry_layer =
        sentry_tracing::layer().event_filter(|metadata: &tracing::Metadata<'_>| {
            match *metadata.level() {
                tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
                tracing::Level::INFO | tracing::Level::DEBUG => {
                    sentry_tracing::EventFilter::Breadcrumb
                }
                _ => sentry_tracing::EventFilter::Ignore,
            }
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_layer)
        .init();
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
