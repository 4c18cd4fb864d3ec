mod api;
mod middleware;

use anyhow::Context;
use parcelmap_core::{load_sources, SavedStore};
use parcelmap_resolver::ParcelResolver;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = parcelmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let sources = load_sources(&config.sources_path).with_context(|| {
        format!(
            "failed to load sources from {}",
            config.sources_path.display()
        )
    })?;
    let resolver = ParcelResolver::from_config(&config, sources)?;
    let saved = SavedStore::open(&config.saved_path)?;

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        proxied = resolver.is_proxied(),
        taxlot_endpoints = resolver.sources().taxlot_endpoints.len(),
        geocoders = resolver.sources().geocoders.len(),
        saved = saved.entries().len(),
        "starting parcelmap server"
    );

    let app = build_app(AppState::new(resolver, saved));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
