//! Matchwell HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use matchwell::{
    BiasClassifier, CachedEmbedder, Config, InMemoryStore, ProviderCompletion, ProviderEmbedder,
    Ranker, RankerConfig,
};
use matchwell_server::gateway::{HandlerState, create_router_with_state};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        mock_provider = config.mock_provider,
        "Matchwell starting"
    );

    let store = match &config.seed_path {
        Some(path) => InMemoryStore::from_json_file(path)?,
        None => {
            tracing::warn!("No MATCHWELL_SEED_PATH configured, starting with an empty store");
            InMemoryStore::new()
        }
    };

    let embedder = ProviderEmbedder::from_config(&config)?;
    let embedder_mode = embedder.mode();
    let embedder = CachedEmbedder::new(embedder, config.embedding_cache_capacity);
    if !embedder.is_enabled() {
        tracing::info!("Embedding cache disabled");
    }

    let completion = ProviderCompletion::from_config(&config);
    let classifier_mode = completion.mode();

    let state = HandlerState::new(
        Ranker::new(embedder, RankerConfig::from_config(&config)),
        BiasClassifier::new(completion),
        Arc::new(store),
    )
    .with_suggestion_top_k(config.suggestion_top_k)
    .with_modes(embedder_mode, classifier_mode);

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Matchwell shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("MATCHWELL_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(matchwell::constants::DEFAULT_PORT);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
