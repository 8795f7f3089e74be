//! Test server harness.

use matchwell::{
    BiasClassifier, CachedEmbedder, CannedCompletionClient, InMemoryStore, MarketplaceSeed,
    Ranker, RankerConfig, StubEmbedder,
};
use matchwell_server::gateway::{HandlerState, create_router_with_state};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    /// Seed passed directly to the store.
    pub seed: MarketplaceSeed,
    /// JSON seed file; takes precedence over `seed`.
    pub seed_path: Option<PathBuf>,
    /// Canned answer of the bias model; `Err` makes every classification fail.
    pub classifier_answer: Result<String, String>,
    pub embedding_cache_capacity: u64,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            seed: MarketplaceSeed::default(),
            seed_path: None,
            classifier_answer: Ok("The review is fair and specific.".to_string()),
            embedding_cache_capacity: 1_000,
        }
    }
}

impl TestServerConfig {
    pub fn with_seed(mut self, seed: MarketplaceSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_seed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(path.into());
        self
    }

    pub fn with_classifier_answer(mut self, answer: Result<&str, &str>) -> Self {
        self.classifier_answer = answer.map(str::to_string).map_err(str::to_string);
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<InMemoryStore>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server with offline providers: the stub embedder behind the embedding cache
/// and a canned bias model. Nothing leaves the process.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let store = match &config.seed_path {
        Some(path) => InMemoryStore::from_json_file(path)
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?,
        None => InMemoryStore::from_seed(config.seed),
    };
    let store = Arc::new(store);

    let completion = match config.classifier_answer {
        Ok(answer) => CannedCompletionClient::responding(answer),
        Err(reason) => CannedCompletionClient::failing(reason),
    };

    let embedder = CachedEmbedder::new(StubEmbedder::default(), config.embedding_cache_capacity);
    let state = HandlerState::new(
        Ranker::new(embedder, RankerConfig::default()),
        BiasClassifier::new(completion),
        Arc::clone(&store),
    );

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        store,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
