//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use skillmatch::embedding::{Embedder, SentenceEncoder};
use skillmatch::gateway::{HandlerState, create_router_with_state};
use skillmatch::generation::{
    CareerAdvisor, GenerationCache, JsonFileStore, ScriptedGenerator, TextGenerator,
};
use skillmatch::index::{EmbeddingCache, FileVectorStore};
use skillmatch::scoring::ScoringEngine;
use skillmatch::store::{CompetencyStore, JobStore};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fixtures::write_tables;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    /// Build competency vectors before serving.
    pub warm: bool,
    /// Serve with empty tables instead of the fixture tables.
    pub empty_tables: bool,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            warm: true,
            empty_tables: false,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub generator: Arc<ScriptedGenerator>,
    pub temp_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn generation_cache_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("generation_cache.json")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
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
            Err(_) => tokio::time::sleep(interval).await,
        }
    }
}

/// Spawns a server on an ephemeral port with the stub encoder and a scripted generator.
///
/// Both caches live in a fresh temp dir owned by the returned [`TestServer`].
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let local_addr = listener.local_addr()?;

    let temp_dir = TempDir::new()?;

    let (competencies, jobs) = if config.empty_tables {
        (CompetencyStore::default(), JobStore::default())
    } else {
        let paths = write_tables(temp_dir.path());
        (
            CompetencyStore::load(&paths.competencies),
            JobStore::load(&paths.jobs),
        )
    };
    let competencies = Arc::new(competencies);

    let encoder =
        SentenceEncoder::stub().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let embedder: Arc<dyn Embedder> = Arc::new(encoder);
    let vector_cache = Arc::new(EmbeddingCache::new(
        Arc::clone(&embedder),
        FileVectorStore::new(temp_dir.path().join("embeddings.rkyv")),
    ));
    let engine = Arc::new(ScoringEngine::new(
        embedder,
        vector_cache,
        Arc::clone(&competencies),
        Arc::new(jobs),
    ));

    if config.warm {
        engine
            .warm_up()
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    }

    let generator = Arc::new(ScriptedGenerator::new("generated-"));
    let generation_cache = Arc::new(GenerationCache::open(JsonFileStore::new(
        temp_dir.path().join("generation_cache.json"),
    )));
    let advisor = Arc::new(CareerAdvisor::new(
        generation_cache,
        Arc::clone(&generator) as Arc<dyn TextGenerator>,
        competencies.block_names(),
    ));

    let app = create_router_with_state(HandlerState::new(engine, advisor, "stub"));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        generator,
        temp_dir,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
