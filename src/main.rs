//! Skillmatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use skillmatch::config::Config;
use skillmatch::embedding::{Embedder, EncoderConfig, SentenceEncoder};
use skillmatch::gateway::{HandlerState, create_router_with_state};
use skillmatch::generation::{
    CareerAdvisor, GenaiGenerator, GenerationCache, JsonFileStore, TextGenerator,
    UnavailableGenerator,
};
use skillmatch::index::{EmbeddingCache, FileVectorStore};
use skillmatch::scoring::ScoringEngine;
use skillmatch::store::{CompetencyStore, JobStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
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
        cache_dir = %config.cache_dir.display(),
        "Skillmatch starting"
    );

    let competencies = Arc::new(CompetencyStore::load(&config.competencies_path));
    let jobs = Arc::new(JobStore::load(&config.jobs_path));

    if config.model_path.is_none() {
        tracing::warn!("No SKILLMATCH_MODEL_PATH configured, running embedder in stub mode");
    }
    let encoder_config = EncoderConfig::from_model_path(config.model_path.clone());
    let encoder = SentenceEncoder::load(encoder_config)?;
    let embedder_mode = if encoder.is_stub() { "stub" } else { "model" };
    tracing::info!(
        mode = embedder_mode,
        model_id = encoder.model_id(),
        dimension = encoder.dimension(),
        "Embedder ready"
    );
    let embedder: Arc<dyn Embedder> = Arc::new(encoder);

    let vector_cache = Arc::new(EmbeddingCache::new(
        Arc::clone(&embedder),
        FileVectorStore::new(config.embedding_cache_path()),
    ));
    let engine = Arc::new(ScoringEngine::new(
        embedder,
        vector_cache,
        Arc::clone(&competencies),
        jobs,
    ));

    // Readiness stays pending until the competency vectors exist.
    let warm_engine = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || match warm_engine.warm_up() {
        Ok(count) => tracing::info!(vectors = count, "Competency vectors warm"),
        Err(e) => tracing::error!(error = %e, "Failed to build competency vectors"),
    });

    let generator: Arc<dyn TextGenerator> = if config.genai_key_present() {
        Arc::new(GenaiGenerator::with_key_var(
            config.genai_model.clone(),
            config.genai_key_var.clone(),
        ))
    } else {
        tracing::warn!(
            key_var = %config.genai_key_var,
            "No provider key configured, text generation disabled"
        );
        Arc::new(UnavailableGenerator::new(format!(
            "{} is not set",
            config.genai_key_var
        )))
    };

    let generation_cache = Arc::new(GenerationCache::open(JsonFileStore::new(
        config.generation_cache_path(),
    )));
    let advisor = Arc::new(CareerAdvisor::new(
        generation_cache,
        generator,
        competencies.block_names(),
    ));

    let state = HandlerState::new(engine, advisor, embedder_mode);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Skillmatch shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SKILLMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
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
    })
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
            Ok(mut sig) => {
                sig.recv().await;
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
