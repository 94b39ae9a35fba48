mod analysis;
mod comparison;
mod config;
mod editor;
mod errors;
mod extraction;
mod llm_client;
mod parser;
mod recommendation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::comparison::fit_scoring::{FitScorer, KeywordFitScorer, LlmFitScorer};
use crate::config::Config;
use crate::editor::EditorStore;
use crate::llm_client::{OllamaClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-tailor API v{}", env!("CARGO_PKG_VERSION"));

    let client = OllamaClient::new(
        &config.ollama_base_url,
        config.ollama_model.clone(),
        config.llm_timeout,
        config.llm_max_retries,
    )?;
    info!(
        "LLM client initialized (model: {}, base url: {})",
        client.model(),
        client.base_url()
    );
    let llm: Arc<dyn TextGenerator> = Arc::new(client);

    let fit_scorer: Arc<dyn FitScorer> = if config.enable_llm_matching {
        info!("Fit scoring: LLM comparison");
        Arc::new(LlmFitScorer(llm.clone()))
    } else {
        info!("Fit scoring: keyword comparison");
        Arc::new(KeywordFitScorer)
    };

    let state = AppState {
        llm,
        fit_scorer,
        editors: EditorStore::new(),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
