mod config;
mod errors;
mod extract;
mod generation;
mod llm_client;
mod models;
mod pipeline;
mod render;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

/// Tailors a resume and cover letter to a job description.
#[derive(Parser)]
#[command(name = "tailor", version)]
struct Args {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?.with_overrides(args.host, args.port);

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Tailor v{}", env!("CARGO_PKG_VERSION"));

    if config.api_key.is_none() {
        warn!("XAI_API_KEY is not set; every generation request will fail until it is configured");
    }

    let llm = LlmClient::new(config.api_key.clone(), config.llm.clone())
        .context("Failed to build HTTP client")?;
    info!(
        "LLM client initialized (model: {}, temperature: {}, max_tokens: {}, timeout: {}s)",
        llm.settings().model,
        llm.settings().temperature,
        llm.settings().max_tokens,
        llm.settings().timeout_secs
    );

    let state = AppState {
        generator: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
