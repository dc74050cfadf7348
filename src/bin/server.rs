//! agentic-eval HTTP server binary.
//!
//! Starts an axum HTTP server exposing the `/evaluate` endpoint backed by a
//! remote scoring engine.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8000)
//! - `EVAL_ENGINE_URL` — URL of the scoring engine's evaluation endpoint (required)
//! - `EVAL_ENGINE_TIMEOUT_SECS` — per-request engine deadline (default: 120)
//! - `RUST_LOG` — Tracing filter (default: "info,agentic_eval=debug")
//!
//! # Usage
//!
//! ```bash
//! EVAL_ENGINE_URL=http://localhost:9000/run cargo run --bin server
//! ```

use std::sync::Arc;

use agentic_eval::engine::remote::DEFAULT_TIMEOUT_SECS;
use agentic_eval::{app_router, AppState, RemoteScoringEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,agentic_eval=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let engine_url = std::env::var("EVAL_ENGINE_URL")
        .map_err(|_| anyhow::anyhow!("EVAL_ENGINE_URL must be set"))?;
    let timeout_secs = match std::env::var("EVAL_ENGINE_TIMEOUT_SECS") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("EVAL_ENGINE_TIMEOUT_SECS must be an integer"))?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };

    let engine = RemoteScoringEngine::with_timeout(&engine_url, timeout_secs)?;
    let state = AppState::new(Arc::new(engine));
    let app = app_router(state);

    tracing::info!("agentic-eval server starting on {}", bind_addr);
    tracing::info!("scoring engine at {} (deadline {}s)", engine_url, timeout_secs);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health   — liveness probe");
    tracing::info!("  POST /evaluate — evaluate one (prompt, response, metadata) triple");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
