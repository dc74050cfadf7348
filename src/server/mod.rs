//! HTTP server for the evaluation gateway.
//!
//! Exposes the external scoring engine as an HTTP service the agentic UI
//! posts interactions to.
//!
//! # Endpoints
//!
//! - `GET  /health`   — Liveness probe
//! - `POST /evaluate` — Evaluate one (prompt, response, metadata) triple

pub mod routes;

pub use routes::{app_router, AppState, EvaluationRequest, EvaluationResponse};
