//! # agentic-eval
//!
//! HTTP gateway for evaluating agent interactions. A client posts a
//! `(prompt, response, metadata)` triple to `/evaluate`; the gateway
//! normalizes the untyped metadata to text, delegates to an external scoring
//! engine, and answers with a two-variant envelope: either
//! `{scores, explanation, details}` or `{error}`.

pub mod engine;
pub mod metadata;
pub mod server;

pub use engine::{EngineError, EngineEvaluation, RemoteScoringEngine, ScoringEngine};
pub use server::{app_router, AppState, EvaluationRequest, EvaluationResponse};

/// Library version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
