//! The scoring engine seam.
//!
//! The gateway treats the scoring engine as a black box invoked with
//! `(prompt, response, metadata_text)` and yielding either an evaluation
//! triple or a failure. The trait here is the single integration point;
//! [`remote::RemoteScoringEngine`] is the production implementation, and
//! tests substitute their own.

pub mod remote;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use remote::RemoteScoringEngine;

/// The triple produced by a scoring engine for one evaluation.
///
/// The gateway passes every field through to the client verbatim — no
/// rounding, validation, or reshaping of scores happens on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEvaluation {
    /// Score name → numeric value.
    pub scores: HashMap<String, f64>,
    /// Human-readable explanation of the scores.
    pub explanation: String,
    /// Opaque evaluator payload, forwarded unmodified.
    pub details: Value,
}

/// Failures surfaced by a scoring engine invocation.
///
/// Every variant renders as human-readable text; the gateway folds all of
/// them into the `{error}` response envelope without distinguishing kinds.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The HTTP request to the engine could not be completed.
    #[error("scoring engine request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a non-success HTTP status.
    #[error("scoring engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The engine's response body did not contain an evaluation triple.
    #[error("scoring engine returned a malformed payload: {0}")]
    Malformed(String),

    /// The engine reported a failure of its own.
    #[error("{0}")]
    Rejected(String),

    /// The engine did not answer within the configured deadline.
    #[error("scoring engine did not answer within {0} seconds")]
    DeadlineExceeded(u64),
}

/// A component able to score one (prompt, response, metadata) interaction.
///
/// Implementations hold no per-request state; the same inputs may be
/// evaluated concurrently from many in-flight requests.
#[async_trait]
pub trait ScoringEngine: Send + Sync {
    /// Evaluate one interaction, returning scores, an explanation, and raw
    /// evaluator details, or a failure describing why no evaluation was
    /// produced.
    async fn evaluate(
        &self,
        prompt: &str,
        response: &str,
        metadata_text: &str,
    ) -> Result<EngineEvaluation, EngineError>;
}
