//! HTTP client for a remote scoring engine.
//!
//! Speaks a minimal JSON contract mirroring the gateway's own envelope: the
//! engine is POSTed `{"prompt", "response", "metadata"}` and answers with
//! either `{"scores", "explanation", "details"}` or `{"error"}`.

use serde_json::Value;

use super::{EngineError, EngineEvaluation, ScoringEngine};

/// Default per-request deadline, in seconds.
///
/// The upstream contract leaves hang behavior undefined; without a deadline a
/// stuck engine would pin the calling request forever, so the client imposes
/// one. Overridable via [`RemoteScoringEngine::with_timeout`].
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// [`ScoringEngine`] implementation backed by a remote HTTP evaluator.
#[derive(Debug, Clone)]
pub struct RemoteScoringEngine {
    /// URL of the engine's evaluation endpoint.
    pub endpoint: String,
    /// Per-request deadline in seconds.
    pub timeout_secs: u64,
    client: reqwest::Client,
}

impl RemoteScoringEngine {
    /// Create a client for the engine at `endpoint` with the default
    /// deadline.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, EngineError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with an explicit per-request deadline in seconds.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            timeout_secs,
            client,
        })
    }
}

#[async_trait::async_trait]
impl ScoringEngine for RemoteScoringEngine {
    async fn evaluate(
        &self,
        prompt: &str,
        response: &str,
        metadata_text: &str,
    ) -> Result<EngineEvaluation, EngineError> {
        let body = serde_json::json!({
            "prompt": prompt,
            "response": response,
            "metadata": metadata_text,
        });

        tracing::debug!(endpoint = %self.endpoint, "invoking scoring engine");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::DeadlineExceeded(self.timeout_secs)
                } else {
                    EngineError::Transport(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| EngineError::Malformed(e.to_string()))?;

        decode_engine_payload(payload)
    }
}

/// Decode an engine response body into an evaluation triple.
///
/// An `{"error": ...}` payload is the engine reporting its own failure and
/// maps to [`EngineError::Rejected`]; anything that is neither an error nor
/// a complete triple is malformed.
pub(crate) fn decode_engine_payload(payload: Value) -> Result<EngineEvaluation, EngineError> {
    if let Some(error) = payload.get("error") {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(EngineError::Rejected(message));
    }

    serde_json::from_value(payload).map_err(|e| EngineError::Malformed(e.to_string()))
}
