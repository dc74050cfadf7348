//! Axum route handlers for the agentic-eval HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`   — Returns `{"status": "ok", "version": ..., "service": ...}`
//! - `POST /evaluate` — Accepts `EvaluationRequest`, returns `EvaluationResponse`
//!
//! `/evaluate` always answers HTTP 200 with one of the two envelope variants;
//! callers distinguish outcome by body shape (`scores` vs `error`), never by
//! status code. Only a request the `Json` extractor cannot deserialize (a
//! missing `prompt`/`response`, non-JSON body) is rejected with a client
//! error before the engine is involved.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::engine::ScoringEngine;
use crate::metadata;

/// Shared application state for the HTTP server.
///
/// The engine handle is the only cross-request state; each request is
/// otherwise an independent unit of work.
#[derive(Clone)]
pub struct AppState {
    /// The scoring engine every evaluation is delegated to.
    pub engine: Arc<dyn ScoringEngine>,
}

impl AppState {
    pub fn new(engine: Arc<dyn ScoringEngine>) -> Self {
        Self { engine }
    }
}

/// One agent interaction submitted for evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The prompt given to the agent.
    pub prompt: String,
    /// The agent's response to the prompt.
    pub response: String,
    /// Free-form context for the evaluator. No fixed schema; its shape can
    /// never cause a rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// The two-variant response envelope returned to every caller.
///
/// The variants are mutually exclusive — a failure body carries only the
/// `error` field and a success body never carries one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvaluationResponse {
    /// The engine produced an evaluation; its triple is forwarded verbatim.
    Success {
        scores: HashMap<String, f64>,
        explanation: String,
        details: Value,
    },
    /// The engine failed; the description is the entire payload.
    Failure { error: String },
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/evaluate", post(evaluate_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "agentic-eval",
    }))
}

/// POST /evaluate — evaluate one (prompt, response, metadata) triple.
///
/// The handler:
/// 1. Normalizes the untyped `metadata` field to the text form the engine
///    expects
/// 2. Invokes the scoring engine with (prompt, response, metadata_text)
/// 3. Wraps the engine's triple, or its failure, into the response envelope
///
/// Request/response logging is advisory and never alters the outcome.
async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Json<EvaluationResponse> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        prompt_len = request.prompt.len(),
        response_len = request.response.len(),
        has_metadata = request.metadata.is_some(),
        "incoming evaluation request"
    );
    tracing::debug!(%request_id, request = ?request, "evaluation request body");

    let metadata_text = metadata::normalize(request.metadata.as_ref());

    let response = match state
        .engine
        .evaluate(&request.prompt, &request.response, &metadata_text)
        .await
    {
        Ok(eval) => EvaluationResponse::Success {
            scores: eval.scores,
            explanation: eval.explanation,
            details: eval.details,
        },
        Err(e) => {
            tracing::warn!(%request_id, error = %e, "evaluation failed");
            EvaluationResponse::Failure {
                error: e.to_string(),
            }
        }
    };

    tracing::debug!(%request_id, response = ?response, "outgoing evaluation response");
    Json(response)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    use crate::engine::{EngineError, EngineEvaluation};

    /// Engine double that records every invocation and answers with a fixed
    /// outcome.
    struct RecordingEngine {
        calls: Mutex<Vec<(String, String, String)>>,
        outcome: Result<EngineEvaluation, String>,
    }

    impl RecordingEngine {
        fn succeeding(eval: EngineEvaluation) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome: Ok(eval),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome: Err(message.to_string()),
            })
        }

        fn calls(&self) -> Vec<(String, String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScoringEngine for RecordingEngine {
        async fn evaluate(
            &self,
            prompt: &str,
            response: &str,
            metadata_text: &str,
        ) -> Result<EngineEvaluation, EngineError> {
            self.calls.lock().unwrap().push((
                prompt.to_string(),
                response.to_string(),
                metadata_text.to_string(),
            ));
            match &self.outcome {
                Ok(eval) => Ok(eval.clone()),
                Err(message) => Err(EngineError::Rejected(message.clone())),
            }
        }
    }

    fn correctness_eval() -> EngineEvaluation {
        EngineEvaluation {
            scores: HashMap::from([("correctness".to_string(), 1.0)]),
            explanation: "Correct".to_string(),
            details: json!({}),
        }
    }

    async fn post_evaluate(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/evaluate")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = AppState::new(RecordingEngine::failing("unused"));
        let app = app_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "agentic-eval");
    }

    #[tokio::test]
    async fn test_evaluate_success_passes_triple_through() {
        let engine = RecordingEngine::succeeding(correctness_eval());
        let app = app_router(AppState::new(engine.clone()));

        let (status, body) = post_evaluate(
            app,
            json!({
                "prompt": "2+2?",
                "response": "4",
                "metadata": {"difficulty": "easy"},
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "scores": {"correctness": 1.0},
                "explanation": "Correct",
                "details": {},
            })
        );

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        let (prompt, response, metadata_text) = &calls[0];
        assert_eq!(prompt, "2+2?");
        assert_eq!(response, "4");
        assert_eq!(metadata_text, r#"{"difficulty":"easy"}"#);
    }

    #[tokio::test]
    async fn test_evaluate_failure_maps_to_error_envelope() {
        let engine = RecordingEngine::failing("engine timeout");
        let app = app_router(AppState::new(engine));

        let (status, body) =
            post_evaluate(app, json!({"prompt": "x", "response": "y"})).await;

        // Failure is still an HTTP success; only the body shape differs.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "engine timeout"}));
        assert!(body.get("scores").is_none());
        assert!(body.get("explanation").is_none());
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_evaluate_absent_metadata_normalizes_to_empty() {
        let engine = RecordingEngine::succeeding(correctness_eval());
        let app = app_router(AppState::new(engine.clone()));

        let (status, _) = post_evaluate(app, json!({"prompt": "x", "response": "y"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(engine.calls()[0].2, "");
    }

    #[tokio::test]
    async fn test_evaluate_scalar_metadata_uses_direct_text_form() {
        let engine = RecordingEngine::succeeding(correctness_eval());
        let app = app_router(AppState::new(engine.clone()));

        let (_, _) = post_evaluate(
            app,
            json!({"prompt": "x", "response": "y", "metadata": "free-form note"}),
        )
        .await;

        assert_eq!(engine.calls()[0].2, "free-form note");
    }

    #[tokio::test]
    async fn test_evaluate_rejects_missing_prompt_before_engine() {
        let engine = RecordingEngine::succeeding(correctness_eval());
        let app = app_router(AppState::new(engine.clone()));

        let request = Request::builder()
            .method("POST")
            .uri("/evaluate")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"response": "y"}).to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_evaluate_hostile_metadata_shape_is_never_rejected() {
        let engine = RecordingEngine::succeeding(correctness_eval());
        let app = app_router(AppState::new(engine.clone()));

        let (status, body) = post_evaluate(
            app,
            json!({
                "prompt": "x",
                "response": "y",
                "metadata": [{"a": [1, {"b": null}]}, true, 3.5],
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.get("scores").is_some());
        assert_eq!(engine.calls()[0].2, r#"[{"a":[1,{"b":null}]},true,3.5]"#);
    }

    #[test]
    fn test_failure_envelope_serializes_only_error() {
        let failure = EvaluationResponse::Failure {
            error: "boom".to_string(),
        };
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value, json!({"error": "boom"}));
    }

    #[test]
    fn test_envelope_variants_round_trip() {
        let success: EvaluationResponse = serde_json::from_value(json!({
            "scores": {"helpfulness": 0.75},
            "explanation": "ok",
            "details": {"raw": [1, 2]},
        }))
        .unwrap();
        assert!(matches!(success, EvaluationResponse::Success { .. }));

        let failure: EvaluationResponse =
            serde_json::from_value(json!({"error": "nope"})).unwrap();
        assert!(matches!(failure, EvaluationResponse::Failure { .. }));
    }
}
