use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Json, Router};
use bronte_gemini::{first_candidate_text, with_retry, GeminiClient, UpstreamError};
use tokio::net::TcpListener;
use tracing::Instrument;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::keys::{resolve_key, KeyPool};
use crate::types::{GenerateBody, GenerateReply, HealthResponse};

struct AppState {
    config: RelayConfig,
    keys: Arc<KeyPool>,
    client: GeminiClient,
    start_time: Instant,
}

pub struct RelayServer {
    config: RelayConfig,
    keys: Arc<KeyPool>,
    client: GeminiClient,
}

impl RelayServer {
    pub fn new(config: RelayConfig, keys: KeyPool) -> Result<Self, RelayError> {
        let client = GeminiClient::new(Duration::from_secs(config.request_timeout_secs))
            .map_err(|e| RelayError::Server(e.to_string()))?
            .with_base_url(config.upstream_url.clone());
        Ok(Self {
            config,
            keys: Arc::new(keys),
            client,
        })
    }

    pub fn router(&self) -> Router {
        let state = Arc::new(AppState {
            config: self.config.clone(),
            keys: self.keys.clone(),
            client: self.client.clone(),
            start_time: Instant::now(),
        });
        Router::new()
            .route(
                "/api/generate",
                axum::routing::post(generate_handler).fallback(method_not_allowed),
            )
            .route("/health", axum::routing::get(health_handler))
            .with_state(state)
    }

    pub async fn start(&self, host: &str, port: u16) -> Result<(), RelayError> {
        let app = self.router();
        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| RelayError::Server(e.to_string()))?;

        tracing::info!("Relay listening on http://{}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| RelayError::Server(e.to_string()))?;

        Ok(())
    }
}

async fn generate_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateReply>, RelayError> {
    let Json(body) = body.map_err(|rejection| RelayError::InvalidBody(rejection.body_text()))?;

    if body.contents.is_empty() {
        return Err(RelayError::MissingContents);
    }

    let model = body
        .model
        .filter(|model| !model.is_empty())
        .or_else(|| state.config.default_model.clone())
        .ok_or(RelayError::MissingModel)?;

    let resolved = resolve_key(
        body.key_selection.as_deref(),
        body.custom_key.as_deref(),
        &state.keys,
    )?;
    let source = resolved.source.to_string();

    tracing::info!(model = %model, key_source = %source, "relaying generate request");

    let retry = state.config.retry();
    let client = &state.client;
    let key = &resolved.key;
    let model_ref = model.as_str();
    let contents = body.contents.as_slice();

    // Every log line in the retry loop inherits these fields.
    let span = tracing::info_span!("generate", model = %model, key_source = %source);
    let text = with_retry(&retry, move |attempt| async move {
        tracing::debug!(attempt, "calling upstream");
        let response = client.generate(model_ref, key, contents).await?;
        match first_candidate_text(&response) {
            Some(text) => Ok(text.to_string()),
            None => Err(UpstreamError::EmptyCandidates),
        }
    })
    .instrument(span)
    .await?;

    Ok(Json(GenerateReply {
        response_text: text,
    }))
}

async fn method_not_allowed() -> RelayError {
    RelayError::MethodNotAllowed
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
