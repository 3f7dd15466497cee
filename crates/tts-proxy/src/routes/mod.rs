mod download;
mod error;
mod generate;
mod status;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};

use crate::config::TtsProxyConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: TtsProxyConfig,
    pub client: reqwest::Client,
}

pub fn router(config: TtsProxyConfig) -> Router {
    let state = AppState {
        config,
        client: reqwest::Client::new(),
    };

    Router::new()
        .route("/api/generate-speech", post(generate::handler))
        .route("/api/speech-status/{task_id}", get(status::handler))
        .route("/api/download-audio", get(download::handler))
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "credentialsConfigured": state.config.credentials_configured(),
    }))
}
