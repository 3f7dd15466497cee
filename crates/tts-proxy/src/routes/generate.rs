use axum::{Json, extract::State};

use super::AppState;
use super::error::{RouteError, error_details};

const CODE: &str = "generation_failed";

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub text: String,
    pub voice_id: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    pub task_id: String,
}

/// Starts a generation task upstream, injecting the server-side
/// credentials. The opaque task id is the only thing handed back.
pub(crate) async fn handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, RouteError> {
    let creds = state
        .config
        .credentials()
        .ok_or(RouteError::MissingCredentials)?;

    tracing::info!(
        text_chars = req.text.chars().count(),
        voice_id = %req.voice_id,
        "generate_speech_request"
    );

    let url = format!("{}/tts", state.config.upstream_base());
    let response = state
        .client
        .post(&url)
        .bearer_auth(&creds.secret_key)
        .header("X-User-ID", &creds.user_id)
        .json(&serde_json::json!({
            "text": req.text,
            "voice": req.voice_id,
            "quality": "premium",
            "output_format": "mp3",
        }))
        .send()
        .await
        .map_err(|e| RouteError::upstream(CODE, e))?;

    if !response.status().is_success() {
        return Err(RouteError::UpstreamStatus {
            code: CODE,
            details: error_details(response).await,
        });
    }

    #[derive(serde::Deserialize)]
    struct UpstreamCreated {
        id: String,
    }

    let created: UpstreamCreated = response
        .json()
        .await
        .map_err(|e| RouteError::upstream(CODE, e))?;

    tracing::info!(task_id = %created.id, "generation_task_created");

    Ok(Json(GenerateResponse {
        task_id: created.id,
    }))
}
