use axum::{
    Json,
    extract::{Path, State},
};

use super::AppState;
use super::error::{RouteError, error_details};

const CODE: &str = "status_check_failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TaskState {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// The simplified task contract re-exposed to clients: whatever vocabulary
/// the provider uses is normalized here, at the boundary.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusResponse {
    pub status: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Read-only task query. Safe to repeat — no upstream side effects.
pub(crate) async fn handler(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<StatusResponse>, RouteError> {
    let creds = state
        .config
        .credentials()
        .ok_or(RouteError::MissingCredentials)?;

    let url = format!("{}/tts/{}", state.config.upstream_base(), task_id);
    let response = state
        .client
        .get(&url)
        .bearer_auth(&creds.secret_key)
        .header("X-User-ID", &creds.user_id)
        .send()
        .await
        .map_err(|e| RouteError::upstream(CODE, e))?;

    if !response.status().is_success() {
        return Err(RouteError::UpstreamStatus {
            code: CODE,
            details: error_details(response).await,
        });
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| RouteError::upstream(CODE, e))?;

    let normalized = normalize(&payload);
    tracing::debug!(task_id = %task_id, status = ?normalized.status, "speech_status_checked");

    Ok(Json(normalized))
}

fn normalize(payload: &serde_json::Value) -> StatusResponse {
    let raw = payload
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    let status = match raw.to_ascii_lowercase().as_str() {
        "created" | "pending" | "queued" => TaskState::Pending,
        "completed" | "complete" | "success" => TaskState::Completed,
        "failed" | "error" => TaskState::Failed,
        _ => TaskState::Processing,
    };

    let audio_url = ["audioUrl", "url"]
        .iter()
        .find_map(|key| payload.get(key))
        .and_then(|v| v.as_str())
        .map(String::from);

    let error = ["error", "error_message"]
        .iter()
        .find_map(|key| payload.get(key))
        .and_then(|v| v.as_str())
        .map(String::from);

    StatusResponse {
        status,
        audio_url,
        error,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn provider_vocabulary_is_normalized() {
        assert_eq!(normalize(&json!({ "status": "CREATED" })).status, TaskState::Pending);
        assert_eq!(normalize(&json!({ "status": "PROCESSING" })).status, TaskState::Processing);
        assert_eq!(normalize(&json!({ "status": "generating" })).status, TaskState::Processing);
        assert_eq!(normalize(&json!({ "status": "COMPLETED" })).status, TaskState::Completed);
        assert_eq!(normalize(&json!({ "status": "FAILED" })).status, TaskState::Failed);
    }

    #[test]
    fn completed_audio_url_is_lifted_from_either_field() {
        let from_url = normalize(&json!({ "status": "COMPLETED", "url": "https://a/b.mp3" }));
        assert_eq!(from_url.audio_url.as_deref(), Some("https://a/b.mp3"));

        let from_audio_url =
            normalize(&json!({ "status": "completed", "audioUrl": "https://c/d.mp3" }));
        assert_eq!(from_audio_url.audio_url.as_deref(), Some("https://c/d.mp3"));
    }

    #[test]
    fn failure_reason_is_lifted() {
        let failed = normalize(&json!({ "status": "FAILED", "error_message": "voice not found" }));
        assert_eq!(failed.status, TaskState::Failed);
        assert_eq!(failed.error.as_deref(), Some("voice not found"));
    }

    #[test]
    fn missing_status_defaults_to_processing() {
        assert_eq!(normalize(&json!({})).status, TaskState::Processing);
    }
}
