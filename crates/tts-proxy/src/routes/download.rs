use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::AppState;
use super::error::{RouteError, error_details};

const CODE: &str = "download_failed";

#[derive(Debug, serde::Deserialize)]
pub(crate) struct DownloadQuery {
    pub url: Option<String>,
}

/// Fetches the provider's storage URL server-side and streams the bytes
/// back, so browser clients never hit the cross-origin restriction.
pub(crate) async fn handler(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, RouteError> {
    let url = query
        .url
        .filter(|u| !u.is_empty())
        .ok_or(RouteError::MissingAudioUrl)?;

    tracing::info!(url = %url, "download_audio_request");

    let response = state
        .client
        .get(&url)
        .send()
        .await
        .map_err(|e| RouteError::upstream(CODE, e))?;

    if !response.status().is_success() {
        return Err(RouteError::UpstreamStatus {
            code: CODE,
            details: error_details(response).await,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RouteError::upstream(CODE, e))?;

    tracing::debug!(bytes = bytes.len(), "audio_downloaded");

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response())
}
