use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorDetails {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetails,
    /// Upstream payload forwarded verbatim when the provider rejected the
    /// request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub(crate) enum RouteError {
    #[error("Play.ai credentials are not configured")]
    MissingCredentials,

    #[error("Audio URL is required")]
    MissingAudioUrl,

    /// The request to the provider itself failed (connect, timeout, decode).
    #[error("upstream request failed: {source}")]
    Upstream {
        code: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status. Its payload is
    /// forwarded verbatim as `details`, never reinterpreted.
    #[error("upstream provider rejected the request")]
    UpstreamStatus {
        code: &'static str,
        details: serde_json::Value,
    },
}

impl RouteError {
    pub(crate) fn upstream(code: &'static str, source: reqwest::Error) -> Self {
        Self::Upstream { code, source }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, code, details) = match self {
            Self::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "credentials_not_configured",
                None,
            ),
            Self::MissingAudioUrl => (StatusCode::BAD_REQUEST, "missing_audio_url", None),
            Self::Upstream { code, source } => {
                tracing::error!(code = %code, error = %source, "upstream_request_failed");
                (StatusCode::INTERNAL_SERVER_ERROR, code, None)
            }
            Self::UpstreamStatus { code, details } => {
                tracing::error!(code = %code, details = %details, "upstream_rejected_request");
                (StatusCode::INTERNAL_SERVER_ERROR, code, Some(details))
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
            details,
        });

        (status, body).into_response()
    }
}

/// Best-effort decode of an upstream error body: JSON when it parses,
/// otherwise the raw text.
pub(crate) async fn error_details(response: reqwest::Response) -> serde_json::Value {
    let status = response.status();
    match response.text().await {
        Ok(body) => serde_json::from_str(&body)
            .unwrap_or_else(|_| serde_json::Value::String(body)),
        Err(_) => serde_json::Value::String(format!("upstream returned {status}")),
    }
}
