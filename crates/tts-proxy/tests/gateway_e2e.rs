use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use bytes::Bytes;
use serde_json::{Value, json};
use tts_proxy::{Env, TtsProxyConfig};

const AUDIO_BYTES: &[u8] = b"ID3\x03fake-mp3-payload";

fn configured_env() -> Env {
    Env {
        play_ai_user_id: Some("user-1".to_string()),
        play_ai_secret_key: Some("sk-test".to_string()),
    }
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[derive(Clone, Default)]
struct CapturedAuth {
    headers: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
}

impl CapturedAuth {
    fn record(&self, headers: &HeaderMap) {
        let value = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        self.headers
            .lock()
            .unwrap()
            .push((value("authorization"), value("x-user-id")));
    }

    fn single(&self) -> (Option<String>, Option<String>) {
        let captured = self.headers.lock().unwrap();
        assert_eq!(captured.len(), 1);
        captured[0].clone()
    }
}

/// Stand-in for the provider API: creates task "task-1" and answers every
/// status query with the given payload.
fn mock_upstream(captured: CapturedAuth, status_payload: Value) -> Router {
    Router::new()
        .route(
            "/tts",
            post(move |headers: HeaderMap, Json(_body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    captured.record(&headers);
                    Json(json!({ "id": "task-1" }))
                }
            }),
        )
        .route(
            "/tts/{id}",
            get(move |Path(_id): Path<String>| {
                let payload = status_payload.clone();
                async move { Json(payload) }
            }),
        )
        .route(
            "/audio.mp3",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "audio/mpeg")],
                    Bytes::from_static(AUDIO_BYTES),
                )
            }),
        )
}

async fn start_gateway(env: Env, upstream: Option<SocketAddr>) -> SocketAddr {
    let mut config = TtsProxyConfig::new(&env);
    if let Some(addr) = upstream {
        config = config.with_upstream_url(format!("http://{addr}"));
    }
    serve(tts_proxy::router(config)).await
}

#[tokio::test]
async fn health_reports_credential_state() {
    let gateway = start_gateway(Env::default(), None).await;

    let body: Value = reqwest::get(format!("http://{gateway}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["credentialsConfigured"], false);

    let gateway = start_gateway(configured_env(), None).await;
    let body: Value = reqwest::get(format!("http://{gateway}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["credentialsConfigured"], true);
}

#[tokio::test]
async fn generate_without_credentials_is_rejected() {
    let gateway = start_gateway(Env::default(), None).await;

    let response = reqwest::Client::new()
        .post(format!("http://{gateway}/api/generate-speech"))
        .json(&json!({ "text": "Hello world", "voiceId": "voice-a" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "credentials_not_configured");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn generate_injects_server_side_credentials() {
    let captured = CapturedAuth::default();
    let upstream = serve(mock_upstream(captured.clone(), json!({}))).await;
    let gateway = start_gateway(configured_env(), Some(upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{gateway}/api/generate-speech"))
        .json(&json!({ "text": "Hello world", "voiceId": "voice-a" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["taskId"], "task-1");

    let (authorization, user_id) = captured.single();
    assert_eq!(authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(user_id.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn upstream_rejection_is_forwarded_as_details() {
    let upstream = serve(Router::new().route(
        "/tts",
        post(|| async {
            (
                StatusCode::PAYMENT_REQUIRED,
                Json(json!({ "error_message": "out of credits" })),
            )
        }),
    ))
    .await;
    let gateway = start_gateway(configured_env(), Some(upstream)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{gateway}/api/generate-speech"))
        .json(&json!({ "text": "Hello", "voiceId": "voice-a" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "generation_failed");
    assert_eq!(body["details"]["error_message"], "out of credits");
}

#[tokio::test]
async fn status_normalizes_provider_vocabulary() {
    let upstream = serve(mock_upstream(
        CapturedAuth::default(),
        json!({ "status": "COMPLETED", "url": "https://storage.example/clip.mp3" }),
    ))
    .await;
    let gateway = start_gateway(configured_env(), Some(upstream)).await;

    let body: Value = reqwest::get(format!("http://{gateway}/api/speech-status/task-1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "completed");
    assert_eq!(body["audioUrl"], "https://storage.example/clip.mp3");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn status_carries_failure_reason() {
    let upstream = serve(mock_upstream(
        CapturedAuth::default(),
        json!({ "status": "FAILED", "error_message": "voice not found" }),
    ))
    .await;
    let gateway = start_gateway(configured_env(), Some(upstream)).await;

    let body: Value = reqwest::get(format!("http://{gateway}/api/speech-status/task-1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "failed");
    assert_eq!(body["error"], "voice not found");
}

#[tokio::test]
async fn download_requires_a_url() {
    let gateway = start_gateway(configured_env(), None).await;

    let response = reqwest::get(format!("http://{gateway}/api/download-audio"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "missing_audio_url");
    assert_eq!(body["error"]["message"], "Audio URL is required");
}

#[tokio::test]
async fn download_proxies_upstream_bytes() {
    let upstream = serve(mock_upstream(CapturedAuth::default(), json!({}))).await;
    let gateway = start_gateway(configured_env(), Some(upstream)).await;

    let audio_url = format!("http://{upstream}/audio.mp3");
    let response = reqwest::get(format!(
        "http://{gateway}/api/download-audio?url={}",
        urlencoding::encode(&audio_url)
    ))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "audio/mpeg"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), AUDIO_BYTES);
}
