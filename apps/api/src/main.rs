mod env;

use std::net::SocketAddr;

use axum::{Router, body::Body, http::Request};
use scape_tts_proxy::TtsProxyConfig;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::prelude::*;

use env::env;

fn app(config: TtsProxyConfig) -> Router {
    scape_tts_proxy::router(config)
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let path = request.uri().path();

                if path == "/health" {
                    return tracing::Span::none();
                }

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %path,
                )
            }),
        )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = env();
    let config = TtsProxyConfig::new(&env.tts);
    tracing::info!(
        credentials_configured = config.credentials_configured(),
        "starting_gateway"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], env.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed_to_bind_port");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %addr, "server_listening");

    if let Err(e) = axum::serve(listener, app(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server_error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("shutdown_signal_received");
}
