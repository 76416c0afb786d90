//! Mock chat backend: serves `/status`, `/chat` and the debug key
//! endpoints locally so `chatline` can be tried without a model.
//!
//! With no API key every message gets a canned local reply. Once a key is
//! set (`MOCK_CHAT_KEY` or `POST /debug/set_key`), messages containing
//! `fail` or `quota` produce the backend's error bodies, fallback answer
//! included.

mod config;
mod error;
mod replies;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(
        mode = %config.mode,
        model = %config.model,
        has_key = config.api_key.is_some(),
        "mock chat configured"
    );

    let listen_port = config.listen_port;
    let app = router(Arc::new(AppState::new(config)));

    let addr = format!("127.0.0.1:{listen_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(address = %addr, "mock chat listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
