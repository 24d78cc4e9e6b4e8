//! HTTP/WebSocket server setup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::handler::{http, voice, websocket};
use super::signal::shutdown_signal;
use super::state::AppState;

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket::websocket_handler))
            .route("/live/audio", get(voice::voice_handler))
            .route("/api/health", get(http::health_check))
            .route("/users", get(http::get_users))
            .route("/workout/current", get(http::get_current_workout))
            .route("/workout/generate", post(http::generate_workout))
            .route("/history", get(http::get_history))
            .route("/log", post(http::post_log))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub async fn run(&self, host: &str, port: u16) -> std::io::Result<()> {
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
