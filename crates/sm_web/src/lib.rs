use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod form;
pub mod handlers;
pub mod page;
pub mod state;

pub use state::AppState;

/// Uploads above this size are rejected before they reach the PDF decoder.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/summarize", post(handlers::summarize_form))
        .route("/api/summarize", post(handlers::summarize_json))
        .route("/api/summarize/pdf", post(handlers::summarize_pdf))
        .route("/api/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use sm_core::{Error, Result};
}
