//! services/gateway/src/web/mod.rs

pub mod chat_turn;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

// Re-export the handlers to make them easily accessible to the binary
// that builds the web server router.
pub use rest::{
    clear_messages_handler, create_session_handler, delete_session_handler, export_chat_handler,
    get_session_handler, post_message_handler, remove_document_handler, upload_documents_handler,
};

/// Builds the API router. Shared between the server binary and the
/// integration tests so both exercise the same routes.
pub fn app_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{session_id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route(
            "/sessions/{session_id}/messages",
            post(post_message_handler).delete(clear_messages_handler),
        )
        .route(
            "/sessions/{session_id}/documents",
            post(upload_documents_handler),
        )
        .route(
            "/sessions/{session_id}/documents/{document_id}",
            delete(remove_document_handler),
        )
        .route("/sessions/{session_id}/export", get(export_chat_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(app_state)
}
