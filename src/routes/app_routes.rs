// routes/app_routes.rs

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    app_state::AppState,
    handlers::message_handlers::{
        get_conversations, get_messages_with, get_messages_with_username, mark_all_read,
        mark_message_read, send_message,
    },
    middleware::auth_middleware::auth_middleware,
};

pub fn create_router(state: AppState) -> Router {
    // `:id` is a user id or a message id depending on the route
    Router::new()
        .route("/api/v1/messages", post(send_message))
        .route("/api/v1/messages/conversations", get(get_conversations))
        .route("/api/v1/messages/with/:username", get(get_messages_with_username))
        .route("/api/v1/messages/:id", get(get_messages_with))
        .route("/api/v1/messages/:id/read", post(mark_message_read))
        .route("/api/v1/messages/:id/read-all", post(mark_all_read))
        .route_layer(from_fn(auth_middleware))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
