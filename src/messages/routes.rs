use std::sync::Arc;
use axum::Router;
use axum::routing::get;
use crate::core::AppState;
use crate::messages::handler::{handle_chat_activity, handle_list_messages, handle_message_dates};

pub fn create_message_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/messages", get(handle_list_messages))
        .route("/api/chat-activity", get(handle_chat_activity))
        .route("/api/message-dates", get(handle_message_dates))
}
