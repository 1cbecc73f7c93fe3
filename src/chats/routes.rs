use std::sync::Arc;
use axum::Router;
use axum::routing::get;
use crate::chats::handler::handle_list_chats;
use crate::core::AppState;

pub fn create_chat_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chats", get(handle_list_chats))
}
