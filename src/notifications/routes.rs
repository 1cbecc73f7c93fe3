use std::sync::Arc;
use axum::Router;
use axum::routing::post;
use crate::core::AppState;
use crate::notifications::handler::handle_send_push_notification;

pub fn create_notification_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/push-notifications", post(handle_send_push_notification))
}
