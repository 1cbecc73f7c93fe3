use std::sync::Arc;
use axum::extract::State;
use axum::{Extension, Json};
use crate::auth::CallerIdentity;
use crate::core::AppState;
use crate::errors::AppResponse;
use crate::notifications::notification_service::NotificationService;
use crate::notifications::{NewPushNotification, PushNotificationResponse};

pub async fn handle_send_push_notification(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Json(payload): Json<NewPushNotification>,
) -> AppResponse<Json<PushNotificationResponse>> {

    let response = NotificationService::send_push_notification(state, payload, caller.user_id).await?;
    Ok(Json(response))
}
