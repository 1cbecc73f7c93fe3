use std::sync::Arc;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use log::debug;
use crate::auth::CallerIdentity;
use crate::core::AppState;
use crate::errors::{AppError, AppResponse};
use crate::messages::message_service::MessageService;
use crate::messages::query_param::{non_blank, ChatActivityQueryParam, MessageDatesQueryParam, MessagesQueryParam};
use crate::messages::{ChatActivityResponse, MessageDatesResponse, MessagesResponse};

pub async fn handle_list_messages(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Query(params): Query<MessagesQueryParam>,
) -> AppResponse<Json<MessagesResponse>> {

    debug!("{} lists messages of '{}'", caller.user_id, params.experience_id);
    let cancel = state.shutdown.child_token();
    let listing = MessageService::list_messages(
        state,
        &params.experience_id,
        non_blank(&params.date),
        cancel
    ).await?;

    Ok(Json(MessagesResponse {
        experience_id: params.experience_id.trim().to_string(),
        listing,
    }))
}

pub async fn handle_chat_activity(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Query(params): Query<ChatActivityQueryParam>,
) -> AppResponse<Json<ChatActivityResponse>> {

    let date = params.date.trim();
    if date.is_empty() {
        return Err(AppError::InvalidDateFormat("date is required".to_string()));
    }
    debug!("{} requests the activity of '{}' on {}", caller.user_id, params.chat_experience_id, date);

    let cancel = state.shutdown.child_token();
    let listing = MessageService::list_messages(
        state,
        &params.chat_experience_id,
        Some(date),
        cancel
    ).await?;

    let date_range = listing.date_range.clone().ok_or_else(|| {
        AppError::ProcessingError("date filtered listing without date range".to_string())
    })?;

    Ok(Json(ChatActivityResponse {
        chat_experience_id: params.chat_experience_id.trim().to_string(),
        date: date.to_string(),
        total_messages: listing.total_count,
        messages: listing.items,
        date_range,
        pages_processed: listing.pages_processed,
        truncated: listing.truncated,
        incomplete: listing.incomplete,
        stop_reason: listing.stop_reason,
        upstream_error: listing.upstream_error,
        dropped_records: listing.dropped_records,
    }))
}

pub async fn handle_message_dates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MessageDatesQueryParam>,
) -> AppResponse<Json<MessageDatesResponse>> {

    let cancel = state.shutdown.child_token();
    let dates = MessageService::discover_message_dates(state, &params.experience_id, cancel).await?;
    Ok(Json(dates))
}
