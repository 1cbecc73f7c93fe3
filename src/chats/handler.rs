use std::sync::Arc;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use crate::auth::CallerIdentity;
use crate::chats::chat_service::ChatService;
use crate::chats::{ChatList, ChatsQueryParam};
use crate::core::AppState;
use crate::errors::AppResponse;
use crate::utils::{check_company_admin, validate_company_id};

pub async fn handle_list_chats(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Query(params): Query<ChatsQueryParam>,
) -> AppResponse<Json<ChatList>> {

    let company_id = validate_company_id(&params.company_id)?;
    check_company_admin(&state, &caller.user_id, company_id).await?;
    let chats = ChatService::list_chats(state, company_id).await?;
    Ok(Json(chats))
}
