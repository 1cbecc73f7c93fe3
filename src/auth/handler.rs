use std::sync::Arc;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use crate::auth::CallerIdentity;
use crate::core::AppState;
use crate::errors::AppResponse;
use crate::upstream::AccessLevel;
use crate::utils::{load_company_access, validate_company_id};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAccessResponse {
    pub company_id: String,
    pub has_access: bool,
    pub access_level: AccessLevel,
    /// Whether the caller may open the activity dashboard.
    pub is_admin: bool,
}

pub async fn handle_company_access(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(company_id): Path<String>,
) -> AppResponse<Json<CompanyAccessResponse>> {

    let company_id = validate_company_id(&company_id)?;
    let decision = load_company_access(&state, &caller.user_id, company_id).await?;

    Ok(Json(CompanyAccessResponse {
        company_id: company_id.to_string(),
        has_access: decision.has_access,
        access_level: decision.access_level,
        is_admin: decision.is_admin(),
    }))
}
