use std::sync::Arc;
use axum::Router;
use axum::routing::get;
use crate::auth::handler::handle_company_access;
use crate::core::AppState;

pub fn create_access_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/companies/{company_id}/access", get(handle_company_access))
}
