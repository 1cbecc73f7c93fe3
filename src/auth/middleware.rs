use std::sync::Arc;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use crate::core::AppState;
use crate::errors::AppError;

/// Resolves the caller from the configured token header (or a bearer token)
/// and makes it available to handlers as `Extension<CallerIdentity>`.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {

    let headers = request.headers();
    let token = headers
        .get(state.env.auth.token_header.as_str())
        .and_then(|value| value.to_str().ok())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("A user token is required.".to_string()))?;

    let identity = state.identity_verifier.verify(token).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
