use std::sync::Arc;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::get;
use http::header::{CONNECTION, CONTENT_LENGTH, ORIGIN};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower::ServiceBuilder;
use crate::auth::require_user;
use crate::auth::routes::create_access_routes;
use crate::chats::routes::create_chat_routes;
use crate::core::AppState;
use crate::errors::AppError;
use crate::messages::routes::create_message_routes;
use crate::notifications::routes::create_notification_routes;

/**
 * Initializing the api routes.
 */
pub fn init_router(app_state: AppState) -> Result<Router, AppError> {
    let origin = app_state.env.cors_origin.parse::<HeaderValue>().map_err(|err| {
        AppError::ProcessingError(format!("Invalid cors origin '{}': {}", app_state.env.cors_origin, err))
    })?;
    let token_header = HeaderName::from_bytes(app_state.env.auth.token_header.as_bytes()).map_err(|err| {
        AppError::ProcessingError(format!("Invalid token header '{}': {}", app_state.env.auth.token_header, err))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE, CONTENT_LENGTH, CONNECTION, ORIGIN, token_header])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let public_routing = Router::new()
        .route("/", get(|| async { "Chat activity tracker is running." }))
        .route("/health", get(|| async { (StatusCode::OK, "Healthy").into_response() }));

    let state = Arc::new(app_state);
    let protected_routing = Router::new() //add new routes here
        .merge(create_message_routes())
        .merge(create_chat_routes())
        .merge(create_access_routes())
        .merge(create_notification_routes())

        //layering bottom to top middleware
        .layer(
            ServiceBuilder::new() //layering top to bottom middleware
                .layer(TraceLayer::new_for_http()) //1
                .layer(cors) //2
                .layer(from_fn_with_state(state.clone(), require_user)) //3..
        )
        .with_state(state);
    Ok(public_routing.merge(protected_routing))
}
