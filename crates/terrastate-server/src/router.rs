//! Router assembly for the state backend API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS, tracing and body-limit layers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. `LOCK` and `UNLOCK` are not
/// standard methods, so `/{env}` sends every method other than GET, POST and
/// DELETE to [`handlers::state::extension_method`]. The static `/health`
/// route takes precedence over `/{env}`.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_body_bytes;

    Router::new()
        .route(
            "/health",
            get(handlers::system::health).fallback(handlers::system::method_not_allowed),
        )
        .route("/", any(handlers::state::missing_environment))
        .route(
            "/{env}",
            get(handlers::state::get_state)
                .post(handlers::state::post_state)
                .delete(handlers::state::delete_state)
                .fallback(handlers::state::extension_method),
        )
        .route(
            "/{env}/lock",
            get(handlers::locks::lock_status).fallback(handlers::system::method_not_allowed),
        )
        .fallback(handlers::system::unmapped_route)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
