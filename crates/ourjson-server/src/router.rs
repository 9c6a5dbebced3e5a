use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all OurJSON endpoints.
///
/// Unknown paths get a JSON 404 and unsupported methods on known paths a
/// JSON 405.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handler::banner_handler).fallback(handler::method_not_allowed))
        .route(
            "/healthz",
            get(handler::health_handler).fallback(handler::method_not_allowed),
        )
        .route(
            "/bins",
            post(handler::create_bin).fallback(handler::method_not_allowed),
        )
        .route(
            "/bins/",
            get(handler::missing_bin_id)
                .put(handler::missing_bin_id)
                .fallback(handler::method_not_allowed),
        )
        .route(
            "/bins/:bin_id",
            get(handler::read_bin)
                .put(handler::update_bin)
                .fallback(handler::method_not_allowed),
        )
        .route(
            "/export",
            post(handler::export_bins).fallback(handler::method_not_allowed),
        )
        .fallback(handler::not_found_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
