pub mod analysis;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::middleware::request_id;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config().max_body_bytes;

    let api_routes = Router::new()
        .nest("/analysis", analysis::router())
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
