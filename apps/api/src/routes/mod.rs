pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/applications",
            post(handlers::handle_create_application),
        )
        .route(
            "/api/v1/artifacts/:file_name",
            get(handlers::handle_get_artifact),
        )
        .with_state(state)
}
