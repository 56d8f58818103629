use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn provider_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/providers", get(handlers::list_providers))
        .route("/availability", get(handlers::get_availability))
        .with_state(state)
}
