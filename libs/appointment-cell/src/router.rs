use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments", post(handlers::book_appointment))
        .route(
            "/providers/{provider_id}/appointments",
            get(handlers::list_provider_appointments),
        )
        .with_state(state)
}
