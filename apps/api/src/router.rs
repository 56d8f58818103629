use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use provider_cell::router::provider_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let api = Router::new()
        .merge(provider_routes(state.clone()))
        .merge(appointment_routes(state.clone()));

    Router::new()
        .route("/", get(service_info))
        .with_state(state)
        .nest("/api", api)
}

async fn service_info(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "message": config.app_name,
        "version": config.app_version,
        "endpoints": {
            "providers": "/api/providers",
            "availability": "/api/availability",
            "appointments": "/api/appointments"
        }
    }))
}
