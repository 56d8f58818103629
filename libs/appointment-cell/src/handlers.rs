use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use provider_cell::handlers::parse_date_range;
use provider_cell::services::provider::ProviderService;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AppointmentResponse, CreateAppointmentRequest, ProviderAppointmentsResponse};
use crate::services::{booking::BookingService, schedule::ScheduleService};

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub start_date: String,
    pub end_date: String,
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    request.validate()?;

    let booking_service = BookingService::new(&state);
    let appointment = booking_service.book_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn list_provider_appointments(
    State(state): State<Arc<AppConfig>>,
    Path(provider_id): Path<String>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<ProviderAppointmentsResponse>, AppError> {
    let provider_service = ProviderService::new(&state);
    provider_service
        .get_provider(&provider_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))?;

    let (start_date, end_date) = parse_date_range(&query.start_date, &query.end_date)?;

    let schedule_service = ScheduleService::new(&state);
    let appointments = schedule_service
        .provider_appointments(&provider_id, start_date, end_date)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(ProviderAppointmentsResponse {
        provider_id,
        appointments,
    }))
}
