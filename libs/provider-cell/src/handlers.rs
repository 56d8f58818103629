use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::TimeConverter;

use crate::models::{AvailabilityResponse, Provider, ProviderSummary, TimeSlotResponse};
use crate::services::{availability::AvailabilityService, provider::ProviderService};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub provider_id: String,
    pub start_date: String,
    pub end_date: String,
}

/// Parse a `YYYY-MM-DD` pair and require `end_date` strictly after
/// `start_date`.
pub fn parse_date_range(start_date: &str, end_date: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format. Use YYYY-MM-DD".to_string()))?;
    let end = NaiveDate::parse_from_str(end_date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format. Use YYYY-MM-DD".to_string()))?;

    if end <= start {
        return Err(AppError::Validation(
            "end_date must be after start_date".to_string(),
        ));
    }

    Ok((start, end))
}

#[axum::debug_handler]
pub async fn list_providers(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<Provider>>, AppError> {
    let provider_service = ProviderService::new(&state);

    let providers = provider_service
        .list_providers()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(providers))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let provider_service = ProviderService::new(&state);

    let provider = provider_service
        .get_provider(&query.provider_id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))?;

    let (start_date, end_date) = parse_date_range(&query.start_date, &query.end_date)?;

    let availability_service = AvailabilityService::new(&state);
    let slots = availability_service
        .available_slots(&query.provider_id, start_date, end_date)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let time = TimeConverter::from_config(&state);
    let slots = slots
        .iter()
        .map(|slot| TimeSlotResponse {
            id: slot.id.to_string(),
            start_time: time.format_offset(slot.start),
            end_time: time.format_offset(slot.end),
            available: slot.available,
        })
        .collect();

    Ok(Json(AvailabilityResponse {
        provider: ProviderSummary::from(&provider),
        slots,
    }))
}
