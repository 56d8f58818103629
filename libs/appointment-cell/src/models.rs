use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use provider_cell::models::ProviderSummary;
use shared_models::error::AppError;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl PatientInfo {
    /// Boundary contract: names are letters and spaces, email is
    /// shape-checked, phone accepts common numeric punctuation.
    pub fn validate(&self) -> Result<(), String> {
        let name_regex = Regex::new(r"^[a-zA-Z\s]+$").unwrap();
        let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
        let phone_regex =
            Regex::new(r"^[\+]?[(]?[0-9]{3}[)]?[-\s\.]?[0-9]{3}[-\s\.]?[0-9]{4,6}$").unwrap();

        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if value.is_empty() || value.len() > 100 {
                return Err(format!("{} must be between 1 and 100 characters", field));
            }
            if !name_regex.is_match(value) {
                return Err(format!("{} must contain only letters and spaces", field));
            }
        }

        if !email_regex.is_match(&self.email) {
            return Err("Invalid email format".to_string());
        }

        if !phone_regex.is_match(&self.phone) {
            return Err("Invalid phone number format".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub slot_id: String,
    pub provider_id: String,
    pub patient: PatientInfo,
    pub reason: String,
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        self.patient.validate().map_err(AppError::Validation)?;

        if self.reason.len() < 3 || self.reason.len() > 500 {
            return Err(AppError::Validation(
                "reason must be between 3 and 500 characters".to_string(),
            ));
        }

        Ok(())
    }
}

// ==============================================================================
// PERSISTED APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Appointment row as persisted. All instants are UTC; the store's UNIQUE
/// constraint on `(provider_id, start_time)` is the double-booking guard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: String,
    pub reference_number: String,
    pub slot_id: String,
    pub provider_id: String,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub reason: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub reference_number: String,
    pub status: AppointmentStatus,
    pub slot: AppointmentSlot,
    pub provider: ProviderSummary,
    pub patient: PatientInfo,
    pub reason: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAppointment {
    pub id: String,
    pub patient_name: String,
    pub patient_email: String,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAppointmentsResponse {
    pub provider_id: String,
    pub appointments: Vec<ProviderAppointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Provider not found")]
    ProviderNotFound,

    #[error("Invalid slot ID format")]
    MalformedSlot,

    #[error("Appointments cannot be booked on weekends")]
    WeekendSlot,

    #[error("The 12:00 PM slot is reserved for lunch")]
    LunchSlot,

    #[error("Appointments must start between 9:00 AM and 5:00 PM")]
    OutsideBusinessHours,

    #[error("Cannot book appointments in the past")]
    SlotInPast,

    #[error("This time slot has already been booked")]
    SlotTaken { slot_id: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ProviderNotFound => AppError::NotFound(err.to_string()),
            BookingError::MalformedSlot => AppError::Validation(err.to_string()),
            BookingError::WeekendSlot
            | BookingError::LunchSlot
            | BookingError::OutsideBusinessHours
            | BookingError::SlotInPast => AppError::Unprocessable(err.to_string()),
            BookingError::SlotTaken { ref slot_id } => {
                let details = json!({ "slot_id": slot_id });
                AppError::conflict(err.to_string(), details)
            }
            BookingError::Database(msg) => AppError::Database(msg),
        }
    }
}
