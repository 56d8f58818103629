use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use rand::Rng;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use provider_cell::services::availability::{CLOSE_HOUR, LUNCH_HOUR, OPEN_HOUR, SLOT_MINUTES};
use provider_cell::services::provider::ProviderService;
use provider_cell::models::{Provider, ProviderSummary};
use shared_config::AppConfig;
use shared_database::supabase::{InsertOutcome, SupabaseClient};
use shared_models::SlotId;
use shared_utils::TimeConverter;

use crate::models::{
    AppointmentRecord, AppointmentResponse, AppointmentSlot, BookingError, CreateAppointmentRequest,
    PatientInfo,
};

/// Validates a booking request against the business-hour rules, re-derives
/// the slot instant from its identifier and attempts an atomic reservation.
///
/// Stateless; constructed per request. The window checks are authoritative
/// at booking time even when the slot id came from an older availability
/// snapshot. Double-booking is ultimately serialized by the store's
/// uniqueness constraint on `(provider_id, start_time)`; the availability
/// pre-check is a best-effort shortcut, not the guard.
pub struct BookingService {
    supabase: SupabaseClient,
    providers: ProviderService,
    time: TimeConverter,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            providers: ProviderService::new(config),
            time: TimeConverter::from_config(config),
        }
    }

    pub async fn book_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, BookingError> {
        info!(
            "Booking slot {} with provider {}",
            request.slot_id, request.provider_id
        );

        let provider = self
            .providers
            .get_provider(&request.provider_id)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .ok_or(BookingError::ProviderNotFound)?;

        let slot_id = SlotId::parse(&request.slot_id).map_err(|_| BookingError::MalformedSlot)?;

        let start = slot_id.start_time();
        let end = start + Duration::minutes(SLOT_MINUTES);
        let local_start = self.time.from_utc(start);

        self.validate_booking_window(&local_start)?;

        if self.is_slot_taken(&request.provider_id, start).await? {
            warn!(
                "Slot {} already confirmed for provider {}",
                request.slot_id, request.provider_id
            );
            return Err(BookingError::SlotTaken {
                slot_id: request.slot_id.clone(),
            });
        }

        let reference_number = generate_reference_number(&local_start);
        let created_at = self.time.local_now().with_timezone(&Utc);

        let row = json!({
            "id": Uuid::new_v4().to_string(),
            "reference_number": reference_number,
            "slot_id": slot_id.as_str(),
            "provider_id": request.provider_id,
            "patient_first_name": request.patient.first_name,
            "patient_last_name": request.patient.last_name,
            "patient_email": request.patient.email,
            "patient_phone": request.patient.phone,
            "reason": request.reason,
            "start_time": start.to_rfc3339(),
            "end_time": end.to_rfc3339(),
            "status": "confirmed",
            "created_at": created_at.to_rfc3339(),
        });

        let outcome: InsertOutcome<AppointmentRecord> = self
            .supabase
            .insert("/rest/v1/appointments", row)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        let record = match outcome {
            InsertOutcome::Inserted(record) => record,
            // A racing request already holds this slot; exactly one insert
            // lands, every other attempt conflicts.
            InsertOutcome::ConstraintViolated => {
                warn!(
                    "Constraint rejected racing insert for provider {} at {}",
                    request.provider_id, start
                );
                return Err(BookingError::SlotTaken {
                    slot_id: request.slot_id.clone(),
                });
            }
        };

        info!(
            "Appointment {} confirmed with reference {}",
            record.id, record.reference_number
        );

        Ok(self.render_response(record, &provider))
    }

    /// Business-window checks, in order: weekend, lunch, opening hours,
    /// past. Lunch removes only an exact 12:00 start; a 12:30 slot stays
    /// bookable, mirroring the generator.
    fn validate_booking_window(&self, local_start: &DateTime<Tz>) -> Result<(), BookingError> {
        if matches!(local_start.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(BookingError::WeekendSlot);
        }

        if local_start.hour() == LUNCH_HOUR && local_start.minute() == 0 {
            return Err(BookingError::LunchSlot);
        }

        if local_start.hour() < OPEN_HOUR || local_start.hour() >= CLOSE_HOUR {
            return Err(BookingError::OutsideBusinessHours);
        }

        if *local_start <= self.time.local_now() {
            return Err(BookingError::SlotInPast);
        }

        Ok(())
    }

    /// Best-effort pre-check for an existing confirmed appointment at this
    /// provider and start instant.
    async fn is_slot_taken(
        &self,
        provider_id: &str,
        start: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&start_time=eq.{}&status=eq.confirmed&select=id",
            provider_id,
            urlencoding::encode(&start.to_rfc3339()),
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?;

        Ok(!existing.is_empty())
    }

    fn render_response(&self, record: AppointmentRecord, provider: &Provider) -> AppointmentResponse {
        AppointmentResponse {
            id: record.id,
            reference_number: record.reference_number,
            status: record.status,
            slot: AppointmentSlot {
                start_time: self.time.format_offset(record.start_time),
                end_time: self.time.format_offset(record.end_time),
            },
            provider: ProviderSummary::from(provider),
            patient: PatientInfo {
                first_name: record.patient_first_name,
                last_name: record.patient_last_name,
                email: record.patient_email,
                phone: record.patient_phone,
            },
            reason: record.reason,
            created_at: self.time.format_offset(record.created_at),
        }
    }
}

/// Human-facing confirmation label, e.g. `REF-20301021-042`. Collisions are
/// possible and acceptable: the reference is a display label, uniqueness
/// lives on `(provider_id, start_time)`.
fn generate_reference_number(local_start: &DateTime<Tz>) -> String {
    let mut rng = rand::thread_rng();
    format!(
        "REF-{}-{:03}",
        local_start.format("%Y%m%d"),
        rng.gen_range(0..1000)
    )
}
