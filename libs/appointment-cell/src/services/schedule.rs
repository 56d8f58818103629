use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_utils::TimeConverter;

use crate::models::{AppointmentRecord, ProviderAppointment};

/// Read side of a provider's calendar: booked appointments over a local
/// date range, rendered for the clinic's front desk.
pub struct ScheduleService {
    supabase: SupabaseClient,
    time: TimeConverter,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            time: TimeConverter::from_config(config),
        }
    }

    pub async fn provider_appointments(
        &self,
        provider_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<ProviderAppointment>> {
        debug!(
            "Fetching appointments for provider {} from {} to {}",
            provider_id, start_date, end_date
        );

        let range_start = self
            .time
            .to_utc(start_date.and_hms_opt(0, 0, 0).unwrap())
            .ok_or_else(|| anyhow!("start of {} does not exist in the clinic timezone", start_date))?;
        let range_end = self
            .time
            .to_utc(end_date.and_hms_opt(23, 59, 59).unwrap())
            .ok_or_else(|| anyhow!("end of {} does not exist in the clinic timezone", end_date))?;

        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&start_time=gte.{}&start_time=lte.{}&order=start_time.asc",
            provider_id,
            urlencoding::encode(&range_start.to_rfc3339()),
            urlencoding::encode(&range_end.to_rfc3339()),
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        let records: Vec<AppointmentRecord> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<AppointmentRecord>, _>>()?;

        Ok(records
            .into_iter()
            .map(|record| ProviderAppointment {
                id: record.id,
                patient_name: format!("{} {}", record.patient_first_name, record.patient_last_name),
                patient_email: record.patient_email,
                start_time: self.time.format_offset(record.start_time),
                end_time: self.time.format_offset(record.end_time),
                reason: record.reason,
                status: record.status.to_string(),
            })
            .collect())
    }
}
