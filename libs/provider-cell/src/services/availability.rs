use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::SlotId;
use shared_utils::TimeConverter;

use crate::models::Slot;

/// Business-hours rules, expressed on the clinic's wall clock.
pub const OPEN_HOUR: u32 = 9;
pub const CLOSE_HOUR: u32 = 17;
pub const LUNCH_HOUR: u32 = 12;
pub const SLOT_MINUTES: i64 = 30;

/// Derive the universe of bookable slots for a provider over an inclusive
/// local date range.
///
/// Rules: Saturdays and Sundays are skipped; starts run every half hour from
/// 09:00 through 16:30; lunch removes only the slot starting exactly at
/// 12:00, so 12:30 remains bookable and runs to 13:00; slots whose start is
/// at or before `now` are dropped entirely, not marked unavailable.
/// Wall-clock times erased by a DST spring-forward do not exist and produce
/// no slot.
///
/// Callers validate the date range and provider before invoking; an empty
/// range simply yields no slots.
pub fn generate_slots(
    provider_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    now: DateTime<Utc>,
    booked: &HashSet<String>,
    time: &TimeConverter,
) -> Vec<Slot> {
    let mut slots = Vec::new();

    let mut date = start_date;
    while date <= end_date {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            for hour in OPEN_HOUR..CLOSE_HOUR {
                for minute in [0, 30] {
                    if hour == LUNCH_HOUR && minute == 0 {
                        continue;
                    }

                    let wall = match date.and_hms_opt(hour, minute, 0) {
                        Some(wall) => wall,
                        None => continue,
                    };
                    let start = match time.to_utc(wall) {
                        Some(start) => start,
                        None => continue,
                    };

                    if start <= now {
                        continue;
                    }

                    let id = SlotId::new(provider_id, start);
                    let available = !booked.contains(id.as_str());

                    slots.push(Slot {
                        id,
                        start,
                        end: start + Duration::minutes(SLOT_MINUTES),
                        available,
                    });
                }
            }
        }

        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    slots
}

pub struct AvailabilityService {
    supabase: SupabaseClient,
    time: TimeConverter,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            time: TimeConverter::from_config(config),
        }
    }

    /// Compute the candidate slots for a provider, reconciled against the
    /// confirmed bookings already in the store.
    pub async fn available_slots(
        &self,
        provider_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Slot>> {
        debug!(
            "Calculating slots for provider {} from {} to {}",
            provider_id, start_date, end_date
        );

        let booked = self.booked_slot_ids(provider_id, start_date, end_date).await?;
        let slots = generate_slots(provider_id, start_date, end_date, Utc::now(), &booked, &self.time);

        debug!(
            "Generated {} slots, {} already booked",
            slots.len(),
            slots.iter().filter(|s| !s.available).count()
        );

        Ok(slots)
    }

    /// Confirmed slot ids for a provider between local start-of-day and
    /// end-of-day bounds, queried against the UTC instants the store holds.
    async fn booked_slot_ids(
        &self,
        provider_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<HashSet<String>> {
        let range_start = self
            .time
            .to_utc(start_date.and_hms_opt(0, 0, 0).unwrap())
            .ok_or_else(|| anyhow!("start of {} does not exist in the clinic timezone", start_date))?;
        let range_end = self
            .time
            .to_utc(end_date.and_hms_opt(23, 59, 59).unwrap())
            .ok_or_else(|| anyhow!("end of {} does not exist in the clinic timezone", end_date))?;

        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&start_time=gte.{}&start_time=lte.{}&status=eq.confirmed&select=slot_id",
            provider_id,
            urlencoding::encode(&range_start.to_rfc3339()),
            urlencoding::encode(&range_end.to_rfc3339()),
        );
        let result: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        Ok(result
            .into_iter()
            .filter_map(|row| row["slot_id"].as_str().map(String::from))
            .collect())
    }
}
