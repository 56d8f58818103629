use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::SlotId;

/// Healthcare provider as persisted in the store. Immutable after seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub bio: Option<String>,
}

/// Provider fields embedded in availability and booking responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: String,
    pub name: String,
    pub specialty: String,
}

impl From<&Provider> for ProviderSummary {
    fn from(provider: &Provider) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            specialty: provider.specialty.clone(),
        }
    }
}

/// A candidate half-hour appointment window. Computed fresh on every
/// availability query and never persisted.
#[derive(Debug, Clone)]
pub struct Slot {
    pub id: SlotId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotResponse {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub provider: ProviderSummary,
    pub slots: Vec<TimeSlotResponse>,
}
