use axum::extract::{Query, State};
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;

use provider_cell::handlers::{get_availability, list_providers, AvailabilityQuery};
use shared_models::error::AppError;
use shared_models::SlotId;
use shared_utils::test_utils::TestConfig;

fn provider_row(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Dr. Sarah Chen",
        "specialty": "Family Medicine",
        "bio": "Over 15 years of experience in family medicine and preventive care."
    })
}

async fn mount_providers(server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

async fn mount_appointments(server: &MockServer, rows: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(server)
        .await;
}

fn availability_query(provider_id: &str, start: &str, end: &str) -> Query<AvailabilityQuery> {
    Query(AvailabilityQuery {
        provider_id: provider_id.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
    })
}

#[tokio::test]
async fn lists_providers_from_the_store() {
    let server = MockServer::start().await;
    mount_providers(&server, json!([provider_row("provider-1"), provider_row("provider-2")])).await;

    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    let Ok(response) = list_providers(State(state)).await else {
        panic!("expected provider list");
    };

    assert_eq!(response.0.len(), 2);
    assert_eq!(response.0[0].id, "provider-1");
    assert_eq!(response.0[0].specialty, "Family Medicine");
}

#[tokio::test]
async fn availability_rejects_unknown_provider() {
    let server = MockServer::start().await;
    mount_providers(&server, json!([])).await;

    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    let result = get_availability(
        State(state),
        availability_query("provider-404", "2030-06-03", "2030-06-04"),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn availability_rejects_bad_date_format() {
    let server = MockServer::start().await;
    mount_providers(&server, json!([provider_row("provider-1")])).await;

    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    let result = get_availability(
        State(state),
        availability_query("provider-1", "06/03/2030", "2030-06-04"),
    )
    .await;

    assert_matches!(result, Err(AppError::Validation(_)));
}

#[tokio::test]
async fn availability_rejects_inverted_date_range() {
    let server = MockServer::start().await;
    mount_providers(&server, json!([provider_row("provider-1")])).await;

    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    let result = get_availability(
        State(state),
        availability_query("provider-1", "2030-06-04", "2030-06-03"),
    )
    .await;

    assert_matches!(result, Err(AppError::Validation(_)));

    // An equal pair is rejected the same way
    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    let result = get_availability(
        State(state),
        availability_query("provider-1", "2030-06-03", "2030-06-03"),
    )
    .await;
    assert_matches!(result, Err(AppError::Validation(_)));
}

#[tokio::test]
async fn availability_returns_offset_aware_slots() {
    let server = MockServer::start().await;
    mount_providers(&server, json!([provider_row("provider-1")])).await;
    mount_appointments(&server, json!([])).await;

    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    // 2030-06-03 is a Monday; the range covers Monday and Tuesday
    let Ok(response) = get_availability(
        State(state),
        availability_query("provider-1", "2030-06-03", "2030-06-04"),
    )
    .await
    else {
        panic!("expected availability response");
    };

    let body = response.0;
    assert_eq!(body.provider.id, "provider-1");
    assert_eq!(body.slots.len(), 30);
    assert!(body.slots.iter().all(|s| s.available));
    // June in Toronto is EDT; 09:00 wall clock carries an explicit -04:00
    assert_eq!(body.slots[0].start_time, "2030-06-03T09:00:00-04:00");
    assert_eq!(body.slots[0].end_time, "2030-06-03T09:30:00-04:00");
    assert!(body.slots[0].id.starts_with("slot-provider-1-"));
}

#[tokio::test]
async fn availability_marks_booked_slots_unavailable() {
    let server = MockServer::start().await;
    mount_providers(&server, json!([provider_row("provider-1")])).await;

    // 10:00 Toronto (EDT) on the Monday, stored as 14:00 UTC
    let booked_start = Utc.with_ymd_and_hms(2030, 6, 3, 14, 0, 0).unwrap();
    let booked_id = SlotId::new("provider-1", booked_start).to_string();
    mount_appointments(&server, json!([{ "slot_id": booked_id }])).await;

    let state = TestConfig::with_store_url(&server.uri()).to_arc();
    let Ok(response) = get_availability(
        State(state),
        availability_query("provider-1", "2030-06-03", "2030-06-04"),
    )
    .await
    else {
        panic!("expected availability response");
    };

    let slots = response.0.slots;
    let booked: Vec<_> = slots.iter().filter(|s| !s.available).collect();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].id, booked_id);
    assert_eq!(booked[0].start_time, "2030-06-03T10:00:00-04:00");
}
