use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use provider_cell::services::availability::{generate_slots, SLOT_MINUTES};
use shared_models::SlotId;
use shared_utils::TimeConverter;

const PROVIDER: &str = "provider-1";

fn toronto() -> TimeConverter {
    TimeConverter::new(chrono_tz::America::Toronto)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// `now` well before the queried range so every candidate slot survives.
fn long_ago() -> DateTime<Utc> {
    utc(2025, 1, 1, 0, 0)
}

fn slots_for_day(day: NaiveDate) -> Vec<provider_cell::Slot> {
    generate_slots(PROVIDER, day, day, long_ago(), &HashSet::new(), &toronto())
}

#[test]
fn weekday_yields_fifteen_slots() {
    // 2025-10-20 is a Monday
    let slots = slots_for_day(date(2025, 10, 20));
    assert_eq!(slots.len(), 15);
    assert!(slots.iter().all(|s| s.available));
}

#[test]
fn slots_run_from_nine_to_half_past_four_local() {
    let time = toronto();
    let slots = slots_for_day(date(2025, 10, 20));

    let first = time.from_utc(slots.first().unwrap().start);
    let last = time.from_utc(slots.last().unwrap().start);

    assert_eq!((first.hour(), first.minute()), (9, 0));
    assert_eq!((last.hour(), last.minute()), (16, 30));
}

#[test]
fn lunch_removes_only_the_noon_start() {
    let time = toronto();
    let slots = slots_for_day(date(2025, 10, 20));

    let starts: Vec<(u32, u32)> = slots
        .iter()
        .map(|s| {
            let local = time.from_utc(s.start);
            (local.hour(), local.minute())
        })
        .collect();

    assert!(!starts.contains(&(12, 0)));
    // The 12:30 slot survives and runs to 13:00
    assert!(starts.contains(&(12, 30)));
    let half_past_noon = slots
        .iter()
        .find(|s| {
            let local = time.from_utc(s.start);
            (local.hour(), local.minute()) == (12, 30)
        })
        .unwrap();
    let end_local = time.from_utc(half_past_noon.end);
    assert_eq!((end_local.hour(), end_local.minute()), (13, 0));
}

#[test]
fn weekends_produce_no_slots() {
    // 2025-10-25/26 are Saturday and Sunday
    assert!(slots_for_day(date(2025, 10, 25)).is_empty());
    assert!(slots_for_day(date(2025, 10, 26)).is_empty());

    // A full week only yields slots on the five weekdays
    let slots = generate_slots(
        PROVIDER,
        date(2025, 10, 20),
        date(2025, 10, 26),
        long_ago(),
        &HashSet::new(),
        &toronto(),
    );
    assert_eq!(slots.len(), 5 * 15);
    let time = toronto();
    assert!(slots.iter().all(|s| {
        let weekday = time.from_utc(s.start).weekday();
        weekday != chrono::Weekday::Sat && weekday != chrono::Weekday::Sun
    }));
}

#[test]
fn no_slot_starts_outside_business_hours() {
    let time = toronto();
    let slots = generate_slots(
        PROVIDER,
        date(2025, 10, 20),
        date(2025, 10, 24),
        long_ago(),
        &HashSet::new(),
        &toronto(),
    );
    assert!(slots.iter().all(|s| {
        let hour = time.from_utc(s.start).hour();
        (9..17).contains(&hour)
    }));
}

#[test]
fn slots_at_or_before_now_are_dropped_entirely() {
    // 14:00 UTC is 10:00 on the Toronto wall clock in October (EDT)
    let now = utc(2025, 10, 20, 14, 0);
    let slots = generate_slots(
        PROVIDER,
        date(2025, 10, 20),
        date(2025, 10, 20),
        now,
        &HashSet::new(),
        &toronto(),
    );

    // 09:00, 09:30 and the 10:00 slot equal to `now` are all gone
    assert_eq!(slots.len(), 12);
    assert!(slots.iter().all(|s| s.start > now));
}

#[test]
fn fully_past_range_is_empty() {
    let now = utc(2025, 10, 25, 0, 0);
    let slots = generate_slots(
        PROVIDER,
        date(2025, 10, 20),
        date(2025, 10, 24),
        now,
        &HashSet::new(),
        &toronto(),
    );
    assert!(slots.is_empty());
}

#[test]
fn booked_slots_are_marked_unavailable() {
    // 10:00 Toronto on the Monday
    let booked_start = utc(2025, 10, 20, 14, 0);
    let booked: HashSet<String> = [SlotId::new(PROVIDER, booked_start).to_string()].into();

    let slots = generate_slots(
        PROVIDER,
        date(2025, 10, 20),
        date(2025, 10, 20),
        long_ago(),
        &booked,
        &toronto(),
    );

    assert_eq!(slots.len(), 15);
    for slot in &slots {
        assert_eq!(slot.available, slot.start != booked_start, "slot {}", slot.id);
    }
}

#[test]
fn slot_ids_round_trip_to_their_start_instant() {
    let slots = slots_for_day(date(2025, 10, 20));
    for slot in &slots {
        let decoded = SlotId::parse(slot.id.as_str()).unwrap();
        assert_eq!(decoded.start_time(), slot.start);
        assert_eq!(slot.end - slot.start, chrono::Duration::minutes(SLOT_MINUTES));
    }
}

#[test]
fn output_is_chronological() {
    let slots = generate_slots(
        PROVIDER,
        date(2025, 10, 20),
        date(2025, 10, 31),
        long_ago(),
        &HashSet::new(),
        &toronto(),
    );
    assert!(slots.windows(2).all(|pair| pair[0].start < pair[1].start));
}

#[test]
fn utc_instants_track_the_dst_transition() {
    // Toronto leaves daylight saving on 2025-11-02; the Friday before is
    // UTC-4, the Monday after is UTC-5.
    let friday = slots_for_day(date(2025, 10, 31));
    let monday = slots_for_day(date(2025, 11, 3));

    assert_eq!(friday.first().unwrap().start, utc(2025, 10, 31, 13, 0));
    assert_eq!(monday.first().unwrap().start, utc(2025, 11, 3, 14, 0));
    assert_eq!(friday.len(), 15);
    assert_eq!(monday.len(), 15);
}

#[test]
fn zones_without_dst_are_unaffected_by_transition_dates() {
    let bogota = TimeConverter::new("America/Bogota".parse::<Tz>().unwrap());
    let slots = generate_slots(
        PROVIDER,
        date(2025, 11, 3),
        date(2025, 11, 3),
        long_ago(),
        &HashSet::new(),
        &bogota,
    );
    assert_eq!(slots.len(), 15);
    // Bogota sits at a fixed UTC-5
    assert_eq!(slots.first().unwrap().start, utc(2025, 11, 3, 14, 0));
}
