use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use shared_config::AppConfig;

/// Converts between the configured clinic timezone and UTC.
///
/// All persisted instants are UTC; everything shown to a client goes through
/// this converter so it carries the clinic zone's offset. DST resolution is
/// whatever the IANA zone database says: a wall-clock time repeated by a
/// fall-back transition resolves to the earlier offset, a wall-clock time
/// skipped by a spring-forward transition does not exist.
#[derive(Debug, Clone, Copy)]
pub struct TimeConverter {
    tz: Tz,
}

impl TimeConverter {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.clinic_timezone)
    }

    /// Current instant on the clinic's wall clock.
    pub fn local_now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Interpret a zone-less datetime as clinic wall-clock time and convert
    /// to UTC. `None` when the wall-clock time was skipped by a DST jump.
    pub fn to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    }

    /// Clinic wall-clock representation of a UTC instant.
    pub fn from_utc(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    /// ISO-8601 with the clinic zone's numeric UTC offset, e.g.
    /// `2025-10-21T10:00:00-04:00`. Never a bare `Z`-suffixed naive string.
    pub fn format_offset(&self, instant: DateTime<Utc>) -> String {
        self.from_utc(instant).to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn toronto() -> TimeConverter {
        TimeConverter::new(chrono_tz::America::Toronto)
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn converts_wall_clock_to_utc_during_daylight_time() {
        // EDT is UTC-4
        let utc = toronto().to_utc(local(2025, 7, 15, 9, 0)).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 7, 15, 13, 0, 0).unwrap());
    }

    #[test]
    fn converts_wall_clock_to_utc_during_standard_time() {
        // EST is UTC-5
        let utc = toronto().to_utc(local(2025, 1, 15, 9, 0)).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 1, 15, 14, 0, 0).unwrap());
    }

    #[test]
    fn round_trips_through_utc() {
        let time = toronto();
        let wall = local(2025, 10, 21, 14, 30);
        let utc = time.to_utc(wall).unwrap();
        assert_eq!(time.from_utc(utc).naive_local(), wall);
    }

    #[test]
    fn skipped_wall_clock_time_does_not_exist() {
        // 2025-03-09 02:30 was jumped over by the spring-forward transition
        assert_eq!(toronto().to_utc(local(2025, 3, 9, 2, 30)), None);
    }

    #[test]
    fn ambiguous_wall_clock_time_takes_earlier_offset() {
        // 2025-11-02 01:30 happens twice; the first occurrence is still EDT
        let utc = toronto().to_utc(local(2025, 11, 2, 1, 30)).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 11, 2, 5, 30, 0).unwrap());
    }

    #[test]
    fn formats_with_explicit_offset() {
        let time = toronto();
        let summer = Utc.with_ymd_and_hms(2025, 7, 15, 13, 0, 0).unwrap();
        let winter = Utc.with_ymd_and_hms(2025, 1, 15, 14, 0, 0).unwrap();
        assert_eq!(time.format_offset(summer), "2025-07-15T09:00:00-04:00");
        assert_eq!(time.format_offset(winter), "2025-01-15T09:00:00-05:00");
    }
}
