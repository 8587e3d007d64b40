use chrono::{DateTime, Local, Timelike, Utc};
use chrono_tz::Tz;

use crate::entities::TimeDetection;

pub fn is_night_hour(hour: u32) -> bool {
    hour >= 22 || hour < 6
}

pub fn is_night_time_at(now: DateTime<Utc>, timezone: &str) -> bool {
    let hour = match timezone.parse::<Tz>() {
        Ok(tz) => now.with_timezone(&tz).hour(),
        Err(err) => {
            tracing::warn!(timezone, %err, "unknown timezone, using system time");
            now.with_timezone(&Local).hour()
        }
    };

    is_night_hour(hour)
}

pub fn resolve_night_time(
    explicit: Option<bool>,
    timezone: &str,
    now: DateTime<Utc>,
) -> (bool, TimeDetection) {
    match explicit {
        Some(is_night_time) => (is_night_time, TimeDetection::Manual),
        None => (is_night_time_at(now, timezone), TimeDetection::AutoDetected),
    }
}

#[test]
fn night_window_boundaries() {
    assert!(is_night_hour(22));
    assert!(is_night_hour(23));
    assert!(is_night_hour(0));
    assert!(is_night_hour(5));
    assert!(!is_night_hour(6));
    assert!(!is_night_hour(12));
    assert!(!is_night_hour(21));
}

#[test]
fn evaluates_in_requested_timezone() {
    use chrono::TimeZone;

    // 17:00 UTC is 22:30 in Kolkata and 13:00 in New York
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 17, 0, 0).unwrap();

    assert!(is_night_time_at(now, "Asia/Kolkata"));
    assert!(!is_night_time_at(now, "America/New_York"));
    assert!(!is_night_time_at(now, "UTC"));
}

#[test]
fn unknown_timezone_uses_local_clock() {
    let now = Utc::now();
    let expected = is_night_hour(now.with_timezone(&Local).hour());

    assert_eq!(is_night_time_at(now, "Mars/Olympus_Mons"), expected);
}

#[test]
fn explicit_flag_wins() {
    use chrono::TimeZone;

    let noon_in_kolkata = Utc.with_ymd_and_hms(2024, 3, 15, 6, 30, 0).unwrap();

    assert_eq!(
        resolve_night_time(Some(true), "Asia/Kolkata", noon_in_kolkata),
        (true, TimeDetection::Manual)
    );
    assert_eq!(
        resolve_night_time(None, "Asia/Kolkata", noon_in_kolkata),
        (false, TimeDetection::AutoDetected)
    );
}
