use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Number;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse the textual date forms accepted at a date node.
///
/// Offsets are honoured when present; values without one are read as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Read a number as milliseconds since the Unix epoch.
pub fn date_from_millis(number: &Number) -> Option<DateTime<Utc>> {
    if let Some(millis) = number.as_i64() {
        return DateTime::from_timestamp_millis(millis);
    }
    number
        .as_f64()
        .filter(|millis| millis.is_finite() && millis.abs() < i64::MAX as f64)
        .and_then(|millis| DateTime::from_timestamp_millis(millis.trunc() as i64))
}
