//! US-English date and time display formatting.
//!
//! Accepts the date shapes the backend emits (ISO local date-times from
//! `LocalDateTime` fields, plain ISO dates, RFC 3339 timestamps) plus epoch
//! milliseconds. A bare four-digit year (`"2024"`) and a year-month
//! (`"2024-03"`) mean the first day of that period, not a millisecond count.
//! Timestamps with an offset are shown in that offset's wall clock. Anything
//! else renders as `"Invalid Date"`.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

pub const INVALID_DATE: &str = "Invalid Date";

/// Parse any supported date value into a wall-clock date-time.
pub fn parse_date_value(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw.parse::<i32>().ok()?;
        let date = Date::from_calendar_date(year, Month::January, 1).ok()?;
        return Some(PrimitiveDateTime::new(date, Time::MIDNIGHT));
    }

    if let Ok(millis) = raw.parse::<i64>() {
        let dt = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()?;
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }

    let local_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    if let Ok(dt) = PrimitiveDateTime::parse(raw, local_seconds) {
        return Some(dt);
    }

    let local_minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    if let Ok(dt) = PrimitiveDateTime::parse(raw, local_minutes) {
        return Some(dt);
    }

    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Some(PrimitiveDateTime::new(date, Time::MIDNIGHT));
    }

    let (year, month) = raw.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let date = Date::from_calendar_date(year.parse().ok()?, month, 1).ok()?;
    Some(PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

/// `"Jan 5, 2024"`.
pub fn format_date(raw: &str) -> String {
    parse_date_value(raw).map_or_else(|| INVALID_DATE.to_owned(), format_date_value)
}

/// `"02:30 PM"`.
pub fn format_time(raw: &str) -> String {
    parse_date_value(raw).map_or_else(|| INVALID_DATE.to_owned(), format_time_value)
}

pub fn format_date_value(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!("[month repr:short] [day padding:none], [year]"))
        .unwrap_or_else(|_| INVALID_DATE.to_owned())
}

pub fn format_time_value(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!("[hour repr:12]:[minute] [period]"))
        .unwrap_or_else(|_| INVALID_DATE.to_owned())
}
