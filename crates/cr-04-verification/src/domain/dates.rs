//! Graduation date display.
//!
//! The backend renders dates in a long form such as
//! `"Sun Jun 15 00:00:00 IST 2025"`; records may carry ISO dates. Display
//! never fails: unreadable values are shown as given.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const UNKNOWN_DATE: &str = "Unknown date";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `"Jun 2025"` from a long-form or ISO timestamp.
///
/// Missing or blank input gives [`UNKNOWN_DATE`]; anything unparseable is
/// returned unchanged.
pub fn display_month_year(raw: Option<&str>) -> String {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    if let Some(month_year) = long_form_month_year(value) {
        return month_year;
    }
    if let Some(date) = parse_iso(value) {
        return date.format("%b %Y").to_string();
    }
    value.to_string()
}

/// `"2025-06-15"` from an ISO-like date or timestamp, otherwise the raw value.
pub fn display_date(raw: Option<&str>) -> String {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };
    match parse_iso(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    }
}

/// `Dow Mon dd hh:mm:ss Zone yyyy`: second token is the month, the year is
/// the last four-digit token.
fn long_form_month_year(value: &str) -> Option<String> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() < 3 || tokens[0].chars().count() != 3 {
        return None;
    }
    let month = MONTHS
        .iter()
        .find(|m| m.eq_ignore_ascii_case(tokens[1]))?;
    let year = tokens[2..]
        .iter()
        .rev()
        .find(|t| t.len() == 4 && t.chars().all(|c| c.is_ascii_digit()))?;
    Some(format!("{month} {year}"))
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
