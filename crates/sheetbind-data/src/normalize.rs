//! Cell normalization - raw cells to canonical values.
//!
//! Normalization never fails: a cell that cannot be interpreted becomes
//! [`CellValue::Absent`] so one odd cell does not abort an extraction.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use sheetbind_model::CellValue;
use tracing::warn;

use crate::cell::RawValue;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Last serial of the 1900 date system (9999-12-31)
const MAX_SERIAL: f64 = 2_958_465.0;

/// Normalize one cell
///
/// `None` means no physical cell exists at the position.
pub fn normalize(cell: Option<&RawValue>) -> CellValue {
    match cell {
        None => CellValue::Absent,
        Some(value) => normalize_value(value, false),
    }
}

fn normalize_value(value: &RawValue, in_formula: bool) -> CellValue {
    match value {
        RawValue::Blank(rendered) => CellValue::Text(rendered.clone()),
        RawValue::Number {
            value,
            date_formatted: true,
        } => match serial_to_datetime(*value) {
            Some(dt) => CellValue::DateTime(dt),
            None => {
                warn!("Date formatted cell holds invalid serial {}", value);
                CellValue::Absent
            }
        },
        RawValue::Number { value, .. } => CellValue::Number(*value),
        RawValue::Text(s) => CellValue::Text(s.clone()),
        RawValue::Boolean(b) => CellValue::Boolean(*b),
        RawValue::Error(code) => CellValue::Error(code.clone()),
        RawValue::Date(dt) => CellValue::DateTime(*dt),
        RawValue::Formula { cached, .. } if !in_formula => normalize_value(cached, true),
        RawValue::Formula { expression, .. } => {
            warn!("Formula result is itself a formula ({}), ignoring", expression);
            CellValue::Absent
        }
    }
}

/// Text shown for a cell, used for header names
pub fn render_text(value: &RawValue) -> String {
    normalize(Some(value)).to_string()
}

/// Convert a 1900-system serial date to a calendar date-time
///
/// Serials below 60 fall before the phantom 1900-02-29 and are shifted by
/// one day. The fractional part is the time of day, rounded to the
/// millisecond. Returns `None` for negative, non-finite or out of range
/// serials.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }

    let epoch = if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    let total_millis = (serial * MILLIS_PER_DAY).round() as u64;
    let days = total_millis / MILLIS_PER_DAY as u64;
    let millis = total_millis % MILLIS_PER_DAY as u64;

    let date = epoch.checked_add_days(Days::new(days))?;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(
        (millis / 1000) as u32,
        ((millis % 1000) * 1_000_000) as u32,
    )?;

    Some(date.and_time(time))
}

/// Parse an ISO-like date or date-time string
///
/// Accepts `2024-03-01`, `2024-03-01 08:30:00` and `2024-03-01T08:30:00`
/// with optional fractional seconds.
pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let text = text.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
