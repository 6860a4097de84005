//! Date detection from number formats and Excel serial conversion
//!
//! xlsx stores dates as plain numbers; only the cell's number format says
//! whether a number is a date. Serials use the 1900 date system.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Whether a number format code displays its value as a date or time
///
/// Bracketed sections (`[Red]`, `[$-409]`) and quoted or escaped literal
/// text are ignored; what remains is a date format if it has any of the
/// `y m d h s` placeholders.
pub fn is_date_format(code: &str) -> bool {
    let mut in_brackets = false;
    let mut in_quotes = false;
    let mut escaped = false;

    for c in code.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '\\' => escaped = true,
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            _ if in_brackets => {}
            // Section separator: only the first (positive) section counts
            ';' => break,
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert an Excel serial to a date and time
///
/// Serials below 60 are shifted by a day to account for the fictitious
/// 1900-02-29. That day itself (serial 60) has no date, so it returns `None`
/// along with negative and out-of-range serials, and stays a plain number.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > 2_958_465.0 {
        return None;
    }
    if (60.0..61.0).contains(&serial) {
        return None;
    }
    let serial = if serial < 60.0 { serial + 1.0 } else { serial };
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch().checked_add_signed(Duration::milliseconds(millis))
}

/// Convert a date and time to an Excel serial
pub fn datetime_to_serial(dt: &NaiveDateTime) -> f64 {
    let millis = dt.signed_duration_since(epoch()).num_milliseconds() as f64;
    let serial = millis / 86_400_000.0;
    if serial < 61.0 {
        serial - 1.0
    } else {
        serial
    }
}
