//! Cell value types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The scalar held by a cell
///
/// For formula cells this is the cached result the container stored with the
/// formula; it still takes part in comparisons.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// No value
    #[default]
    Empty,

    /// Numeric value
    Number(f64),

    /// String value
    String(String),

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Date or date-time value
    Date(NaiveDateTime),

    /// Error literal (#VALUE!, #REF!, etc.)
    Error(String),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Whether two captured values differ
    ///
    /// Two empty values never differ, an empty and a non-empty value always
    /// do. Otherwise values are compared with their natural equality: numbers
    /// numerically, strings, booleans, dates and error literals exactly.
    /// Values of different kinds are always different.
    pub fn differs(a: &CellValue, b: &CellValue) -> bool {
        match (a, b) {
            (CellValue::Empty, CellValue::Empty) => false,
            (CellValue::Empty, _) | (_, CellValue::Empty) => true,
            _ => a != b,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::Date(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_differs_empty() {
        assert!(!CellValue::differs(&CellValue::Empty, &CellValue::Empty));
        assert!(CellValue::differs(&CellValue::Empty, &CellValue::Number(0.0)));
        assert!(CellValue::differs(&CellValue::string(""), &CellValue::Empty));
    }

    #[test]
    fn test_differs_numbers() {
        assert!(!CellValue::differs(&10.0.into(), &10.0.into()));
        assert!(!CellValue::differs(&CellValue::Number(0.0), &CellValue::Number(-0.0)));
        assert!(CellValue::differs(&10.0.into(), &20.0.into()));
    }

    #[test]
    fn test_differs_strings_case_sensitive() {
        assert!(!CellValue::differs(&"abc".into(), &"abc".into()));
        assert!(CellValue::differs(&"abc".into(), &"ABC".into()));
    }

    #[test]
    fn test_differs_across_kinds() {
        assert!(CellValue::differs(&CellValue::Number(1.0), &CellValue::Boolean(true)));
        assert!(CellValue::differs(&CellValue::Number(10.0), &"10".into()));
    }

    #[test]
    fn test_differs_dates() {
        assert!(!CellValue::differs(&date(2024, 1, 31), &date(2024, 1, 31)));
        assert!(CellValue::differs(&date(2024, 1, 31), &date(2024, 2, 1)));
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(20.0).to_string(), "20");
        assert_eq!(CellValue::Boolean(false).to_string(), "FALSE");
        assert_eq!(date(2024, 3, 5).to_string(), "2024-03-05 00:00:00");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
