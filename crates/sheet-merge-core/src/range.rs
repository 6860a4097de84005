//! Range selection: which block of which sheet takes part in a merge

use crate::cell::{CellAddress, CellRange};
use serde_json::Value;

/// A declared rectangular block of cells on one sheet
///
/// Entries are read-only for the lifetime of a merge. An entry whose address
/// could not be parsed keeps `address == None` and selects no cells; an entry
/// without a sheet name matches no sheet. Overlapping entries are neither merged
/// nor deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    /// Name of the sheet the range applies to
    pub sheet_name: Option<String>,
    /// The rectangle, or `None` if the declared address was unusable
    pub address: Option<CellRange>,
}

impl RangeSpec {
    /// Create an entry from a sheet name and an A1-style address
    ///
    /// An address that does not parse produces an inert entry.
    pub fn new<S: Into<String>>(sheet_name: S, address: &str) -> Self {
        Self {
            sheet_name: Some(sheet_name.into()),
            address: Self::parse_address(address),
        }
    }

    /// Build an entry from one `{ "sheetName": ..., "address": ... }` object
    ///
    /// Returns `None` if `value` is not a JSON object. Non-string fields are
    /// treated as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let sheet_name = obj
            .get("sheetName")
            .and_then(Value::as_str)
            .map(str::to_string);

        let address = obj
            .get("address")
            .and_then(Value::as_str)
            .and_then(Self::parse_address);

        Some(Self {
            sheet_name,
            address,
        })
    }

    /// Build the entry list from a `range` configuration value
    ///
    /// Accepts a single object or an array of objects, in declaration order.
    /// Array members that are not objects are skipped; anything else yields an
    /// empty list.
    pub fn list_from_json(value: &Value) -> Vec<Self> {
        match value {
            Value::Object(_) => Self::from_json(value).into_iter().collect(),
            Value::Array(items) => items.iter().filter_map(Self::from_json).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this entry selects cells on the sheet called `name`
    pub fn matches_sheet(&self, name: &str) -> bool {
        self.address.is_some() && self.sheet_name.as_deref() == Some(name)
    }

    /// Whether this entry selects no cells at all
    pub fn is_inert(&self) -> bool {
        self.address.is_none() || self.sheet_name.is_none()
    }

    /// Iterate over the selected coordinates, ascending row then column
    pub fn coordinates(&self) -> impl Iterator<Item = CellAddress> {
        self.address.into_iter().flat_map(|range| range.cells())
    }

    fn parse_address(text: &str) -> Option<CellRange> {
        match CellRange::parse(text) {
            Ok(range) => Some(range),
            Err(e) => {
                tracing::warn!("Ignoring range '{text}': {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_parses_address() {
        let spec = RangeSpec::new("Data", "A1:C10");
        assert_eq!(spec.sheet_name.as_deref(), Some("Data"));
        assert_eq!(spec.address, Some(CellRange::from_indices(1, 1, 10, 3)));
        assert!(spec.matches_sheet("Data"));
        assert!(!spec.matches_sheet("data"));
    }

    #[test]
    fn test_bad_address_is_inert() {
        let spec = RangeSpec::new("Data", "A0:??");
        assert!(spec.address.is_none());
        assert!(spec.is_inert());
        assert!(!spec.matches_sheet("Data"));
        assert_eq!(spec.coordinates().count(), 0);
    }

    #[test]
    fn test_from_json_single_object() {
        let specs = RangeSpec::list_from_json(&json!({"sheetName": "S", "address": "B2"}));
        assert_eq!(specs, vec![RangeSpec::new("S", "B2")]);
    }

    #[test]
    fn test_from_json_array_keeps_order_and_duplicates() {
        let value = json!([
            {"sheetName": "S", "address": "A1:A2"},
            42,
            {"sheetName": "T", "address": "nope"},
            {"sheetName": "S", "address": "A1:A2"},
        ]);
        let specs = RangeSpec::list_from_json(&value);

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0], RangeSpec::new("S", "A1:A2"));
        assert_eq!(specs[1].sheet_name.as_deref(), Some("T"));
        assert!(specs[1].address.is_none());
        assert_eq!(specs[2], specs[0]);
    }

    #[test]
    fn test_from_json_non_string_fields() {
        let spec = RangeSpec::from_json(&json!({"sheetName": 3, "address": ["A1"]})).unwrap();
        assert!(spec.sheet_name.is_none());
        assert!(spec.address.is_none());

        assert!(RangeSpec::from_json(&json!("A1:B2")).is_none());
        assert!(RangeSpec::list_from_json(&json!("A1:B2")).is_empty());
        assert!(RangeSpec::list_from_json(&Value::Null).is_empty());
    }

    #[test]
    fn test_coordinates_row_major() {
        let spec = RangeSpec::new("S", "B2:C3");
        let coords: Vec<_> = spec.coordinates().map(|a| (a.row, a.col)).collect();
        assert_eq!(coords, vec![(2, 2), (2, 3), (3, 2), (3, 3)]);
    }
}
