//! Captured state of one cell on one side of a merge

use super::{CellAddress, CellValue};
use serde::{Deserialize, Serialize};

/// Formula and value of a single cell, captured once per side at diff time
///
/// An empty `formula` means the cell holds a literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Formula text, empty for literal cells
    pub formula: String,
    /// Literal value, or cached result for formula cells
    pub value: CellValue,
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based)
    pub col: u32,
}

impl CellSnapshot {
    /// Create a snapshot from its parts
    pub fn new<S: Into<String>>(row: u32, col: u32, formula: S, value: CellValue) -> Self {
        Self {
            formula: formula.into(),
            value,
            row,
            col,
        }
    }

    /// Snapshot of a cell that holds nothing
    pub fn empty(row: u32, col: u32) -> Self {
        Self::new(row, col, String::new(), CellValue::Empty)
    }

    /// Snapshot of a literal-value cell
    pub fn literal<V: Into<CellValue>>(row: u32, col: u32, value: V) -> Self {
        Self::new(row, col, String::new(), value.into())
    }

    /// Whether this cell holds a literal value rather than a formula
    pub fn is_literal(&self) -> bool {
        self.formula.is_empty()
    }

    /// The cell's address
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Whether this snapshot differs from `other` in formula or value
    ///
    /// Formulas are compared as exact, case-sensitive strings.
    pub fn differs_from(&self, other: &CellSnapshot) -> bool {
        self.formula != other.formula || CellValue::differs(&self.value, &other.value)
    }
}
