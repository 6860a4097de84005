//! Workbook access traits and the in-memory workbook
//!
//! The merge engine never sees a container format. It reads sheets through
//! [`WorkbookView`]/[`SheetView`] and writes through
//! [`WorkbookEdit`]/[`SheetEdit`]; the xlsx backend and [`MemoryWorkbook`]
//! both implement them.

use std::collections::BTreeMap;

use crate::cell::{CellSnapshot, CellValue};
use crate::error::Result;

/// Read access to one sheet
pub trait SheetView {
    /// Sheet name
    fn name(&self) -> &str;

    /// Capture the formula and value at `(row, col)` (1-based)
    ///
    /// Cells that do not exist yield an empty snapshot.
    fn snapshot(&self, row: u32, col: u32) -> CellSnapshot;
}

/// Write access to one sheet
pub trait SheetEdit {
    /// Set the formula at `(row, col)`; an empty formula makes the cell literal
    fn set_formula(&mut self, row: u32, col: u32, formula: &str) -> Result<()>;

    /// Set the literal value at `(row, col)`
    fn set_value(&mut self, row: u32, col: u32, value: &CellValue) -> Result<()>;
}

/// Read access to a workbook's sheets, keyed by name
pub trait WorkbookView {
    /// Sheet handle borrowed from the workbook
    type Sheet<'a>: SheetView
    where
        Self: 'a;

    /// Sheet names in document order
    fn sheet_names(&self) -> Vec<String>;

    /// Look up a sheet by exact name
    fn sheet(&self, name: &str) -> Option<Self::Sheet<'_>>;
}

/// Write access to a workbook's sheets, keyed by name
pub trait WorkbookEdit {
    /// Mutable sheet handle borrowed from the workbook
    type SheetMut<'a>: SheetEdit
    where
        Self: 'a;

    /// Look up a sheet for writing by exact name
    fn sheet_mut(&mut self, name: &str) -> Option<Self::SheetMut<'_>>;
}

impl<T: SheetView + ?Sized> SheetView for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn snapshot(&self, row: u32, col: u32) -> CellSnapshot {
        (**self).snapshot(row, col)
    }
}

impl<T: SheetView + ?Sized> SheetView for &mut T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn snapshot(&self, row: u32, col: u32) -> CellSnapshot {
        (**self).snapshot(row, col)
    }
}

impl<T: SheetEdit + ?Sized> SheetEdit for &mut T {
    fn set_formula(&mut self, row: u32, col: u32, formula: &str) -> Result<()> {
        (**self).set_formula(row, col, formula)
    }

    fn set_value(&mut self, row: u32, col: u32, value: &CellValue) -> Result<()> {
        (**self).set_value(row, col, value)
    }
}

/// Formula and value stored for one cell
#[derive(Debug, Clone, Default, PartialEq)]
struct MemoryCell {
    formula: String,
    value: CellValue,
}

/// A sheet held entirely in memory
///
/// Only non-empty cells are stored, keyed by `(row, col)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    name: String,
    cells: BTreeMap<(u32, u32), MemoryCell>,
}

impl MemorySheet {
    /// Create an empty sheet
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Store a literal value, dropping any formula
    pub fn set_literal<V: Into<CellValue>>(&mut self, row: u32, col: u32, value: V) -> &mut Self {
        self.store(
            row,
            col,
            MemoryCell {
                formula: String::new(),
                value: value.into(),
            },
        );
        self
    }

    /// Store a formula together with its cached result
    pub fn set_formula_cell<S, V>(&mut self, row: u32, col: u32, formula: S, cached: V) -> &mut Self
    where
        S: Into<String>,
        V: Into<CellValue>,
    {
        self.store(
            row,
            col,
            MemoryCell {
                formula: formula.into(),
                value: cached.into(),
            },
        );
        self
    }

    /// Value at `(row, col)`, [`CellValue::Empty`] if the cell is absent
    pub fn value_at(&self, row: u32, col: u32) -> CellValue {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Formula at `(row, col)`, empty if the cell is literal or absent
    pub fn formula_at(&self, row: u32, col: u32) -> &str {
        self.cells
            .get(&(row, col))
            .map(|c| c.formula.as_str())
            .unwrap_or("")
    }

    /// Number of stored (non-empty) cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn store(&mut self, row: u32, col: u32, cell: MemoryCell) {
        if cell.formula.is_empty() && cell.value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), cell);
        }
    }
}

impl SheetView for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self, row: u32, col: u32) -> CellSnapshot {
        match self.cells.get(&(row, col)) {
            Some(cell) => CellSnapshot::new(row, col, cell.formula.clone(), cell.value.clone()),
            None => CellSnapshot::empty(row, col),
        }
    }
}

impl SheetEdit for MemorySheet {
    fn set_formula(&mut self, row: u32, col: u32, formula: &str) -> Result<()> {
        let mut cell = self.cells.get(&(row, col)).cloned().unwrap_or_default();
        cell.formula = formula.to_string();
        self.store(row, col, cell);
        Ok(())
    }

    fn set_value(&mut self, row: u32, col: u32, value: &CellValue) -> Result<()> {
        let mut cell = self.cells.get(&(row, col)).cloned().unwrap_or_default();
        cell.value = value.clone();
        self.store(row, col, cell);
        Ok(())
    }
}

/// A workbook held entirely in memory
///
/// Cloning produces an exact, independent copy, which is how a merge
/// destination is initialized from `base`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    worksheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    /// Create a workbook with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet, or return the existing sheet with that name
    pub fn add_worksheet(&mut self, name: &str) -> &mut MemorySheet {
        let index = match self.worksheets.iter().position(|ws| ws.name == name) {
            Some(index) => index,
            None => {
                self.worksheets.push(MemorySheet::new(name));
                self.worksheets.len() - 1
            }
        };
        &mut self.worksheets[index]
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&MemorySheet> {
        self.worksheets.iter().find(|ws| ws.name == name)
    }

    /// Get a mutable worksheet by name
    pub fn worksheet_by_name_mut(&mut self, name: &str) -> Option<&mut MemorySheet> {
        self.worksheets.iter_mut().find(|ws| ws.name == name)
    }
}

impl WorkbookView for MemoryWorkbook {
    type Sheet<'a> = &'a MemorySheet;

    fn sheet_names(&self) -> Vec<String> {
        self.worksheets.iter().map(|ws| ws.name.clone()).collect()
    }

    fn sheet(&self, name: &str) -> Option<Self::Sheet<'_>> {
        self.worksheet_by_name(name)
    }
}

impl WorkbookEdit for MemoryWorkbook {
    type SheetMut<'a> = &'a mut MemorySheet;

    fn sheet_mut(&mut self, name: &str) -> Option<Self::SheetMut<'_>> {
        self.worksheet_by_name_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_worksheet_is_idempotent() {
        let mut wb = MemoryWorkbook::new();
        wb.add_worksheet("Data").set_literal(1, 1, 5.0);
        wb.add_worksheet("Other");
        wb.add_worksheet("Data");

        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.sheet_names(), vec!["Data".to_string(), "Other".to_string()]);
        assert_eq!(wb.worksheet_by_name("Data").unwrap().cell_count(), 1);
    }

    #[test]
    fn test_snapshot_of_missing_cell_is_empty() {
        let mut wb = MemoryWorkbook::new();
        wb.add_worksheet("S");
        let sheet = wb.sheet("S").unwrap();

        assert_eq!(sheet.snapshot(4, 2), CellSnapshot::empty(4, 2));
        assert!(wb.sheet("Missing").is_none());
    }

    #[test]
    fn test_sheet_edit_formula_then_literal() {
        let mut sheet = MemorySheet::new("S");
        sheet.set_formula_cell(1, 1, "A2*2", 8.0);
        assert_eq!(sheet.formula_at(1, 1), "A2*2");

        sheet.set_formula(1, 1, "").unwrap();
        sheet.set_value(1, 1, &CellValue::Number(3.0)).unwrap();
        assert_eq!(sheet.formula_at(1, 1), "");
        assert_eq!(sheet.value_at(1, 1), CellValue::Number(3.0));

        // Clearing both removes the cell
        sheet.set_value(1, 1, &CellValue::Empty).unwrap();
        assert_eq!(sheet.cell_count(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut base = MemoryWorkbook::new();
        base.add_worksheet("S").set_literal(1, 1, "x");

        let mut copy = base.clone();
        copy.sheet_mut("S")
            .unwrap()
            .set_value(1, 1, &CellValue::string("y"))
            .unwrap();

        assert_eq!(base.worksheet_by_name("S").unwrap().value_at(1, 1), CellValue::string("x"));
        assert_eq!(copy.worksheet_by_name("S").unwrap().value_at(1, 1), CellValue::string("y"));
    }
}
