//! xlsx workbooks through `umya-spreadsheet`

use std::any::Any;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use sheet_merge_core::{
    CellSnapshot, CellValue, SheetEdit, SheetView, WorkbookEdit, WorkbookView,
};
use umya_spreadsheet::{Cell, CellRawValue, Spreadsheet, Worksheet};

use crate::error::{XlsxError, XlsxResult};
use crate::number_format::{datetime_to_serial, is_date_format, serial_to_datetime};

/// An xlsx workbook loaded in memory
///
/// Parsing the same bytes twice yields two independent workbooks, which is
/// how a merge destination starts out as an exact copy of base.
#[derive(Debug)]
pub struct XlsxWorkbook {
    book: Spreadsheet,
}

impl XlsxWorkbook {
    /// Parse a workbook from xlsx bytes
    ///
    /// Malformed sheet content is reported as [`XlsxError::Read`]; the
    /// reader panics on some of it, and that panic is caught here.
    pub fn open_bytes(bytes: &[u8]) -> XlsxResult<Self> {
        let book = read_quietly(bytes)?;
        tracing::debug!(
            "Loaded workbook with {} sheets",
            book.get_sheet_collection().len()
        );
        Ok(Self { book })
    }

    /// Read and parse the workbook at `path`
    pub fn open_path<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::open_bytes(&bytes)
    }

    /// Wrap an already built spreadsheet
    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self { book }
    }

    /// Serialize to xlsx bytes
    pub fn to_bytes(&self) -> XlsxResult<Vec<u8>> {
        let mut buf = Vec::new();
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut buf)
            .map_err(|e| XlsxError::Write(e.to_string()))?;
        Ok(buf)
    }

    /// Serialize into `writer`
    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> XlsxResult<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize to a file at `path`, replacing it if it exists
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> XlsxResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        tracing::debug!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    /// Look up a sheet, failing if it does not exist
    pub fn worksheet(&self, name: &str) -> XlsxResult<XlsxSheet<'_>> {
        self.sheet(name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))
    }
}

fn read_quietly(bytes: &[u8]) -> XlsxResult<Spreadsheet> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
    }));
    panic::set_hook(hook);

    match result {
        Ok(read) => read.map_err(|e| XlsxError::Read(e.to_string())),
        Err(payload) => Err(XlsxError::Read(format!(
            "malformed workbook content ({})",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "reader panicked"
    }
}

impl WorkbookView for XlsxWorkbook {
    type Sheet<'a> = XlsxSheet<'a>;

    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|ws| ws.get_name().to_string())
            .collect()
    }

    fn sheet(&self, name: &str) -> Option<Self::Sheet<'_>> {
        self.book.get_sheet_by_name(name).map(XlsxSheet)
    }
}

impl WorkbookEdit for XlsxWorkbook {
    type SheetMut<'a> = XlsxSheetMut<'a>;

    fn sheet_mut(&mut self, name: &str) -> Option<Self::SheetMut<'_>> {
        self.book.get_sheet_by_name_mut(name).map(XlsxSheetMut)
    }
}

/// Read handle on one worksheet
#[derive(Debug, Clone, Copy)]
pub struct XlsxSheet<'a>(&'a Worksheet);

impl<'a> XlsxSheet<'a> {
    /// The underlying worksheet
    pub fn worksheet(&self) -> &'a Worksheet {
        self.0
    }
}

impl SheetView for XlsxSheet<'_> {
    fn name(&self) -> &str {
        self.0.get_name()
    }

    fn snapshot(&self, row: u32, col: u32) -> CellSnapshot {
        match self.0.get_cell((col, row)) {
            Some(cell) => CellSnapshot::new(row, col, cell.get_formula(), read_value(cell)),
            None => CellSnapshot::empty(row, col),
        }
    }
}

fn read_value(cell: &Cell) -> CellValue {
    match cell.get_raw_value() {
        CellRawValue::Numeric(n) => numeric_value(cell, *n),
        CellRawValue::Bool(b) => CellValue::Boolean(*b),
        CellRawValue::String(s) => CellValue::String(s.to_string()),
        CellRawValue::RichText(rt) => CellValue::String(rt.get_text().to_string()),
        CellRawValue::Lazy(s) => {
            let text = s.as_ref();
            if let Ok(n) = text.parse::<f64>() {
                numeric_value(cell, n)
            } else if text.eq_ignore_ascii_case("TRUE") {
                CellValue::Boolean(true)
            } else if text.eq_ignore_ascii_case("FALSE") {
                CellValue::Boolean(false)
            } else {
                CellValue::String(text.to_string())
            }
        }
        CellRawValue::Error(_) => {
            let text: Cow<'_, str> = cell.get_value();
            CellValue::Error(text.into_owned())
        }
        CellRawValue::Empty => CellValue::Empty,
    }
}

fn numeric_value(cell: &Cell, n: f64) -> CellValue {
    let is_date = cell
        .get_style()
        .get_number_format()
        .map(|nf| is_date_format(nf.get_format_code()))
        .unwrap_or(false);

    if is_date {
        if let Some(dt) = serial_to_datetime(n) {
            return CellValue::Date(dt);
        }
    }
    CellValue::Number(n)
}

/// Write handle on one worksheet
#[derive(Debug)]
pub struct XlsxSheetMut<'a>(&'a mut Worksheet);

impl SheetEdit for XlsxSheetMut<'_> {
    fn set_formula(&mut self, row: u32, col: u32, formula: &str) -> sheet_merge_core::Result<()> {
        if formula.is_empty() {
            // Avoid creating a cell just to clear a formula it never had
            if self.0.get_cell((col, row)).is_some() {
                self.0
                    .get_cell_mut((col, row))
                    .get_cell_value_mut()
                    .remove_formula();
            }
        } else {
            self.0.get_cell_mut((col, row)).set_formula(formula);
        }
        Ok(())
    }

    fn set_value(&mut self, row: u32, col: u32, value: &CellValue) -> sheet_merge_core::Result<()> {
        if value.is_empty() && self.0.get_cell((col, row)).is_none() {
            return Ok(());
        }

        let cell = self.0.get_cell_mut((col, row));
        match value {
            CellValue::Empty => {
                cell.set_blank();
            }
            CellValue::Number(n) => {
                cell.set_value_number(*n);
            }
            CellValue::String(s) => {
                cell.set_value_string(s.as_str());
            }
            CellValue::Boolean(b) => {
                cell.set_value_bool(*b);
            }
            CellValue::Date(dt) => {
                cell.set_value_number(datetime_to_serial(dt));
            }
            CellValue::Error(e) => {
                cell.set_value(e.as_str());
            }
        }
        Ok(())
    }
}
