//! # sheet-merge-xlsx
//!
//! XLSX (Office Open XML) workbook access for sheet-merge, backed by
//! `umya-spreadsheet`.
//!
//! [`XlsxWorkbook`] implements the workbook traits from `sheet-merge-core`,
//! so the merge engine reads and writes xlsx files without knowing about the
//! container.

pub mod error;
pub mod number_format;
pub mod workbook;

pub use error::{XlsxError, XlsxResult};
pub use workbook::{XlsxSheet, XlsxSheetMut, XlsxWorkbook};
