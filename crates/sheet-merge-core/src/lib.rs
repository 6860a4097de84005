//! # sheet-merge-core
//!
//! Cell-level three-way merge engine for spreadsheet workbooks.
//!
//! This crate provides the pieces that decide what a merged workbook looks like:
//! - [`CellAddress`] and [`CellRange`] - A1-style addressing (1-based rows and columns)
//! - [`CellValue`] and [`CellSnapshot`] - What one side holds at one coordinate
//! - [`RangeSpec`] - Which block of which sheet takes part in a merge
//! - [`classify`] - The diff rule producing a [`MergeDecision`]
//! - [`MergeWriter`] - Applies a chosen side onto a destination sheet
//! - [`ConflictResolver`] - Walks conflicts and asks a [`DecisionSource`]
//! - [`MergeOrchestrator`] - Scans, auto-merges and resolves across sheets
//!
//! Workbooks are reached through the traits in [`workbook`], so the engine is
//! independent of the container format. [`MemoryWorkbook`] is the in-memory
//! implementation.
//!
//! ## Example
//!
//! ```rust
//! use sheet_merge_core::{
//!     CellValue, MemoryWorkbook, MergeOrchestrator, RangeSpec, Resolution, FixedSource,
//! };
//!
//! let mut base = MemoryWorkbook::new();
//! base.add_worksheet("Sheet1").set_literal(1, 1, 10.0);
//!
//! let mut file1 = base.clone();
//! file1.worksheet_by_name_mut("Sheet1").unwrap().set_literal(1, 1, 20.0);
//! let file2 = base.clone();
//!
//! let mut merged = base.clone();
//! let orchestrator = MergeOrchestrator::new(vec![RangeSpec::new("Sheet1", "A1:B2")]);
//! let mut source = FixedSource::new(Resolution::KeepBase);
//! let report = orchestrator
//!     .merge(&base, &file1, &file2, &mut merged, &mut source)
//!     .unwrap();
//!
//! assert_eq!(report.auto_merged, 1);
//! let value = merged.worksheet_by_name("Sheet1").unwrap().value_at(1, 1);
//! assert_eq!(value, CellValue::Number(20.0));
//! ```

pub mod cell;
pub mod diff;
pub mod error;
pub mod orchestrator;
pub mod range;
pub mod resolver;
pub mod workbook;
pub mod writer;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange, CellSnapshot, CellValue};
pub use diff::{classify, MergeDecision, MergeTarget};
pub use error::{Error, Result};
pub use orchestrator::{MergeOrchestrator, MergePlan, MergeReport, PlannedMerge};
pub use range::RangeSpec;
pub use resolver::{
    ConflictPrompt, ConflictResolver, DecisionSource, FixedSource, LineSource, Resolution,
    ResolverState, ScriptedSource,
};
pub use workbook::{MemorySheet, MemoryWorkbook, SheetEdit, SheetView, WorkbookEdit, WorkbookView};
pub use writer::MergeWriter;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
