//! # sheet-merge
//!
//! Three-way, cell-level merge of xlsx workbooks.
//!
//! Given a common ancestor (`base`) and two edited copies (`file1`,
//! `file2`), sheet-merge compares the declared cell ranges, takes every
//! one-sided change automatically and asks about cells both copies changed.
//! The result is base with those changes applied, written under base's file
//! name into an output directory.
//!
//! ## Features
//!
//! - Per-cell comparison of formula text and value
//! - Range selection per sheet from a JSON configuration
//! - Interactive, scripted or fixed conflict resolution
//! - xlsx reading and writing through `umya-spreadsheet`
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheet_merge::prelude::*;
//!
//! let config = MergeConfig::from_arg(
//!     r#"{ "b": "base.xlsx", "f1": "mine.xlsx", "f2": "theirs.xlsx",
//!          "r": { "sheetName": "Sheet1", "address": "A1:F40" } }"#,
//! )
//! .unwrap();
//!
//! let job = config.into_job("out").unwrap();
//! let outcome = job.run(&mut FixedSource::new(Resolution::Side1)).unwrap();
//! println!("wrote {}", outcome.output.display());
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod prelude;

pub use config::MergeConfig;
pub use error::{MergeError, MergeResult};
pub use job::{MergeJob, MergeOutcome, DEFAULT_OUT_DIR};

// Re-export core types
pub use sheet_merge_core::{
    CellAddress, CellRange, CellSnapshot, CellValue, ConflictPrompt, ConflictResolver,
    DecisionSource, FixedSource, LineSource, MergeDecision, MergeOrchestrator, MergePlan,
    MergeReport, MergeTarget, PlannedMerge, RangeSpec, Resolution, ResolverState,
    ScriptedSource, SheetView, WorkbookView,
};

// Re-export xlsx types
pub use sheet_merge_xlsx::{XlsxError, XlsxWorkbook};
