//! Prelude module - common imports for sheet-merge users
//!
//! ```rust
//! use sheet_merge::prelude::*;
//! ```

pub use crate::{
    CellValue, DecisionSource, FixedSource, LineSource, MergeConfig, MergeError, MergeJob,
    MergeOutcome, MergeReport, MergeResult, RangeSpec, Resolution, ScriptedSource,
    XlsxWorkbook,
};
