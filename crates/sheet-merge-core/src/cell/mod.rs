//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`CellRange`] - A rectangular block of cells (e.g., "A1:B10")
//! - [`CellValue`] - The scalar a cell holds
//! - [`CellSnapshot`] - Formula and value of one cell captured from one side

mod address;
mod snapshot;
mod value;

pub use address::{CellAddress, CellRange, CellRangeIterator};
pub use snapshot::CellSnapshot;
pub use value::CellValue;
