//! JSON configuration
//!
//! A configuration names the three workbooks and the ranges to merge:
//!
//! ```json
//! {
//!   "base": "base.xlsx",
//!   "file1": "mine.xlsx",
//!   "file2": "theirs.xlsx",
//!   "range": [{ "sheetName": "Sheet1", "address": "A1:D20" }]
//! }
//! ```
//!
//! Each key also has a short alias (`b`, `f1`, `f2`, `r`); when both are
//! present the short one is used.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sheet_merge_core::RangeSpec;

use crate::error::{MergeError, MergeResult};
use crate::job::MergeJob;

/// Merge inputs gathered from JSON and/or the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeConfig {
    /// Common ancestor workbook
    pub base: Option<PathBuf>,
    /// First derived workbook
    pub file1: Option<PathBuf>,
    /// Second derived workbook
    pub file2: Option<PathBuf>,
    /// Ranges to merge, in declaration order
    pub ranges: Vec<RangeSpec>,
}

impl MergeConfig {
    /// Load configuration from a `--json` argument
    ///
    /// If `arg` names an existing file its contents are parsed; otherwise
    /// `arg` itself is taken as the JSON text.
    pub fn from_arg(arg: &str) -> MergeResult<Self> {
        let path = Path::new(arg);
        let text = if path.is_file() {
            tracing::debug!("Reading configuration from {}", path.display());
            std::fs::read_to_string(path)
                .map_err(|e| MergeError::config(format!("Cannot read '{arg}': {e}")))?
        } else {
            arg.to_string()
        };
        Self::from_json_str(&text)
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(text: &str) -> MergeResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| MergeError::config(format!("Invalid JSON configuration: {e}")))?;
        Self::from_value(&value)
    }

    /// Read configuration from a parsed JSON value, which must be an object
    ///
    /// Values of the wrong type are treated as absent.
    pub fn from_value(value: &Value) -> MergeResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| MergeError::config("JSON configuration must be an object"))?;

        let ranges = lookup(obj, "r", "range")
            .map(RangeSpec::list_from_json)
            .unwrap_or_default();

        Ok(Self {
            base: path_value(obj, "b", "base"),
            file1: path_value(obj, "f1", "file1"),
            file2: path_value(obj, "f2", "file2"),
            ranges,
        })
    }

    /// Overlay values given explicitly, which take precedence
    pub fn merged_with(self, explicit: MergeConfig) -> Self {
        Self {
            base: explicit.base.or(self.base),
            file1: explicit.file1.or(self.file1),
            file2: explicit.file2.or(self.file2),
            ranges: if explicit.ranges.is_empty() {
                self.ranges
            } else {
                explicit.ranges
            },
        }
    }

    /// Build a job writing into `out_dir`
    ///
    /// Fails if any of the three workbook paths is missing.
    pub fn into_job<P: Into<PathBuf>>(self, out_dir: P) -> MergeResult<MergeJob> {
        let base = self.base.ok_or_else(|| missing("base", "--base"))?;
        let file1 = self.file1.ok_or_else(|| missing("file1", "--file1"))?;
        let file2 = self.file2.ok_or_else(|| missing("file2", "--file2"))?;

        if self.ranges.is_empty() {
            tracing::warn!("No ranges configured; the output will equal base");
        }

        Ok(MergeJob::new(base, file1, file2)
            .with_ranges(self.ranges)
            .with_out_dir(out_dir))
    }
}

fn lookup<'a>(obj: &'a Map<String, Value>, short: &str, long: &str) -> Option<&'a Value> {
    obj.get(short).or_else(|| obj.get(long))
}

fn path_value(obj: &Map<String, Value>, short: &str, long: &str) -> Option<PathBuf> {
    lookup(obj, short, long)
        .and_then(Value::as_str)
        .map(PathBuf::from)
}

fn missing(key: &str, flag: &str) -> MergeError {
    MergeError::config(format!(
        "No {key} workbook given; pass {flag} or set \"{key}\" in the JSON configuration"
    ))
}
