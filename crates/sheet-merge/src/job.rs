//! The end-to-end merge of three xlsx files

use std::path::{Path, PathBuf};

use sheet_merge_core::{DecisionSource, MergeOrchestrator, MergeReport, RangeSpec};
use sheet_merge_xlsx::{XlsxError, XlsxWorkbook};

use crate::error::{MergeError, MergeResult};

/// Default output directory, relative to the working directory
pub const DEFAULT_OUT_DIR: &str = "out";

/// One merge run over files on disk
///
/// The merged workbook is written to `out_dir` under base's file name.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeJob {
    /// Common ancestor, also the starting point of the output
    pub base: PathBuf,
    /// First edited copy
    pub file1: PathBuf,
    /// Second edited copy
    pub file2: PathBuf,
    /// Cells to merge, in declaration order
    pub ranges: Vec<RangeSpec>,
    /// Directory the merged workbook is written into
    pub out_dir: PathBuf,
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Path of the merged workbook
    pub output: PathBuf,
    /// Merge counters
    pub report: MergeReport,
}

impl MergeJob {
    /// Create a job with no ranges writing into [`DEFAULT_OUT_DIR`]
    pub fn new<B, F1, F2>(base: B, file1: F1, file2: F2) -> Self
    where
        B: Into<PathBuf>,
        F1: Into<PathBuf>,
        F2: Into<PathBuf>,
    {
        Self {
            base: base.into(),
            file1: file1.into(),
            file2: file2.into(),
            ranges: Vec::new(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }

    /// Set the ranges to merge
    pub fn with_ranges(mut self, ranges: Vec<RangeSpec>) -> Self {
        self.ranges = ranges;
        self
    }

    /// Set the output directory
    pub fn with_out_dir<P: Into<PathBuf>>(mut self, out_dir: P) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Where the merged workbook will be written
    pub fn output_path(&self) -> MergeResult<PathBuf> {
        let name = self.base.file_name().ok_or_else(|| {
            MergeError::config(format!("'{}' has no file name", self.base.display()))
        })?;
        Ok(self.out_dir.join(name))
    }

    /// Run the merge, asking `source` about conflicts
    ///
    /// Inputs are checked in the order base, file1, file2 and all of them
    /// are read before any merging starts. The destination is a second,
    /// independent parse of base's bytes.
    pub fn run<D>(&self, source: &mut D) -> MergeResult<MergeOutcome>
    where
        D: DecisionSource + ?Sized,
    {
        let output = self.output_path()?;

        for path in [&self.base, &self.file1, &self.file2] {
            if !path.is_file() {
                return Err(MergeError::not_found(path));
            }
        }

        let base_bytes = read_input(&self.base)?;
        let file1_bytes = read_input(&self.file1)?;
        let file2_bytes = read_input(&self.file2)?;

        let base = parse(&self.base, &base_bytes)?;
        let file1 = parse(&self.file1, &file1_bytes)?;
        let file2 = parse(&self.file2, &file2_bytes)?;
        let mut dest = parse(&self.base, &base_bytes)?;

        tracing::info!(
            "Merging {} and {} into {}",
            self.file1.display(),
            self.file2.display(),
            self.base.display()
        );

        let orchestrator = MergeOrchestrator::new(self.ranges.clone());
        let report = orchestrator.merge(&base, &file1, &file2, &mut dest, source)?;

        std::fs::create_dir_all(&self.out_dir).map_err(|e| MergeError::Output {
            path: self.out_dir.clone(),
            source: XlsxError::Io(e),
        })?;
        dest.save_to_path(&output)
            .map_err(|source| MergeError::Output {
                path: output.clone(),
                source,
            })?;

        tracing::info!("Wrote {}", output.display());
        Ok(MergeOutcome { output, report })
    }
}

fn read_input(path: &Path) -> MergeResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| MergeError::Input(format!("Cannot read '{}': {e}", path.display())))
}

fn parse(path: &Path, bytes: &[u8]) -> MergeResult<XlsxWorkbook> {
    XlsxWorkbook::open_bytes(bytes).map_err(|source| MergeError::Format {
        path: path.to_path_buf(),
        source,
    })
}
