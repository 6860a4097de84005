//! Whole-workbook merge driver
//!
//! A merge runs in three phases:
//! 1. [`MergeOrchestrator::scan`] classifies every selected coordinate on
//!    every sheet present in all three workbooks.
//! 2. [`MergeOrchestrator::apply_auto`] writes the single-side changes.
//! 3. [`MergeOrchestrator::resolve_conflicts`] hands the conflicts to a
//!    [`ConflictResolver`].
//!
//! The destination must start as an exact copy of base; cells classified as
//! [`MergeTarget::Base`] are never written.

use serde::Serialize;

use crate::diff::{classify, MergeDecision, MergeTarget};
use crate::error::{Error, Result};
use crate::range::RangeSpec;
use crate::resolver::{ConflictResolver, DecisionSource, Resolution};
use crate::workbook::{SheetView, WorkbookEdit, WorkbookView};
use crate::writer::MergeWriter;

/// A decision together with the sheet it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedMerge {
    /// Sheet name
    pub sheet: String,
    /// Classified cell
    pub decision: MergeDecision,
}

/// Result of scanning three workbooks
///
/// Both lists keep scan order: sheets in base order, then ranges in
/// declaration order, then rows, then columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergePlan {
    /// Cells changed on exactly one side
    pub auto: Vec<PlannedMerge>,
    /// Cells changed on both sides
    pub conflicts: Vec<PlannedMerge>,
    /// Number of coordinates classified
    pub cells_evaluated: usize,
    /// Coordinates classified as unchanged
    pub unchanged: usize,
    /// Base sheets missing from file1 or file2
    pub skipped_sheets: Vec<String>,
}

impl MergePlan {
    /// Whether the plan needs any write at all
    pub fn is_empty(&self) -> bool {
        self.auto.is_empty() && self.conflicts.is_empty()
    }
}

/// Counters describing a finished merge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Coordinates visited across all ranges, duplicates included
    pub cells_evaluated: usize,
    /// Cells neither side changed
    pub unchanged: usize,
    /// Cells taken from the one side that changed them
    pub auto_merged: usize,
    /// Cells both sides changed
    pub conflicts: usize,
    /// Conflicts answered with file1's cell
    pub resolved_side1: usize,
    /// Conflicts answered with file2's cell
    pub resolved_side2: usize,
    /// Conflicts answered by keeping base
    pub kept_base: usize,
    /// Base sheets missing from file1 or file2
    pub skipped_sheets: Vec<String>,
}

impl MergeReport {
    fn from_plan(plan: &MergePlan, resolutions: &[Resolution]) -> Self {
        let count = |r: Resolution| resolutions.iter().filter(|&&x| x == r).count();
        Self {
            cells_evaluated: plan.cells_evaluated,
            unchanged: plan.unchanged,
            auto_merged: plan.auto.len(),
            conflicts: plan.conflicts.len(),
            resolved_side1: count(Resolution::Side1),
            resolved_side2: count(Resolution::Side2),
            kept_base: count(Resolution::KeepBase),
            skipped_sheets: plan.skipped_sheets.clone(),
        }
    }
}

/// Runs a three-way merge over the declared ranges
#[derive(Debug, Clone, Default)]
pub struct MergeOrchestrator {
    ranges: Vec<RangeSpec>,
    writer: MergeWriter,
}

impl MergeOrchestrator {
    /// Create an orchestrator for the given ranges, kept in declaration order
    pub fn new(ranges: Vec<RangeSpec>) -> Self {
        for range in ranges.iter().filter(|r| r.is_inert()) {
            tracing::warn!("Range entry {range:?} selects no cells");
        }
        Self {
            ranges,
            writer: MergeWriter::new(),
        }
    }

    /// The declared ranges
    pub fn ranges(&self) -> &[RangeSpec] {
        &self.ranges
    }

    /// Classify every selected coordinate
    ///
    /// A base sheet is only scanned when file1 and file2 both have a sheet
    /// with the same name. Sheets that exist only in file1 or file2 are never
    /// looked at.
    pub fn scan<B, S1, S2>(&self, base: &B, file1: &S1, file2: &S2) -> MergePlan
    where
        B: WorkbookView + ?Sized,
        S1: WorkbookView + ?Sized,
        S2: WorkbookView + ?Sized,
    {
        let mut plan = MergePlan::default();

        for name in base.sheet_names() {
            let (Some(base_sheet), Some(sheet1), Some(sheet2)) =
                (base.sheet(&name), file1.sheet(&name), file2.sheet(&name))
            else {
                tracing::warn!("Skipping sheet '{name}': not present in every workbook");
                plan.skipped_sheets.push(name);
                continue;
            };

            for range in self.ranges.iter().filter(|r| r.matches_sheet(&name)) {
                for addr in range.coordinates() {
                    let decision = classify(
                        base_sheet.snapshot(addr.row, addr.col),
                        sheet1.snapshot(addr.row, addr.col),
                        sheet2.snapshot(addr.row, addr.col),
                    );
                    plan.cells_evaluated += 1;

                    tracing::debug!("{name}!{addr}: {}", decision.target.label());

                    let bucket = match decision.target {
                        MergeTarget::Base => {
                            plan.unchanged += 1;
                            continue;
                        }
                        MergeTarget::Side1 | MergeTarget::Side2 => &mut plan.auto,
                        MergeTarget::Conflict => &mut plan.conflicts,
                    };
                    bucket.push(PlannedMerge {
                        sheet: name.clone(),
                        decision,
                    });
                }
            }
        }

        tracing::info!(
            "Scanned {} cells: {} unchanged, {} auto, {} conflicts",
            plan.cells_evaluated,
            plan.unchanged,
            plan.auto.len(),
            plan.conflicts.len()
        );
        plan
    }

    /// Write every non-conflicting change, in scan order
    pub fn apply_auto<W>(&self, plan: &MergePlan, dest: &mut W) -> Result<()>
    where
        W: WorkbookEdit + ?Sized,
    {
        for planned in &plan.auto {
            let mut sheet = dest
                .sheet_mut(&planned.sheet)
                .ok_or_else(|| Error::SheetNotFound(planned.sheet.clone()))?;
            self.writer.apply_auto(&planned.decision, &mut sheet)?;
        }
        Ok(())
    }

    /// Resolve every conflict through `source`, in scan order
    pub fn resolve_conflicts<W, D>(
        &self,
        plan: &MergePlan,
        dest: &mut W,
        source: &mut D,
    ) -> Result<Vec<Resolution>>
    where
        W: WorkbookEdit + ?Sized,
        D: DecisionSource + ?Sized,
    {
        ConflictResolver::new(&plan.conflicts).run(source, dest)
    }

    /// Scan, auto-merge and resolve in one go
    pub fn merge<B, S1, S2, W, D>(
        &self,
        base: &B,
        file1: &S1,
        file2: &S2,
        dest: &mut W,
        source: &mut D,
    ) -> Result<MergeReport>
    where
        B: WorkbookView + ?Sized,
        S1: WorkbookView + ?Sized,
        S2: WorkbookView + ?Sized,
        W: WorkbookEdit + ?Sized,
        D: DecisionSource + ?Sized,
    {
        let plan = self.scan(base, file1, file2);
        self.apply_auto(&plan, dest)?;
        let resolutions = self.resolve_conflicts(&plan, dest, source)?;
        Ok(MergeReport::from_plan(&plan, &resolutions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellAddress, CellRange, CellValue};
    use crate::resolver::{FixedSource, ScriptedSource};
    use crate::workbook::MemoryWorkbook;
    use pretty_assertions::assert_eq;

    /// base, file1, file2 each with a "Data" sheet holding 10 at A1
    fn trio() -> (MemoryWorkbook, MemoryWorkbook, MemoryWorkbook) {
        let mut base = MemoryWorkbook::new();
        base.add_worksheet("Data")
            .set_literal(1, 1, 10.0)
            .set_literal(1, 2, "label")
            .set_formula_cell(2, 1, "A1*2", 20.0);
        (base.clone(), base.clone(), base)
    }

    fn set(wb: &mut MemoryWorkbook, row: u32, col: u32, value: f64) {
        wb.worksheet_by_name_mut("Data")
            .unwrap()
            .set_literal(row, col, value);
    }

    fn value(wb: &MemoryWorkbook, row: u32, col: u32) -> CellValue {
        wb.worksheet_by_name("Data").unwrap().value_at(row, col)
    }

    fn orchestrator() -> MergeOrchestrator {
        MergeOrchestrator::new(vec![RangeSpec::new("Data", "A1:C3")])
    }

    #[test]
    fn test_self_merge_is_all_base() {
        let (base, file1, file2) = trio();
        let mut dest = base.clone();

        let report = orchestrator()
            .merge(&base, &file1, &file2, &mut dest, &mut ScriptedSource::default())
            .unwrap();

        assert_eq!(report.cells_evaluated, 9);
        assert_eq!(report.unchanged, 9);
        assert_eq!(report.auto_merged, 0);
        assert_eq!(report.conflicts, 0);
        assert_eq!(dest, base);
    }

    #[test]
    fn test_single_side_change_auto_merges() {
        let (base, mut file1, mut file2) = trio();
        set(&mut file1, 1, 1, 20.0);
        set(&mut file2, 3, 3, 7.0);
        let mut dest = base.clone();

        let report = orchestrator()
            .merge(&base, &file1, &file2, &mut dest, &mut ScriptedSource::default())
            .unwrap();

        assert_eq!(report.auto_merged, 2);
        assert_eq!(report.conflicts, 0);
        assert_eq!(value(&dest, 1, 1), CellValue::Number(20.0));
        assert_eq!(value(&dest, 3, 3), CellValue::Number(7.0));
        // Untouched cells still equal base
        assert_eq!(value(&dest, 1, 2), CellValue::string("label"));
        assert_eq!(dest.worksheet_by_name("Data").unwrap().formula_at(2, 1), "A1*2");
    }

    #[test]
    fn test_divergent_conflict_each_resolution() {
        for (token, expected) in [("1", 20.0), ("2", 30.0), ("b", 10.0)] {
            let (base, mut file1, mut file2) = trio();
            set(&mut file1, 1, 1, 20.0);
            set(&mut file2, 1, 1, 30.0);
            let mut dest = base.clone();
            let mut source = ScriptedSource::new([token]);

            let report = orchestrator()
                .merge(&base, &file1, &file2, &mut dest, &mut source)
                .unwrap();

            assert_eq!(report.conflicts, 1);
            assert_eq!(value(&dest, 1, 1), CellValue::Number(expected), "token {token}");
        }
    }

    #[test]
    fn test_convergent_edit_is_not_auto_resolved() {
        let (base, mut file1, mut file2) = trio();
        set(&mut file1, 1, 1, 20.0);
        set(&mut file2, 1, 1, 20.0);
        let mut dest = base.clone();

        let plan = orchestrator().scan(&base, &file1, &file2);
        assert!(plan.auto.is_empty());
        assert_eq!(plan.conflicts.len(), 1);

        let report = orchestrator()
            .merge(
                &base,
                &file1,
                &file2,
                &mut dest,
                &mut FixedSource::new(Resolution::KeepBase),
            )
            .unwrap();
        assert_eq!(report.kept_base, 1);
        assert_eq!(value(&dest, 1, 1), CellValue::Number(10.0));
    }

    #[test]
    fn test_cells_outside_ranges_are_ignored() {
        let (base, mut file1, mut file2) = trio();
        set(&mut file1, 5, 5, 1.0);
        set(&mut file1, 1, 1, 11.0);
        set(&mut file2, 10, 1, 2.0);
        let mut dest = base.clone();

        let orchestrator = MergeOrchestrator::new(vec![RangeSpec::new("Data", "A1")]);
        let report = orchestrator
            .merge(&base, &file1, &file2, &mut dest, &mut ScriptedSource::default())
            .unwrap();

        assert_eq!(report.cells_evaluated, 1);
        assert_eq!(report.auto_merged, 1);
        assert_eq!(value(&dest, 5, 5), CellValue::Empty);
        assert_eq!(value(&dest, 10, 1), CellValue::Empty);
    }

    #[test]
    fn test_scan_order_and_overlapping_ranges() {
        let (base, mut file1, mut file2) = trio();
        set(&mut file1, 2, 2, 1.0);
        set(&mut file2, 2, 2, 2.0);
        set(&mut file1, 1, 3, 1.0);
        set(&mut file2, 1, 3, 2.0);

        let orchestrator = MergeOrchestrator::new(vec![
            RangeSpec::new("Data", "B2"),
            RangeSpec::new("Data", "A1:C2"),
        ]);
        let plan = orchestrator.scan(&base, &file1, &file2);

        let order: Vec<String> = plan
            .conflicts
            .iter()
            .map(|p| p.decision.address().to_string())
            .collect();
        // Declaration order first, then row-major within each range; B2 twice
        assert_eq!(order, vec!["B2", "C1", "B2"]);
        assert_eq!(plan.cells_evaluated, 7);
    }

    #[test]
    fn test_sheet_missing_from_one_side_is_skipped() {
        let (mut base, mut file1, file2) = trio();
        base.add_worksheet("Extra").set_literal(1, 1, 1.0);
        file1.add_worksheet("Extra").set_literal(1, 1, 2.0);
        set(&mut file1, 1, 1, 99.0);
        let mut dest = base.clone();

        let orchestrator = MergeOrchestrator::new(vec![
            RangeSpec::new("Extra", "A1"),
            RangeSpec::new("Data", "A1"),
        ]);
        let report = orchestrator
            .merge(&base, &file1, &file2, &mut dest, &mut ScriptedSource::default())
            .unwrap();

        assert_eq!(report.skipped_sheets, vec!["Extra".to_string()]);
        assert_eq!(report.auto_merged, 1);
        assert_eq!(
            dest.worksheet_by_name("Extra").unwrap().value_at(1, 1),
            CellValue::Number(1.0)
        );
    }

    #[test]
    fn test_inert_ranges_select_nothing() {
        let (base, mut file1, file2) = trio();
        set(&mut file1, 1, 1, 5.0);

        let orchestrator = MergeOrchestrator::new(vec![
            RangeSpec::new("Data", "not a range"),
            RangeSpec {
                sheet_name: None,
                address: Some(CellRange::single(CellAddress::new(1, 1))),
            },
            RangeSpec::new("Elsewhere", "A1"),
        ]);
        let plan = orchestrator.scan(&base, &file1, &file2);

        assert_eq!(plan.cells_evaluated, 0);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_report_counts_resolutions() {
        let (base, mut file1, mut file2) = trio();
        for col in 1..=3 {
            set(&mut file1, 3, col, 1.0);
            set(&mut file2, 3, col, 2.0);
        }
        let mut dest = base.clone();
        let mut source = ScriptedSource::new(["2", "?", "b", "1"]);

        let report = orchestrator()
            .merge(&base, &file1, &file2, &mut dest, &mut source)
            .unwrap();

        assert_eq!(
            report,
            MergeReport {
                cells_evaluated: 9,
                unchanged: 6,
                auto_merged: 0,
                conflicts: 3,
                resolved_side1: 1,
                resolved_side2: 1,
                kept_base: 1,
                skipped_sheets: Vec::new(),
            }
        );
        assert_eq!(source.rejected().len(), 1);
        assert_eq!(value(&dest, 3, 1), CellValue::Number(2.0));
        assert_eq!(value(&dest, 3, 2), CellValue::Empty);
        assert_eq!(value(&dest, 3, 3), CellValue::Number(1.0));
    }

    #[test]
    fn test_auto_changes_land_before_conflicts_fail() {
        let (base, mut file1, mut file2) = trio();
        set(&mut file1, 1, 1, 20.0);
        set(&mut file1, 3, 1, 1.0);
        set(&mut file2, 3, 1, 2.0);
        let mut dest = base.clone();

        let err = orchestrator()
            .merge(&base, &file1, &file2, &mut dest, &mut ScriptedSource::default())
            .unwrap_err();

        assert!(matches!(err, Error::InputExhausted { remaining: 1, total: 1 }));
        assert_eq!(value(&dest, 1, 1), CellValue::Number(20.0));
    }
}
