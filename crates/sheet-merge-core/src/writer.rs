//! Applying merge decisions onto a destination sheet

use crate::diff::{MergeDecision, MergeTarget};
use crate::error::{Error, Result};
use crate::resolver::Resolution;
use crate::workbook::SheetEdit;

/// Writes the chosen side of a [`MergeDecision`] into a destination sheet
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeWriter;

impl MergeWriter {
    /// Create a writer
    pub fn new() -> Self {
        Self
    }

    /// Write `chosen`'s cell at the decision's coordinate
    ///
    /// The formula is always replaced by the chosen side's formula. The value
    /// is written only for literal cells; a formula cell's value is left to
    /// recalculation by whatever opens the workbook next.
    ///
    /// `chosen` must not be [`MergeTarget::Conflict`]. [`MergeTarget::Base`]
    /// is accepted and writes base's cell back.
    pub fn apply<S>(&self, decision: &MergeDecision, chosen: MergeTarget, dest: &mut S) -> Result<()>
    where
        S: SheetEdit + ?Sized,
    {
        let snapshot = decision
            .snapshot(chosen)
            .ok_or_else(|| Error::UnresolvedConflict(decision.address().to_string()))?;

        tracing::debug!(
            "Writing {} from {}",
            decision.address(),
            chosen.label()
        );

        dest.set_formula(decision.row, decision.col, &snapshot.formula)?;
        if snapshot.is_literal() {
            dest.set_value(decision.row, decision.col, &snapshot.value)?;
        }
        Ok(())
    }

    /// Apply the automatic target of a non-conflicting decision
    pub fn apply_auto<S>(&self, decision: &MergeDecision, dest: &mut S) -> Result<()>
    where
        S: SheetEdit + ?Sized,
    {
        self.apply(decision, decision.target, dest)
    }

    /// Apply a conflict resolution
    ///
    /// [`Resolution::KeepBase`] writes nothing: the destination already holds
    /// base's cell.
    pub fn apply_resolution<S>(
        &self,
        decision: &MergeDecision,
        resolution: Resolution,
        dest: &mut S,
    ) -> Result<()>
    where
        S: SheetEdit + ?Sized,
    {
        match resolution.target() {
            MergeTarget::Base => Ok(()),
            target => self.apply(decision, target, dest),
        }
    }
}
