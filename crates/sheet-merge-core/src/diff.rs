//! Three-way cell classification
//!
//! [`classify`] compares one coordinate across base, side 1 and side 2 and
//! decides which side the merged cell should come from. It only reads its
//! inputs, so it can be called in any order or from several threads.

use serde::{Deserialize, Serialize};

use crate::cell::{CellAddress, CellSnapshot};

/// Which side a merged cell comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeTarget {
    /// Neither side changed the cell
    Base,
    /// Only side 1 (file1) changed the cell
    Side1,
    /// Only side 2 (file2) changed the cell
    Side2,
    /// Both sides changed the cell
    Conflict,
}

impl MergeTarget {
    /// Short label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            MergeTarget::Base => "base",
            MergeTarget::Side1 => "file1",
            MergeTarget::Side2 => "file2",
            MergeTarget::Conflict => "conflict",
        }
    }
}

/// Outcome of diffing one coordinate across the three sides
///
/// The three snapshots travel with the decision because applying any side
/// later needs that side's formula and value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeDecision {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based)
    pub col: u32,
    /// Where the merged cell comes from
    pub target: MergeTarget,
    /// Common ancestor's cell
    pub base: CellSnapshot,
    /// file1's cell
    pub side1: CellSnapshot,
    /// file2's cell
    pub side2: CellSnapshot,
}

impl MergeDecision {
    /// Whether both sides changed this cell
    pub fn is_conflict(&self) -> bool {
        self.target == MergeTarget::Conflict
    }

    /// The cell's address
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }

    /// Snapshot belonging to `target`, `None` for [`MergeTarget::Conflict`]
    pub fn snapshot(&self, target: MergeTarget) -> Option<&CellSnapshot> {
        match target {
            MergeTarget::Base => Some(&self.base),
            MergeTarget::Side1 => Some(&self.side1),
            MergeTarget::Side2 => Some(&self.side2),
            MergeTarget::Conflict => None,
        }
    }
}

/// Classify one coordinate
///
/// A side differs when its formula or its value differs from base. Both
/// sides differing is a conflict even when they made the same edit: two
/// sides converging on one new value are not merged automatically.
pub fn classify(base: CellSnapshot, side1: CellSnapshot, side2: CellSnapshot) -> MergeDecision {
    let side1_differs = side1.differs_from(&base);
    let side2_differs = side2.differs_from(&base);

    let target = match (side1_differs, side2_differs) {
        (true, true) => MergeTarget::Conflict,
        (true, false) => MergeTarget::Side1,
        (false, true) => MergeTarget::Side2,
        (false, false) => MergeTarget::Base,
    };

    MergeDecision {
        row: base.row,
        col: base.col,
        target,
        base,
        side1,
        side2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use proptest::prelude::*;

    fn lit(v: f64) -> CellSnapshot {
        CellSnapshot::literal(3, 2, v)
    }

    #[test]
    fn test_unchanged_cell_is_base() {
        let d = classify(lit(10.0), lit(10.0), lit(10.0));
        assert_eq!(d.target, MergeTarget::Base);
        assert!(!d.is_conflict());
        assert_eq!(d.address().to_string(), "B3");
    }

    #[test]
    fn test_single_side_change() {
        assert_eq!(classify(lit(10.0), lit(20.0), lit(10.0)).target, MergeTarget::Side1);
        assert_eq!(classify(lit(10.0), lit(10.0), lit(30.0)).target, MergeTarget::Side2);
    }

    #[test]
    fn test_divergent_conflict() {
        let d = classify(lit(10.0), lit(20.0), lit(30.0));
        assert_eq!(d.target, MergeTarget::Conflict);
        assert!(d.snapshot(MergeTarget::Conflict).is_none());
        assert_eq!(d.snapshot(MergeTarget::Side2).unwrap().value, CellValue::Number(30.0));
    }

    #[test]
    fn test_convergent_edits_still_conflict() {
        let d = classify(lit(10.0), lit(20.0), lit(20.0));
        assert_eq!(d.target, MergeTarget::Conflict);
    }

    #[test]
    fn test_formula_change_with_same_cached_value() {
        let base = CellSnapshot::new(1, 1, "A2+A3", CellValue::Number(5.0));
        let side1 = CellSnapshot::new(1, 1, "A3+A2", CellValue::Number(5.0));
        let d = classify(base.clone(), side1, base.clone());
        assert_eq!(d.target, MergeTarget::Side1);
    }

    #[test]
    fn test_empty_to_value_and_back() {
        let empty = CellSnapshot::empty(1, 1);
        let filled = CellSnapshot::literal(1, 1, "x");

        assert_eq!(
            classify(empty.clone(), filled.clone(), empty.clone()).target,
            MergeTarget::Side1
        );
        assert_eq!(
            classify(filled.clone(), filled.clone(), empty.clone()).target,
            MergeTarget::Side2
        );
        assert_eq!(
            classify(empty.clone(), empty.clone(), empty).target,
            MergeTarget::Base
        );
    }

    fn snapshot_strategy() -> impl Strategy<Value = CellSnapshot> {
        let value = prop_oneof![
            Just(CellValue::Empty),
            (-5i32..5).prop_map(|n| CellValue::Number(n as f64)),
            "[a-c]{0,2}".prop_map(CellValue::String),
            any::<bool>().prop_map(CellValue::Boolean),
        ];
        let formula = prop_oneof![Just(String::new()), Just("A1+1".to_string())];
        (formula, value).prop_map(|(f, v)| CellSnapshot::new(1, 1, f, v))
    }

    proptest! {
        #[test]
        fn prop_self_merge_is_base(cell in snapshot_strategy()) {
            let d = classify(cell.clone(), cell.clone(), cell);
            prop_assert_eq!(d.target, MergeTarget::Base);
        }

        #[test]
        fn prop_sides_are_symmetric(
            base in snapshot_strategy(),
            a in snapshot_strategy(),
            b in snapshot_strategy(),
        ) {
            let forward = classify(base.clone(), a.clone(), b.clone()).target;
            let swapped = classify(base, b, a).target;
            let expected = match forward {
                MergeTarget::Side1 => MergeTarget::Side2,
                MergeTarget::Side2 => MergeTarget::Side1,
                other => other,
            };
            prop_assert_eq!(swapped, expected);
        }
    }
}
