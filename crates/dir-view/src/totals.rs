//! Running size totals for the directory and the current selection.

use serde::{Deserialize, Serialize};

/// Direction of a totals adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    Add,
    Subtract,
}

/// Incrementally maintained size totals.
///
/// After every operation, `total_directory_size` equals the sum of all live
/// item sizes and `total_selected_size` the sum over selected items. Callers
/// keep that true by applying deltas symmetrically: subtract the old stored
/// size before overwriting it, add the new one after — reading the size from
/// the item record itself, never a cached copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    total_directory_size: u64,
    total_selected_size: u64,
}

impl AggregateTotals {
    pub fn total_directory_size(&self) -> u64 {
        self.total_directory_size
    }

    pub fn total_selected_size(&self) -> u64 {
        self.total_selected_size
    }

    /// Adjusts the directory total by `size`, and the selected total too when
    /// the item is selected.
    pub fn apply_delta(&mut self, size: u64, is_selected: bool, sign: Delta) {
        match sign {
            Delta::Add => {
                self.total_directory_size += size;
                if is_selected {
                    self.total_selected_size += size;
                }
            }
            Delta::Subtract => {
                self.total_directory_size = self.total_directory_size.saturating_sub(size);
                if is_selected {
                    self.total_selected_size = self.total_selected_size.saturating_sub(size);
                }
            }
        }
    }

    /// Adjusts only the selected total, for selection changes that leave the
    /// directory contents untouched.
    pub fn apply_selection_delta(&mut self, size: u64, sign: Delta) {
        match sign {
            Delta::Add => self.total_selected_size += size,
            Delta::Subtract => {
                self.total_selected_size = self.total_selected_size.saturating_sub(size);
            }
        }
    }

    /// Zeroes both totals. Used on directory change (full reset).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_subtract_are_symmetric() {
        let mut totals = AggregateTotals::default();
        totals.apply_delta(4096, false, Delta::Add);
        totals.apply_delta(100, true, Delta::Add);
        assert_eq!(totals.total_directory_size(), 4196);
        assert_eq!(totals.total_selected_size(), 100);

        totals.apply_delta(100, true, Delta::Subtract);
        totals.apply_delta(4096, false, Delta::Subtract);
        assert_eq!(totals, AggregateTotals::default());
    }

    #[test]
    fn test_selection_delta_leaves_directory_total_alone() {
        let mut totals = AggregateTotals::default();
        totals.apply_delta(200, false, Delta::Add);
        totals.apply_selection_delta(200, Delta::Add);
        assert_eq!(totals.total_directory_size(), 200);
        assert_eq!(totals.total_selected_size(), 200);

        totals.apply_selection_delta(200, Delta::Subtract);
        assert_eq!(totals.total_directory_size(), 200);
        assert_eq!(totals.total_selected_size(), 0);
    }

    #[test]
    fn test_selected_delta_only_when_selected() {
        let mut totals = AggregateTotals::default();
        totals.apply_delta(50, false, Delta::Add);
        assert_eq!(totals.total_selected_size(), 0);
    }
}
