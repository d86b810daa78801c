//! The shared control parameter table.
//!
//! One fixed table of parameter slots connects three parties: the control
//! acquisition path writes the currently active slot, the UI layer restores
//! persisted values through explicit sets, and the active effect reads its
//! parameters once per block. Slots are single-word atomics so readers in
//! the real-time context never see torn values; readers may observe a
//! value up to one block stale.

use core::sync::atomic::{AtomicI16, Ordering};

/// Number of parameter slots.
///
/// Slot 0 is the algorithm-select control; slots 1..=3 are the active
/// effect's parameters.
pub const PARAM_SLOTS: usize = 4;

/// Fixed table of control parameter slots.
///
/// Out-of-range indices are silent no-ops on write and read as zero,
/// matching the engine-wide policy of clamping rather than crashing on
/// bad indices.
#[derive(Debug, Default)]
pub struct ParameterTable {
    slots: [AtomicI16; PARAM_SLOTS],
}

impl ParameterTable {
    /// Create a table with all slots zeroed.
    pub const fn new() -> Self {
        Self {
            slots: [
                AtomicI16::new(0),
                AtomicI16::new(0),
                AtomicI16::new(0),
                AtomicI16::new(0),
            ],
        }
    }

    /// Read a slot. Out-of-range indices read as zero.
    #[inline]
    pub fn get(&self, index: usize) -> i16 {
        self.slots
            .get(index)
            .map_or(0, |slot| slot.load(Ordering::Acquire))
    }

    /// Write a slot. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&self, index: usize, value: i16) {
        if let Some(slot) = self.slots.get(index) {
            slot.store(value, Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let table = ParameterTable::new();
        table.set(1, 2047);
        assert_eq!(table.get(1), 2047);
        assert_eq!(table.get(0), 0);
    }

    #[test]
    fn out_of_range_is_noop() {
        let table = ParameterTable::new();
        table.set(PARAM_SLOTS, 1234);
        assert_eq!(table.get(PARAM_SLOTS), 0);
        assert_eq!(table.get(usize::MAX), 0);
    }
}
