//! The preallocated DSP memory arena.
//!
//! One fixed block of sample memory is acquired at startup and reused in
//! place by whichever algorithm currently owns it. Algorithm switches never
//! allocate: the previous occupant is destroyed and the next one constructs
//! itself over the same memory. A fresh occupant must not assume the arena
//! is zeroed; the delay line's first-lap guard exists for exactly this
//! reason.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Arena capacity in interleaved `i16` samples (129 KiB of sample memory,
/// about 0.69 s of stereo audio at 48 kHz).
pub const ARENA_SAMPLES: usize = 129 * 1024 / 2;

/// The single preallocated DSP memory block.
///
/// Failure to acquire this memory at startup is fatal: there is no degraded
/// mode without it, so the allocation is allowed to abort the process.
#[derive(Debug)]
pub struct Arena {
    samples: Vec<i16>,
}

impl Arena {
    /// Allocate the arena at its fixed capacity.
    pub fn new() -> Self {
        Self {
            samples: vec![0; ARENA_SAMPLES],
        }
    }

    /// Capacity in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the arena is empty (never true for a constructed arena).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mutable view of the whole arena for the current occupant.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_capacity() {
        let arena = Arena::new();
        assert_eq!(arena.len(), ARENA_SAMPLES);
        assert!(!arena.is_empty());
    }
}
