//! Integer DC blocking filter for feedback paths.
//!
//! A one-pole highpass in leaky-integrator form:
//!
//! ```text
//! y[n]   = x[n] - acc[n-1] >> 8
//! acc[n] = acc[n-1] + y[n]
//! ```
//!
//! The accumulator tracks the running DC estimate with a 1/256 leak, giving
//! a cutoff of roughly 30 Hz at 48 kHz: low enough to be inaudible, high
//! enough to keep a long feedback loop from charging up with DC bias.

use crate::saturate16;

/// One-pole integer DC blocker.
///
/// Used on the delay feedback path, where any DC component would otherwise
/// accumulate on every lap of the loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcBlocker {
    /// Running DC estimate, 8 fractional bits.
    acc: i32,
}

impl DcBlocker {
    /// Create a blocker with zeroed state.
    pub const fn new() -> Self {
        Self { acc: 0 }
    }

    /// Process one sample, returning the DC-free, saturated output.
    #[inline]
    pub fn process(&mut self, input: i16) -> i16 {
        let y = i32::from(input) - (self.acc >> 8);
        self.acc += y;
        saturate16(y)
    }

    /// Reset the DC estimate to zero.
    pub fn reset(&mut self) {
        self.acc = 0;
    }
}
