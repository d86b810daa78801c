//! Voltage-controlled amplifier with per-block gain slewing.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use ondas_core::{PARAM_SLOTS, ParameterTable, saturate16};

/// Parameter slot carrying the gain control value.
const GAIN_SLOT: usize = 1;

/// Gain stage driven by the gain parameter slot.
///
/// The gain is applied with 12 fractional bits (a control value of 4095 is
/// just shy of unity). To keep control steps from clicking, each block
/// linearly interpolates from the previous block's gain to the new target:
/// the first frame of a block always uses the old gain, and the slope is
/// the integer quotient `(target - gain) / frames`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Vca {
    gain: i16,
}

impl Vca {
    /// Create a VCA with the gain slewed up from zero.
    pub const fn new() -> Self {
        Self { gain: 0 }
    }

    /// Current slewed gain (for inspection/tests).
    pub fn gain(&self) -> i16 {
        self.gain
    }

    /// Process one interleaved stereo block.
    pub fn process(&mut self, dst: &mut [i16], src: &[i16], params: &ParameterTable) {
        debug_assert_eq!(dst.len(), src.len());
        let frames = src.len() / 2;
        if frames == 0 {
            return;
        }

        let target = params.get(GAIN_SLOT);
        let slope = (target - self.gain) / frames as i16;

        for i in 0..frames {
            let gain = i32::from(self.gain);
            dst[2 * i] = saturate16((i32::from(src[2 * i]) * gain) >> 12);
            dst[2 * i + 1] = saturate16((i32::from(src[2 * i + 1]) * gain) >> 12);
            self.gain += slope;
        }
    }

    /// Render a parameter slot as a raw percentage (slot 1 is the gain).
    pub fn render_parameter(&self, index: usize, params: &ParameterTable) -> Option<String> {
        if index == 0 || index >= PARAM_SLOTS {
            return None;
        }
        Some(format!("{}%", params.get(index) / 41))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ondas_core::BLOCK_SAMPLES;

    #[test]
    fn unity_gain_passes_signal() {
        let params = ParameterTable::new();
        params.set(GAIN_SLOT, 4095);
        let mut vca = Vca::new();

        // First block slews up from zero; run a second block at the target.
        let src = [4096i16; BLOCK_SAMPLES];
        let mut dst = [0i16; BLOCK_SAMPLES];
        vca.process(&mut dst, &src, &params);
        vca.process(&mut dst, &src, &params);

        // The integer slope settles within one slope quantum of the
        // target: gain ends at (4095 / 32) * 32 = 4064.
        let expected = (4096i32 * i32::from(vca.gain()) >> 12) as i16;
        assert_eq!(dst[BLOCK_SAMPLES - 1], expected);
        assert_eq!(vca.gain(), 4064);
    }

    #[test]
    fn gain_jump_slews_linearly() {
        let params = ParameterTable::new();
        params.set(GAIN_SLOT, 4095);
        let mut vca = Vca::new();

        let src = [4096i16; BLOCK_SAMPLES];
        let mut dst = [0i16; BLOCK_SAMPLES];
        vca.process(&mut dst, &src, &params);

        // First frame uses the previous gain (zero), not the new target.
        assert_eq!(dst[0], 0);
        assert_eq!(dst[1], 0);

        // Last frame uses slope * 31 with slope = 4095 / 32.
        let slope = 4095 / 32;
        let last = (4096i32 * i32::from(slope * 31) >> 12) as i16;
        assert_eq!(dst[BLOCK_SAMPLES - 2], last);
        assert_eq!(dst[BLOCK_SAMPLES - 1], last);

        // Monotonic ramp in between.
        for i in 1..BLOCK_SAMPLES / 2 {
            assert!(dst[2 * i] >= dst[2 * (i - 1)]);
        }
    }

    #[test]
    fn zero_gain_silences() {
        let params = ParameterTable::new();
        let mut vca = Vca::new();
        let src = [12345i16; BLOCK_SAMPLES];
        let mut dst = [99i16; BLOCK_SAMPLES];
        vca.process(&mut dst, &src, &params);
        assert!(dst.iter().all(|&s| s == 0));
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let params = ParameterTable::new();
        params.set(GAIN_SLOT, 4095);
        let mut vca = Vca::new();
        let src = [i16::MAX; BLOCK_SAMPLES];
        let mut dst = [0i16; BLOCK_SAMPLES];
        // Two blocks so the gain reaches its target.
        vca.process(&mut dst, &src, &params);
        vca.process(&mut dst, &src, &params);
        assert!(dst.iter().all(|&s| s >= 0), "gain must never wrap negative");
    }
}
