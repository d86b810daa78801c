//! Saturation and hysteresis quantization helpers.
//!
//! These are the numeric primitives the whole signal path leans on:
//! saturating narrowing for every audio accumulation, and two flavors of
//! hysteresis for turning noisy 12-bit control voltages into stable
//! parameter updates.

/// Full-scale value of a conditioned 12-bit control reading.
pub const CONTROL_FULL_SCALE: i16 = 4095;

/// Change threshold for [`quantize_with_hysteresis`], in control counts.
const HYST_THRESH: i16 = 16;

/// Clamp a wide intermediate to the signed 16-bit sample range.
///
/// Total over all of `i32`; audio arithmetic in this crate saturates
/// rather than wraps.
///
/// # Example
/// ```rust
/// use ondas_core::saturate16;
///
/// assert_eq!(saturate16(1234), 1234);
/// assert_eq!(saturate16(40_000), 32767);
/// assert_eq!(saturate16(-40_000), -32768);
/// ```
#[inline]
pub fn saturate16(wide: i32) -> i16 {
    wide.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Update `state` from a raw control value, suppressing jitter.
///
/// Reports `true` (and stores `new_value`) only when the reading moved more
/// than the hysteresis threshold away from the held value, or when it sits
/// at either domain extreme (0 or [`CONTROL_FULL_SCALE`]) so the ends of a
/// knob's travel are always reachable exactly.
pub fn quantize_with_hysteresis(state: &mut i16, new_value: i16) -> bool {
    let diff = (new_value - *state).abs();
    if (diff > HYST_THRESH || new_value == 0 || new_value == CONTROL_FULL_SCALE)
        && *state != new_value
    {
        *state = new_value;
        return true;
    }
    false
}

/// Quantize a 12-bit control value into coarse buckets with a guard band.
///
/// `span` is the ratio divisor: bucket width is `4096 / span`, and with
/// rounding the reachable bucket indices are `0..=span` (`span + 1`
/// discrete levels). A held bucket only changes once the input moves more
/// than roughly two thirds of a bucket width away from the held bucket's
/// center, so boundary noise never flaps the selection. The domain
/// extremes (0 and 0xFFF) skip the guard band entirely so the end stops
/// always select their bucket.
///
/// Returns `true` when `state` was updated to a new bucket.
///
/// `span` must be nonzero.
pub fn quantize_ratio_with_hysteresis(state: &mut u16, input: u16, span: u8) -> bool {
    debug_assert!(span > 0, "span must be nonzero");
    let scale = 4096 / i16::from(span);
    let rnd = scale / 2;
    let guard = (2 * scale / 3).max(1);

    // End stops select directly, no guard band.
    if input == 0 || input == 0xFFF {
        let bucket = ((input as i16 + rnd) / scale) as u16;
        if bucket == *state {
            return false;
        }
        *state = bucket;
        return true;
    }

    let diff = (*state as i16 * scale - input as i16).abs();
    if diff > guard {
        *state = ((input as i16 + rnd) / scale) as u16;
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturate16_passes_in_range() {
        assert_eq!(saturate16(0), 0);
        assert_eq!(saturate16(32767), 32767);
        assert_eq!(saturate16(-32768), -32768);
    }

    #[test]
    fn saturate16_clamps_out_of_range() {
        assert_eq!(saturate16(32768), 32767);
        assert_eq!(saturate16(-32769), -32768);
        assert_eq!(saturate16(i32::MAX), 32767);
        assert_eq!(saturate16(i32::MIN), -32768);
    }

    #[test]
    fn hysteresis_suppresses_small_moves() {
        let mut state = 1000;
        assert!(!quantize_with_hysteresis(&mut state, 1010));
        assert_eq!(state, 1000);
        assert!(!quantize_with_hysteresis(&mut state, 1016));
        assert_eq!(state, 1000);
    }

    #[test]
    fn hysteresis_reports_large_moves() {
        let mut state = 1000;
        assert!(quantize_with_hysteresis(&mut state, 1017));
        assert_eq!(state, 1017);
        // Same value again: no change reported.
        assert!(!quantize_with_hysteresis(&mut state, 1017));
    }

    #[test]
    fn hysteresis_extremes_always_land() {
        let mut state = 5;
        assert!(quantize_with_hysteresis(&mut state, 0));
        assert_eq!(state, 0);

        let mut state = CONTROL_FULL_SCALE - 3;
        assert!(quantize_with_hysteresis(&mut state, CONTROL_FULL_SCALE));
        assert_eq!(state, CONTROL_FULL_SCALE);
    }

    #[test]
    fn ratio_hysteresis_span_two_reaches_three_buckets() {
        // span = 2 -> scale 2048, buckets 0, 1, 2.
        let mut state = 0;
        assert!(!quantize_ratio_with_hysteresis(&mut state, 100, 2));
        assert!(quantize_ratio_with_hysteresis(&mut state, 2048, 2));
        assert_eq!(state, 1);
        assert!(quantize_ratio_with_hysteresis(&mut state, 0xFFF, 2));
        assert_eq!(state, 2);
    }

    #[test]
    fn ratio_hysteresis_guard_band_holds_boundary() {
        // Sitting just past the raw boundary must not change the bucket;
        // the guard band is ~2/3 of a bucket width past the held center.
        let mut state = 0;
        let guard = 2 * 2048 / 3;
        assert!(!quantize_ratio_with_hysteresis(&mut state, 1025, 2));
        assert!(!quantize_ratio_with_hysteresis(&mut state, guard as u16, 2));
        assert!(quantize_ratio_with_hysteresis(
            &mut state,
            guard as u16 + 1,
            2
        ));
        assert_eq!(state, 1);
    }

    #[test]
    fn ratio_hysteresis_no_repeat_report() {
        let mut state = 0;
        assert!(quantize_ratio_with_hysteresis(&mut state, 2048, 2));
        // Same region again: already in bucket 1, no report.
        assert!(!quantize_ratio_with_hysteresis(&mut state, 2048, 2));
        assert!(!quantize_ratio_with_hysteresis(&mut state, 2100, 2));
    }

    #[test]
    #[should_panic]
    fn ratio_hysteresis_rejects_zero_span() {
        let mut state = 0;
        quantize_ratio_with_hysteresis(&mut state, 100, 0);
    }

    #[test]
    fn ratio_hysteresis_endpoint_idempotent() {
        let mut state = 0;
        assert!(quantize_ratio_with_hysteresis(&mut state, 0xFFF, 2));
        assert!(!quantize_ratio_with_hysteresis(&mut state, 0xFFF, 2));
        assert!(quantize_ratio_with_hysteresis(&mut state, 0, 2));
        assert!(!quantize_ratio_with_hysteresis(&mut state, 0, 2));
    }
}
