//! Property-based tests for the ondas-core numeric primitives.

use ondas_core::{
    DcBlocker, quantize_ratio_with_hysteresis, quantize_with_hysteresis, saturate16,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// saturate16 is the identity inside the i16 range and clamps to the
    /// nearest boundary outside it, for arbitrary 32-bit inputs.
    #[test]
    fn saturate16_total(x in any::<i32>()) {
        let y = saturate16(x);
        if (i32::from(i16::MIN)..=i32::from(i16::MAX)).contains(&x) {
            prop_assert_eq!(i32::from(y), x);
        } else if x > 0 {
            prop_assert_eq!(y, i16::MAX);
        } else {
            prop_assert_eq!(y, i16::MIN);
        }
    }

    /// Once a value has been accepted, repeating it never reports another
    /// change.
    #[test]
    fn hysteresis_idempotent(start in 0i16..=4095, next in 0i16..=4095) {
        let mut state = start;
        quantize_with_hysteresis(&mut state, next);
        prop_assert!(!quantize_with_hysteresis(&mut state, next));
    }

    /// Ratio quantization never reports two consecutive changes for the
    /// same input, and the stored bucket stays within 0..=span.
    #[test]
    fn ratio_hysteresis_stable(
        start in 0u16..=2,
        input in 0u16..=0xFFF,
        span in 1u8..=8,
    ) {
        let mut state = u16::from(span).min(start);
        quantize_ratio_with_hysteresis(&mut state, input, span);
        prop_assert!(!quantize_ratio_with_hysteresis(&mut state, input, span));
        prop_assert!(state <= u16::from(span), "bucket {state} exceeds span {span}");
    }

    /// A constant input always settles to zero through the DC blocker.
    #[test]
    fn dc_blocker_settles(dc in -32768i16..=32767) {
        let mut blocker = DcBlocker::new();
        let mut out = 0;
        for _ in 0..60_000 {
            out = blocker.process(dc);
        }
        prop_assert!(out.abs() <= 1, "residual {out} for dc {dc}");
    }
}
