//! Peak-hold signal level metering.

/// Rectify `sig` and hold the peak in `level`.
///
/// The hold is reset externally (the UI reads the meter and zeroes it),
/// so repeated calls only ever raise the held value.
#[inline]
pub fn peak_hold(sig: i16, level: &mut u16) {
    let rect = sig.unsigned_abs();
    if *level < rect {
        *level = rect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_peak() {
        let mut level = 0;
        peak_hold(100, &mut level);
        peak_hold(-300, &mut level);
        peak_hold(50, &mut level);
        assert_eq!(level, 300);
    }

    #[test]
    fn full_scale_negative_does_not_wrap() {
        let mut level = 0;
        peak_hold(i16::MIN, &mut level);
        assert_eq!(level, 32768);
    }
}
