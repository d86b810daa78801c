//! Crossfading clean delay with feedback and DC blocking.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use ondas_core::{
    DcBlocker, PARAM_SLOTS, ParameterTable, SAMPLE_RATE, quantize_ratio_with_hysteresis,
    quantize_with_hysteresis, saturate16,
};

/// Crossfade length as a power of two; also the mix scaling shift.
const XFADE_BITS: u16 = 11;

/// Parameter slot carrying the delay amount.
const DELAY_SLOT: usize = 1;
/// Parameter slot carrying the feedback level.
const FEEDBACK_SLOT: usize = 2;
/// Parameter slot carrying the range selector.
const RANGE_SLOT: usize = 3;

/// Display labels for the three delay ranges.
static RANGE_NAMES: [&str; 3] = ["Short", "Medium", "Long"];

/// Stereo delay line with click-free retiming.
///
/// The delay tap never jumps: when the delay amount or range changes, a
/// second read offset is armed and the output crossfades from the old tap
/// to the new one over 2048 steps, after which the new offset becomes
/// current. Parameter changes are ignored while a crossfade is in flight.
///
/// The delay buffer is the caller-provided arena, treated as interleaved
/// stereo frames. The buffer is not cleared on construction; instead a
/// first-lap guard reads silence from any frame the write pointer has not
/// yet passed, so stale contents from a previous occupant are never heard.
///
/// Feedback runs through a one-pole DC blocker per channel so that a DC
/// offset cannot accumulate around the loop at high feedback settings.
#[derive(Debug)]
pub struct CleanDelay {
    /// Whether the range responds to the range parameter in real time.
    range_selectable: bool,
    /// Delay offset left-shift (1 = short, 2 = medium, 3 = long).
    range: u8,
    /// Quantized range bucket, kept for hysteresis and display.
    range_raw: u16,
    /// Buffer length in stereo frames.
    len: usize,
    /// Set until the write pointer wraps for the first time.
    first_lap: bool,
    /// Write pointer, in frames.
    wptr: usize,
    /// Current read offset, in frames behind the write pointer.
    roff1: usize,
    /// Pending read offset being crossfaded in.
    roff2: usize,
    /// Crossfade length and countdown, in channel samples.
    xflen: u16,
    xfcnt: u16,
    /// Delay control value with hysteresis applied.
    dly: i16,
    /// DC blockers on the feedback path, one per channel.
    dcb: [DcBlocker; 2],
    /// Last feedback samples, one per channel.
    fb: [i16; 2],
}

impl CleanDelay {
    /// Create a delay over an arena of `arena_samples` interleaved samples.
    ///
    /// When `range_selectable` is set the range tracks the range parameter;
    /// otherwise it is fixed at short.
    pub fn new(arena_samples: usize, range_selectable: bool) -> Self {
        Self {
            range_selectable,
            range: 1,
            range_raw: 0,
            len: arena_samples / 2,
            first_lap: true,
            wptr: 0,
            roff1: 1,
            roff2: 0,
            xflen: 1 << XFADE_BITS,
            xfcnt: 0,
            dly: 0,
            dcb: [DcBlocker::new(), DcBlocker::new()],
            fb: [0; 2],
        }
    }

    /// Wrap a tap offset around the write pointer.
    fn tap(&self, offset: usize) -> usize {
        let mut rptr = self.wptr as isize - offset as isize;
        if rptr < 0 {
            rptr += self.len as isize;
        }
        rptr as usize
    }

    /// Read one channel sample from a tap, honoring the first-lap guard.
    fn read_guarded(&self, arena: &[i16], rptr: usize, channel: usize) -> i16 {
        if !self.first_lap || rptr < self.wptr {
            arena[2 * rptr + channel]
        } else {
            0
        }
    }

    /// Process one interleaved stereo block through the arena.
    pub fn process(
        &mut self,
        arena: &mut [i16],
        dst: &mut [i16],
        src: &[i16],
        params: &ParameterTable,
    ) {
        debug_assert_eq!(dst.len(), src.len());
        debug_assert!(arena.len() >= 2 * self.len);

        // Retime only when the previous crossfade has finished.
        if self.xfcnt == 0 {
            let mut range_changed = false;
            if self.range_selectable {
                range_changed = quantize_ratio_with_hysteresis(
                    &mut self.range_raw,
                    params.get(RANGE_SLOT).unsigned_abs(),
                    2,
                );
                self.range = 1 + self.range_raw as u8;
            }

            if quantize_with_hysteresis(&mut self.dly, params.get(DELAY_SLOT)) || range_changed {
                let offset = ((i32::from(self.dly) << self.range) + 1) as usize;
                self.roff2 = offset.min(self.len - 2);
                self.xfcnt = self.xflen;
            }
        }

        let fb_lvl = i32::from(params.get(FEEDBACK_SLOT));

        for frame in 0..src.len() / 2 {
            for chl in 0..2 {
                let input = src[2 * frame + chl];

                // Mix feedback into the write sample.
                let mix = (i32::from(input) << 12) + i32::from(self.fb[chl]) * fb_lvl;
                arena[2 * self.wptr + chl] = saturate16(mix >> 12);

                // Main tap.
                let rptr = self.tap(self.roff1);
                let mut out = self.read_guarded(arena, rptr, chl);

                if self.xfcnt > 0 {
                    // Fade from the old tap to the pending one.
                    let rptr2 = self.tap(self.roff2);
                    let mut mix = i32::from(out) * i32::from(self.xfcnt);
                    mix += i32::from(self.read_guarded(arena, rptr2, chl))
                        * i32::from(self.xflen - self.xfcnt);
                    out = saturate16(mix >> XFADE_BITS);

                    self.xfcnt -= 1;
                    if self.xfcnt == 0 {
                        self.roff1 = self.roff2;
                    }
                }

                self.fb[chl] = self.dcb[chl].process(out);
                dst[2 * frame + chl] = out;
            }

            let prev = self.wptr;
            self.wptr = (self.wptr + 1) % self.len;
            if prev > self.wptr {
                self.first_lap = false;
            }
        }
    }

    /// Render a parameter slot for display.
    ///
    /// Slot 1 is the delay time in milliseconds, slot 2 the feedback as a
    /// percentage, slot 3 the range label. The slot 1 text depends on the
    /// range, so callers refresh it whenever slot 3 changes.
    pub fn render_parameter(&self, index: usize, params: &ParameterTable) -> Option<String> {
        if index == 0 || index >= PARAM_SLOTS {
            return None;
        }
        let text = match index {
            DELAY_SLOT => {
                let offset = ((i32::from(self.dly) << self.range) + 1) as usize;
                let ms = offset.min(self.len - 2) / (SAMPLE_RATE as usize / 1000);
                format!("{ms} ms")
            }
            RANGE_SLOT => {
                let label = RANGE_NAMES
                    .get(self.range_raw as usize)
                    .copied()
                    .unwrap_or("?");
                String::from(label)
            }
            _ => format!("{}%", params.get(index) / 41),
        };
        Some(text)
    }
}
