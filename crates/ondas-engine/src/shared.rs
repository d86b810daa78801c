//! Lock-free state shared between the engine context and its callers.
//!
//! `EngineShared` lives behind an `Arc` for the lifetime of the engine. The
//! engine context (the one pumping audio) reads control values and services
//! requests; caller contexts (UI, acquisition) publish control values and
//! post requests through the tri-state tokens. Everything is atomics, no
//! locks anywhere near the audio path.

use std::sync::atomic::{AtomicBool, AtomicI16, AtomicU8, AtomicU16, AtomicU64, Ordering};

use ondas_core::ParameterTable;

/// Token value: no request outstanding, slot free to claim.
pub(crate) const TOKEN_IDLE: u8 = 0;
/// Token value: request payload published, waiting for the servant.
pub(crate) const TOKEN_REQUESTED: u8 = 1;
/// Token value: servant has applied the request.
pub(crate) const TOKEN_ACKNOWLEDGED: u8 = 2;
/// Token value: a caller owns the slot but has not published the payload
/// yet. The servant ignores this state.
pub(crate) const TOKEN_CLAIMED: u8 = 3;

/// Mute ramp state, published for caller-side blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MuteState {
    /// Audio passes untouched.
    Open = 0,
    /// Ramping down toward silence.
    Closing = 1,
    /// Fully muted.
    Closed = 2,
    /// Ramping back up to full level.
    Opening = 3,
}

impl MuteState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Closing,
            2 => Self::Closed,
            3 => Self::Opening,
            _ => Self::Open,
        }
    }

    /// Whether a ramp is currently in flight.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Closing | Self::Opening)
    }
}

/// State shared across the engine and caller contexts.
///
/// Levels and load figures are advisory (metering); the parameter table and
/// channel values feed the audio path; the tokens carry the algorithm and
/// mute handshakes.
#[derive(Debug)]
pub struct EngineShared {
    /// Control parameter slots written by acquisition/UI, read by effects.
    params: ParameterTable,
    /// Live filtered control-channel values (channel 1 drives the wet mix).
    channels: [AtomicI16; 2],
    /// Peak-hold levels: input L/R, output L/R. Reset by the reader.
    levels: [AtomicU16; 4],
    /// Currently loaded algorithm index, published by the servant.
    pub(crate) algorithm: AtomicU8,
    /// Algorithm change handshake.
    pub(crate) algo_token: AtomicU8,
    pub(crate) algo_next: AtomicU8,
    /// Mute change handshake.
    pub(crate) mute_token: AtomicU8,
    pub(crate) mute_next: AtomicBool,
    /// Published mute ramp state.
    pub(crate) mute_state: AtomicU8,
    /// Caller asks the engine context to park (stop touching audio).
    pub(crate) companion_pause: AtomicBool,
    /// Servant confirms it is parked.
    pub(crate) companion_parked: AtomicBool,
    /// Per-frame processing time and frame period, microseconds.
    pub(crate) duty_us: AtomicU64,
    pub(crate) period_us: AtomicU64,
}

impl EngineShared {
    /// Create shared state. The engine starts muted.
    pub(crate) fn new() -> Self {
        Self {
            params: ParameterTable::new(),
            channels: [AtomicI16::new(0), AtomicI16::new(0)],
            levels: [
                AtomicU16::new(0),
                AtomicU16::new(0),
                AtomicU16::new(0),
                AtomicU16::new(0),
            ],
            algorithm: AtomicU8::new(0),
            algo_token: AtomicU8::new(TOKEN_IDLE),
            algo_next: AtomicU8::new(0),
            mute_token: AtomicU8::new(TOKEN_IDLE),
            mute_next: AtomicBool::new(false),
            mute_state: AtomicU8::new(MuteState::Closed as u8),
            companion_pause: AtomicBool::new(false),
            companion_parked: AtomicBool::new(false),
            duty_us: AtomicU64::new(0),
            period_us: AtomicU64::new(0),
        }
    }

    /// The shared control parameter table.
    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    /// Read a live control-channel value.
    pub fn channel(&self, index: usize) -> i16 {
        self.channels
            .get(index)
            .map_or(0, |c| c.load(Ordering::Acquire))
    }

    /// Publish a live control-channel value.
    pub fn set_channel(&self, index: usize, value: i16) {
        if let Some(c) = self.channels.get(index) {
            c.store(value, Ordering::Release);
        }
    }

    /// Raise a peak-hold level (0/1 input L/R, 2/3 output L/R).
    pub(crate) fn note_level(&self, index: usize, rectified: u16) {
        self.levels[index].fetch_max(rectified, Ordering::AcqRel);
    }

    /// Read and reset all four peak-hold levels.
    pub fn take_levels(&self) -> [u16; 4] {
        [
            self.levels[0].swap(0, Ordering::AcqRel),
            self.levels[1].swap(0, Ordering::AcqRel),
            self.levels[2].swap(0, Ordering::AcqRel),
            self.levels[3].swap(0, Ordering::AcqRel),
        ]
    }

    /// Index of the currently loaded algorithm.
    pub fn algorithm(&self) -> u8 {
        self.algorithm.load(Ordering::Acquire)
    }

    /// Current mute ramp state.
    pub fn mute_state(&self) -> MuteState {
        MuteState::from_u8(self.mute_state.load(Ordering::Acquire))
    }

    /// Whether the engine context has parked itself.
    pub fn is_parked(&self) -> bool {
        self.companion_parked.load(Ordering::Acquire)
    }

    /// Processing load over the last frame, in percent.
    ///
    /// Ratio of the time spent inside `process` to the frame period. Zero
    /// until two frames have been processed.
    pub fn load_percent(&self) -> u32 {
        let period = self.period_us.load(Ordering::Acquire);
        if period == 0 {
            return 0;
        }
        let duty = self.duty_us.load(Ordering::Acquire);
        (duty.saturating_mul(100) / period) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_muted() {
        let shared = EngineShared::new();
        assert_eq!(shared.mute_state(), MuteState::Closed);
        assert!(!shared.is_parked());
    }

    #[test]
    fn levels_hold_peaks_until_taken() {
        let shared = EngineShared::new();
        shared.note_level(0, 100);
        shared.note_level(0, 50);
        shared.note_level(3, 9000);
        assert_eq!(shared.take_levels(), [100, 0, 0, 9000]);
        assert_eq!(shared.take_levels(), [0, 0, 0, 0]);
    }

    #[test]
    fn channel_out_of_range_is_safe() {
        let shared = EngineShared::new();
        shared.set_channel(7, 123);
        assert_eq!(shared.channel(7), 0);
        shared.set_channel(1, 123);
        assert_eq!(shared.channel(1), 123);
    }

    #[test]
    fn load_percent_needs_a_period() {
        let shared = EngineShared::new();
        assert_eq!(shared.load_percent(), 0);
        shared.duty_us.store(250, Ordering::Release);
        shared.period_us.store(667, Ordering::Release);
        assert_eq!(shared.load_percent(), 37);
    }
}
