//! The audio orchestrator and its caller-side handle.
//!
//! [`AudioEngine`] runs on the engine context: it owns the effect host and
//! processes one block per call, with wet/dry mixing, peak metering, and
//! the mute ramp. Between blocks the context polls [`AudioEngine::service`]
//! to apply requests posted by other contexts through [`EngineHandle`].
//!
//! The handshake is deliberately narrow. A caller claims a token slot,
//! publishes its payload, flips the token to requested, and spins until the
//! servant acknowledges. The servant only ever touches engine state between
//! blocks, so algorithm teardown and setup never race the audio path.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ondas_core::{BLOCK_SAMPLES, CONTROL_FULL_SCALE, ParameterTable, peak_hold, saturate16};
use ondas_fx::{AlgorithmId, EffectDescriptor, EffectHost};
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::shared::{
    EngineShared, MuteState, TOKEN_ACKNOWLEDGED, TOKEN_CLAIMED, TOKEN_IDLE, TOKEN_REQUESTED,
};
use crate::store::TagStore;
use std::sync::atomic::{AtomicU8, Ordering};

/// Mute ramp length in frames; also the scaling shift (2^9 = 512).
const MUTE_RAMP_FRAMES: i32 = 512;
const MUTE_RAMP_BITS: i32 = 9;

/// How long callers wait for the engine context to park or resume.
const COMPANION_TIMEOUT: Duration = Duration::from_millis(100);

/// The block-rate audio processor.
///
/// Owned and driven by exactly one context. Everything a caller may touch
/// concurrently lives in the shared state; everything else is plain owned
/// data, so the processing path needs no locks.
#[derive(Debug)]
pub struct AudioEngine {
    shared: Arc<EngineShared>,
    host: EffectHost,
    /// Mute ramp position, valid in [0, 512].
    mute_counter: i32,
    /// Wet signal scratch, sized to the largest block seen.
    scratch: Vec<i16>,
    /// Start of the previous block, for load metering.
    prev_start: Option<Instant>,
}

impl AudioEngine {
    /// Create an engine with the placeholder algorithm loaded, muted.
    pub fn new() -> Self {
        let engine = Self {
            shared: Arc::new(EngineShared::new()),
            host: EffectHost::new(),
            mute_counter: 0,
            scratch: vec![0; BLOCK_SAMPLES],
            prev_start: None,
        };
        info!(algorithm = ?engine.host.active(), "audio engine initialized");
        engine
    }

    /// The engine's shared state.
    pub fn shared(&self) -> &Arc<EngineShared> {
        &self.shared
    }

    /// Create a caller-side handle.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Descriptor of the active algorithm.
    pub fn descriptor(&self) -> &'static EffectDescriptor {
        self.host.descriptor()
    }

    /// Render a parameter slot of the active algorithm for display.
    pub fn render_parameter(&self, index: usize) -> Option<String> {
        self.host.render_parameter(index, self.shared.params())
    }

    /// Whether the engine context should currently keep its hands off
    /// the audio path.
    pub fn is_parked(&self) -> bool {
        self.shared.companion_pause.load(Ordering::Acquire)
    }

    /// Apply pending caller requests. Called once per block, between
    /// blocks, by the context that owns the engine.
    pub fn service(&mut self) {
        // Algorithm change.
        if self.shared.algo_token.load(Ordering::Acquire) == TOKEN_REQUESTED {
            let index = self.shared.algo_next.load(Ordering::Acquire);
            if let Some(id) = AlgorithmId::from_index(index) {
                self.host.select(id);
                self.shared.algorithm.store(index, Ordering::Release);
                debug!(?id, "algorithm switched");
            }
            self.shared
                .algo_token
                .store(TOKEN_ACKNOWLEDGED, Ordering::Release);
        }

        // Mute change. Only a settled ramp accepts a new direction.
        if self.shared.mute_token.load(Ordering::Acquire) == TOKEN_REQUESTED {
            let enable = self.shared.mute_next.load(Ordering::Acquire);
            match (self.shared.mute_state(), enable) {
                (MuteState::Open, true) => {
                    self.mute_counter = MUTE_RAMP_FRAMES;
                    self.shared
                        .mute_state
                        .store(MuteState::Closing as u8, Ordering::Release);
                    debug!("mute ramp closing");
                }
                (MuteState::Closed, false) => {
                    self.mute_counter = 0;
                    self.shared
                        .mute_state
                        .store(MuteState::Opening as u8, Ordering::Release);
                    debug!("mute ramp opening");
                }
                _ => {}
            }
            self.shared
                .mute_token
                .store(TOKEN_ACKNOWLEDGED, Ordering::Release);
        }

        // Park/resume for the persistence exclusion window.
        let pause = self.shared.companion_pause.load(Ordering::Acquire);
        if pause != self.shared.companion_parked.load(Ordering::Acquire) {
            self.shared.companion_parked.store(pause, Ordering::Release);
            debug!(parked = pause, "engine context park state changed");
        }
    }

    /// Process one interleaved stereo block.
    ///
    /// Input metering, active effect, wet/dry mix from control channel 1,
    /// mute ramp, output metering. Never blocks, never allocates once the
    /// scratch has grown to the block size in use.
    pub fn process(&mut self, dst: &mut [i16], src: &[i16]) {
        debug_assert_eq!(dst.len(), src.len());
        let start = Instant::now();
        if let Some(prev) = self.prev_start {
            self.shared
                .period_us
                .store((start - prev).as_micros() as u64, Ordering::Release);
        }
        self.prev_start = Some(start);

        let frames = src.len() / 2;
        let mut in_peaks = [0u16; 2];
        for i in 0..frames {
            peak_hold(src[2 * i], &mut in_peaks[0]);
            peak_hold(src[2 * i + 1], &mut in_peaks[1]);
        }
        self.shared.note_level(0, in_peaks[0]);
        self.shared.note_level(1, in_peaks[1]);

        if src.len() > self.scratch.len() {
            self.scratch.resize(src.len(), 0);
        }
        let wet_buf = &mut self.scratch[..src.len()];
        self.host.process(wet_buf, src, self.shared.params());

        let wet = i32::from(self.shared.channel(1));
        let dry = i32::from(CONTROL_FULL_SCALE) - wet;

        let mut out_peaks = [0u16; 2];
        for i in 0..frames {
            let mut left = saturate16(
                (i32::from(wet_buf[2 * i]) * wet + i32::from(src[2 * i]) * dry) >> 12,
            );
            let mut right = saturate16(
                (i32::from(wet_buf[2 * i + 1]) * wet + i32::from(src[2 * i + 1]) * dry) >> 12,
            );

            match self.shared.mute_state() {
                MuteState::Open => {}
                MuteState::Closing => {
                    left = saturate16((i32::from(left) * self.mute_counter) >> MUTE_RAMP_BITS);
                    right = saturate16((i32::from(right) * self.mute_counter) >> MUTE_RAMP_BITS);
                    self.mute_counter -= 1;
                    if self.mute_counter == 0 {
                        self.shared
                            .mute_state
                            .store(MuteState::Closed as u8, Ordering::Release);
                    }
                }
                MuteState::Closed => {
                    left = 0;
                    right = 0;
                }
                MuteState::Opening => {
                    left = saturate16((i32::from(left) * self.mute_counter) >> MUTE_RAMP_BITS);
                    right = saturate16((i32::from(right) * self.mute_counter) >> MUTE_RAMP_BITS);
                    self.mute_counter += 1;
                    if self.mute_counter == MUTE_RAMP_FRAMES {
                        self.mute_counter = 0;
                        self.shared
                            .mute_state
                            .store(MuteState::Open as u8, Ordering::Release);
                    }
                }
            }

            dst[2 * i] = left;
            dst[2 * i + 1] = right;
            peak_hold(left, &mut out_peaks[0]);
            peak_hold(right, &mut out_peaks[1]);
        }
        self.shared.note_level(2, out_peaks[0]);
        self.shared.note_level(3, out_peaks[1]);

        self.shared
            .duty_us
            .store(start.elapsed().as_micros() as u64, Ordering::Release);
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable caller-side handle to a running engine.
///
/// All methods block until the engine context has serviced the request,
/// so they must never be called from the engine context itself.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    shared: Arc<EngineShared>,
}

impl EngineHandle {
    /// The engine's shared state.
    pub fn shared(&self) -> &Arc<EngineShared> {
        &self.shared
    }

    /// Claim a token slot, serializing against other callers.
    fn claim(token: &AtomicU8) {
        while token
            .compare_exchange(TOKEN_IDLE, TOKEN_CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            thread::yield_now();
        }
    }

    /// Flip a claimed token to requested and wait for the acknowledge.
    fn request_and_wait(token: &AtomicU8) {
        token.store(TOKEN_REQUESTED, Ordering::Release);
        while token.load(Ordering::Acquire) != TOKEN_ACKNOWLEDGED {
            thread::yield_now();
        }
        token.store(TOKEN_IDLE, Ordering::Release);
    }

    /// Switch the active algorithm and block until the swap has happened.
    ///
    /// Out-of-range indices are a no-op. The switch itself is not
    /// click-free; callers mute around it.
    pub fn select_algorithm(&self, index: u8) {
        if AlgorithmId::from_index(index).is_none() {
            return;
        }
        Self::claim(&self.shared.algo_token);
        self.shared.algo_next.store(index, Ordering::Release);
        Self::request_and_wait(&self.shared.algo_token);
    }

    /// Request a mute or unmute and block until the ramp has finished.
    ///
    /// Returns immediately if the ramp is already settled in the desired
    /// state. On return the audio is guaranteed fully silent (mute) or
    /// fully open (unmute).
    pub fn set_mute(&self, enable: bool) {
        let settled = if enable {
            MuteState::Closed
        } else {
            MuteState::Open
        };
        if self.shared.mute_state() == settled {
            return;
        }

        Self::claim(&self.shared.mute_token);
        self.shared.mute_next.store(enable, Ordering::Release);
        Self::request_and_wait(&self.shared.mute_token);

        while self.shared.mute_state().is_transitioning() {
            thread::yield_now();
        }
    }

    /// Ask the engine context to park (or resume) and wait for it.
    ///
    /// On timeout the request is rolled back so a wedged caller can never
    /// leave the audio path half-stopped.
    pub fn disable_companion(&self, pause: bool, timeout: Duration) -> Result<(), EngineError> {
        self.shared.companion_pause.store(pause, Ordering::Release);
        let deadline = Instant::now() + timeout;
        while self.shared.companion_parked.load(Ordering::Acquire) != pause {
            if Instant::now() >= deadline {
                self.shared.companion_pause.store(!pause, Ordering::Release);
                warn!(pause, ?timeout, "companion park request timed out");
                return Err(EngineError::CompanionTimeout(timeout));
            }
            thread::yield_now();
        }
        Ok(())
    }

    /// Commit the tag store under full audio exclusion.
    ///
    /// Mute, park the engine context, commit, resume, unmute. Resume and
    /// unmute are always attempted; the first error wins.
    pub fn commit_store(&self, store: &mut dyn TagStore) -> Result<(), EngineError> {
        info!("committing tag store");
        self.set_mute(true);

        if let Err(e) = self.disable_companion(true, COMPANION_TIMEOUT) {
            self.set_mute(false);
            return Err(e);
        }

        let committed = store.commit();
        let resumed = self.disable_companion(false, COMPANION_TIMEOUT);
        self.set_mute(false);

        committed.and(resumed)
    }

    /// Convenience mirror of [`EngineShared::params`].
    pub fn params(&self) -> &ParameterTable {
        self.shared.params()
    }
}
