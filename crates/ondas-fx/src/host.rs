//! The effect host: one arena, one live algorithm.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use ondas_core::ParameterTable;

use crate::{
    arena::Arena,
    bypass::Bypass,
    clean_delay::CleanDelay,
    registry::{AlgorithmId, EffectDescriptor, descriptor},
    vca::Vca,
};

/// State of the currently loaded algorithm.
///
/// A closed enum rather than a trait object: the algorithm set is known at
/// build time, switching is a variant replacement, and the old state is
/// dropped exactly once before the new one is constructed.
#[derive(Debug)]
pub enum EffectState {
    /// Silence placeholder.
    Bypass(Bypass),
    /// Gain stage.
    Vca(Vca),
    /// Crossfading delay.
    CleanDelay(CleanDelay),
}

/// Owns the [`Arena`] and the active [`EffectState`].
///
/// Switching algorithms reuses the arena in place. The host never clears
/// the arena between occupants; algorithms that read from it are expected
/// to guard against stale contents themselves.
#[derive(Debug)]
pub struct EffectHost {
    arena: Arena,
    state: EffectState,
    id: AlgorithmId,
}

impl EffectHost {
    /// Create a host with the placeholder algorithm loaded.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            state: EffectState::Bypass(Bypass),
            id: AlgorithmId::Bypass,
        }
    }

    /// Id of the active algorithm.
    pub fn active(&self) -> AlgorithmId {
        self.id
    }

    /// Descriptor of the active algorithm.
    pub fn descriptor(&self) -> &'static EffectDescriptor {
        descriptor(self.id)
    }

    /// Replace the active algorithm.
    ///
    /// The outgoing state is destroyed before the incoming one is built, so
    /// an algorithm's teardown and its successor's setup never overlap. The
    /// switch is not click-free on its own; callers mute around it.
    pub fn select(&mut self, id: AlgorithmId) {
        self.state = match id {
            AlgorithmId::Bypass => EffectState::Bypass(Bypass),
            AlgorithmId::Vca => EffectState::Vca(Vca::new()),
            AlgorithmId::CleanDelay => EffectState::CleanDelay(CleanDelay::new(self.arena.len(), true)),
        };
        self.id = id;
    }

    /// Process one interleaved stereo block through the active algorithm.
    pub fn process(&mut self, dst: &mut [i16], src: &[i16], params: &ParameterTable) {
        match &mut self.state {
            EffectState::Bypass(fx) => fx.process(dst, src, params),
            EffectState::Vca(fx) => fx.process(dst, src, params),
            EffectState::CleanDelay(fx) => {
                fx.process(self.arena.samples_mut(), dst, src, params);
            }
        }
    }

    /// Render a parameter slot of the active algorithm for display.
    pub fn render_parameter(&self, index: usize, params: &ParameterTable) -> Option<String> {
        match &self.state {
            EffectState::Bypass(fx) => fx.render_parameter(index, params),
            EffectState::Vca(fx) => fx.render_parameter(index, params),
            EffectState::CleanDelay(fx) => fx.render_parameter(index, params),
        }
    }
}

impl Default for EffectHost {
    fn default() -> Self {
        Self::new()
    }
}
