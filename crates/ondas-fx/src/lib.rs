//! Ondas FX - the pluggable effect algorithm framework.
//!
//! Effects are a closed, build-time-known set: the registry describes them,
//! [`EffectHost`] owns exactly one live instance at a time, and all DSP
//! state that needs bulk memory lives in one preallocated [`Arena`] that is
//! reused in place on every algorithm switch.
//!
//! # Abstractions
//!
//! - [`AlgorithmId`] / [`EffectDescriptor`] - the algorithm registry
//! - [`Arena`] - the single preallocated DSP memory block
//! - [`EffectState`] - tagged variant holding the active algorithm's state
//! - [`EffectHost`] - arena + active instance, with in-place switching
//!
//! # Algorithms
//!
//! - [`Bypass`] - placeholder slot that outputs silence
//! - [`Vca`] - voltage-controlled amplifier with per-block gain slewing
//! - [`CleanDelay`] - crossfading delay line with feedback and DC blocking
//!
//! Processing is integer fixed-point on interleaved stereo `i16` blocks;
//! nothing here allocates after construction.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod arena;
pub mod bypass;
pub mod clean_delay;
pub mod host;
pub mod registry;
pub mod vca;

pub use arena::{ARENA_SAMPLES, Arena};
pub use bypass::Bypass;
pub use clean_delay::CleanDelay;
pub use host::{EffectHost, EffectState};
pub use registry::{AlgorithmId, EFFECT_COUNT, EffectDescriptor, MAX_PARAMS, descriptor};
pub use vca::Vca;
