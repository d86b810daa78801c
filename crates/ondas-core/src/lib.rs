//! Ondas Core - fixed-point DSP primitives for the ondas signal path
//!
//! This crate provides the numeric building blocks shared by the effects
//! framework and the audio engine. Everything here is integer fixed-point,
//! allocation-free, and safe to call from a hard-real-time context.
//!
//! # Core Abstractions
//!
//! ## Saturation and Quantization
//!
//! - [`saturate16`] - signed saturation of wide intermediates to 16 bits
//! - [`quantize_with_hysteresis`] - jitter suppression for raw control values
//! - [`quantize_ratio_with_hysteresis`] - guard-banded bucketing for
//!   discrete mode/range selection from a noisy 12-bit control
//!
//! ## Filters and Metering
//!
//! - [`DcBlocker`] - integer one-pole DC blocker for feedback loops
//! - [`peak_hold`] - rectify-and-hold level metering
//!
//! ## Shared State
//!
//! - [`ParameterTable`] - the fixed table of control parameter slots shared
//!   between the acquisition path, the UI layer, and the active effect
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! ondas-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod dc_blocker;
pub mod level;
pub mod math;
pub mod params;

pub use dc_blocker::DcBlocker;
pub use level::peak_hold;
pub use math::{
    CONTROL_FULL_SCALE, quantize_ratio_with_hysteresis, quantize_with_hysteresis, saturate16,
};
pub use params::{PARAM_SLOTS, ParameterTable};

/// Audio sample rate in Hz, fixed by the codec clocking.
pub const SAMPLE_RATE: u32 = 48_000;

/// Frames (stereo sample pairs) per processing block.
pub const BLOCK_FRAMES: usize = 32;

/// Interleaved samples per processing block (left + right).
pub const BLOCK_SAMPLES: usize = BLOCK_FRAMES * 2;
