//! Ondas Engine - real-time orchestration of the ondas signal path.
//!
//! This crate ties the DSP primitives and the effect framework into a
//! running signal path: control-voltage acquisition feeding the shared
//! parameter table, the block-rate orchestrator with wet/dry mixing and a
//! click-free mute ramp, the lock-free handshake that lets other contexts
//! change algorithms and mute state safely, and the double-buffered duplex
//! transport that moves frames in and out.
//!
//! # Contexts
//!
//! One context owns the [`AudioEngine`] and pumps the [`DuplexTransport`];
//! every other context talks to it through a cloned [`EngineHandle`] and
//! the shared [`EngineShared`] state. Handle methods block until the
//! engine context services them, so they must never be called from the
//! engine context itself.
//!
//! # Collaborators
//!
//! The codec control port and the non-volatile tag store are traits
//! ([`CodecControl`], [`TagStore`]); the engine only prescribes when they
//! are called (the commit exclusion sequence), not how they are built.

pub mod acquisition;
pub mod codec;
pub mod error;
pub mod orchestrator;
pub mod shared;
pub mod store;
pub mod transport;

pub use acquisition::ControlAcquisition;
pub use codec::{CodecControl, MockCodec, bring_up};
pub use error::EngineError;
pub use orchestrator::{AudioEngine, EngineHandle};
pub use shared::{EngineShared, MuteState};
pub use store::{MemoryTagStore, TagStore};
pub use transport::{DuplexTransport, FrameSink, FrameSource};
