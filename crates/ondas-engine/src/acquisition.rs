//! Control-voltage acquisition.
//!
//! Raw 12-bit conversions arrive one at a time, strictly alternating
//! between the two control channels. Each channel runs through a one-pole
//! smoothing filter before its value is published; channel 0 additionally
//! feeds a pick-up hysteresis machine that decides when the physical
//! control has been deliberately moved and may start writing into the
//! active parameter slot.

use std::sync::Arc;

use ondas_core::PARAM_SLOTS;
use tracing::debug;

use crate::shared::EngineShared;

/// Smoothing filter shift: the filter settles in a few hundred samples.
const FILTER_SHIFT: u32 = 6;

/// Movement (in control counts) required to unlock a freshly selected slot.
const PICKUP_THRESHOLD: i16 = 200;

/// Pick-up state for the slot-writing control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pickup {
    /// Capture the current value as the reference on the next conversion.
    Reset,
    /// Holding until the control moves far enough from the reference.
    Locked,
    /// Control has been picked up; every value is copied into the slot.
    Tracking,
}

/// The control acquisition state machine.
///
/// Exactly one context owns this and feeds it conversions; slot selection
/// and conversion delivery are serialized by `&mut self`, which stands in
/// for the interrupt masking the equivalent hardware driver needs.
#[derive(Debug)]
pub struct ControlAcquisition {
    shared: Arc<EngineShared>,
    /// One-pole accumulators, one per channel, 2*FILTER_SHIFT fractional bits.
    accumulators: [i32; 2],
    /// Channel the next conversion belongs to.
    channel: usize,
    pickup: Pickup,
    /// Reference captured when the active slot last changed.
    reference: i16,
    /// Parameter slot the tracking control writes into.
    active_slot: usize,
}

impl ControlAcquisition {
    /// Create an acquisition front end over the engine's shared state.
    pub fn new(shared: Arc<EngineShared>) -> Self {
        Self {
            shared,
            accumulators: [0; 2],
            channel: 0,
            pickup: Pickup::Reset,
            reference: 0,
            active_slot: 0,
        }
    }

    /// Feed one completed conversion.
    ///
    /// `raw` is the unfiltered 12-bit result. Conversions alternate
    /// channels 0, 1, 0, 1 in lockstep with the converter's scan order.
    /// The raw value is inverted (XOR 0xFFF) to undo the control wiring
    /// polarity before filtering.
    pub fn on_conversion(&mut self, raw: u16) {
        let idx = self.channel;
        let inverted = i32::from((raw & 0xFFF) ^ 0xFFF);
        let acc = &mut self.accumulators[idx];
        *acc += ((inverted << FILTER_SHIFT) - *acc) >> FILTER_SHIFT;
        let value = (*acc >> FILTER_SHIFT) as i16;
        self.shared.set_channel(idx, value);

        if idx == 0 {
            match self.pickup {
                Pickup::Reset => {
                    self.reference = value;
                    self.pickup = Pickup::Locked;
                }
                Pickup::Locked => {
                    if (value - self.reference).abs() > PICKUP_THRESHOLD {
                        debug!(slot = self.active_slot, "control picked up");
                        self.pickup = Pickup::Tracking;
                    }
                }
                Pickup::Tracking => {
                    self.shared.params().set(self.active_slot, value);
                }
            }
        }

        self.channel ^= 1;
    }

    /// Select which parameter slot the control writes into.
    ///
    /// Out-of-range indices are ignored. Switching slots re-locks the
    /// pick-up machine so the slot keeps its old value until the control
    /// is deliberately moved again.
    pub fn set_active_slot(&mut self, index: usize) {
        if index >= PARAM_SLOTS {
            return;
        }
        if index != self.active_slot {
            self.active_slot = index;
            self.pickup = Pickup::Reset;
        }
    }

    /// Force the pick-up machine straight to tracking.
    ///
    /// Used at startup so the restored slot immediately follows the
    /// control instead of waiting for a movement.
    pub fn force_tracking(&mut self) {
        self.pickup = Pickup::Tracking;
    }

    /// Write a parameter slot directly, bypassing acquisition.
    pub fn set_parameter(&self, index: usize, value: i16) {
        self.shared.params().set(index, value);
    }
}
