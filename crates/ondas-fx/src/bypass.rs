//! Bypass placeholder algorithm.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use ondas_core::{PARAM_SLOTS, ParameterTable};

/// Placeholder algorithm occupying slot 0.
///
/// Outputs silence rather than passing the source through: the hardware
/// ships with the passthrough disabled, and that behavior is kept on
/// purpose so an idle unit is guaranteed quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bypass;

impl Bypass {
    /// Fill `dst` with silence.
    pub fn process(&mut self, dst: &mut [i16], _src: &[i16], _params: &ParameterTable) {
        dst.fill(0);
    }

    /// Render a parameter slot as a raw percentage.
    ///
    /// Slot 0 (the algorithm-select control) renders nothing.
    pub fn render_parameter(&self, index: usize, params: &ParameterTable) -> Option<String> {
        if index == 0 || index >= PARAM_SLOTS {
            return None;
        }
        Some(format!("{}%", params.get(index) / 41))
    }
}
