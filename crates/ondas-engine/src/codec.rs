//! Codec control-port abstraction.

use tracing::info;

use crate::error::EngineError;

/// Control port of the audio codec.
///
/// Only the knobs the engine needs: the output soft mute and the analog
/// volumes. Writes go over a shared control bus and can fail; the engine
/// surfaces that as [`EngineError::Codec`] without retrying.
pub trait CodecControl {
    /// Engage or release the codec's output mute.
    fn set_mute(&mut self, enable: bool) -> Result<(), EngineError>;

    /// Set the headphone and line output volumes.
    fn set_volumes(&mut self, headphone: u8, line: u8) -> Result<(), EngineError>;
}

/// Bring the codec into its running state: volumes set, mute released.
///
/// Called once at startup, after the engine is constructed (and therefore
/// already soft-muted on its own ramp).
pub fn bring_up(
    codec: &mut dyn CodecControl,
    headphone: u8,
    line: u8,
) -> Result<(), EngineError> {
    codec.set_volumes(headphone, line)?;
    codec.set_mute(false)?;
    info!(headphone, line, "codec running");
    Ok(())
}

/// Recording [`CodecControl`] double for tests.
#[derive(Debug, Default)]
pub struct MockCodec {
    /// Sequence of mute writes, in order.
    pub mute_calls: Vec<bool>,
    /// Last volumes written.
    pub volumes: Option<(u8, u8)>,
    /// When set, every call fails.
    pub fail: bool,
}

impl MockCodec {
    /// Create a codec double that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), EngineError> {
        if self.fail {
            Err(EngineError::Codec("simulated bus failure".into()))
        } else {
            Ok(())
        }
    }
}

impl CodecControl for MockCodec {
    fn set_mute(&mut self, enable: bool) -> Result<(), EngineError> {
        self.check()?;
        self.mute_calls.push(enable);
        Ok(())
    }

    fn set_volumes(&mut self, headphone: u8, line: u8) -> Result<(), EngineError> {
        self.check()?;
        self.volumes = Some((headphone, line));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bring_up_sets_volumes_then_unmutes() {
        let mut codec = MockCodec::new();
        bring_up(&mut codec, 121, 23).unwrap();
        assert_eq!(codec.volumes, Some((121, 23)));
        assert_eq!(codec.mute_calls, vec![false]);
    }

    #[test]
    fn bring_up_propagates_bus_failure() {
        let mut codec = MockCodec::new();
        codec.fail = true;
        assert!(bring_up(&mut codec, 0, 0).is_err());
        assert!(codec.mute_calls.is_empty());
    }
}
