use serde::{Deserialize, Serialize};

use crate::error::MfccError;

/// Bit depths the framer can be fed with.
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [8, 16, 32];

/// Layout of the audio handed to the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl AudioFormat {
    pub fn mono(sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Check the format is mono, of a supported depth, and at `expected_rate`.
    pub fn validate(&self, expected_rate: u32) -> Result<(), MfccError> {
        if self.channels != 1 {
            return Err(MfccError::UnsupportedFormat(format!(
                "{} channels; only mono audio is supported",
                self.channels
            )));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bits_per_sample) {
            return Err(MfccError::UnsupportedFormat(format!(
                "{}-bit samples; expected one of {SUPPORTED_BIT_DEPTHS:?}",
                self.bits_per_sample
            )));
        }
        if self.sample_rate != expected_rate {
            return Err(MfccError::invalid(
                "sample_rate",
                format!(
                    "audio is {} Hz but the pipeline is configured for {expected_rate} Hz",
                    self.sample_rate
                ),
            ));
        }
        Ok(())
    }
}
