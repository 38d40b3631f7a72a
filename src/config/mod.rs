//! Pipeline configuration persisted as TOML.

mod defaults;
mod io;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::analysis::dct::{CosineCache, Dct, Lifter};
use crate::analysis::framer::FrameLayout;
use crate::analysis::mel::FilterBank;
use crate::analysis::pipeline::{LogCompression, Mfcc};
use crate::analysis::window::{Window, WindowKind};
use crate::error::MfccError;
use defaults::*;

pub use io::{ConfigError, load_from_path, save_to_path};

/// Which cepstral lifter to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifterKind {
    #[default]
    None,
    Linear,
    Sinusoidal,
}

/// Which compression to apply to Mel energies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    #[default]
    Log1p,
    FlooredLn,
}

/// Every knob of the MFCC front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfccConfig {
    /// Sample rate the audio must arrive at.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Samples per frame; the spectrum has half as many bins.
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// Samples between frame starts.
    #[serde(default = "default_frame_step")]
    pub frame_step: usize,
    /// Samples skipped before the first frame.
    #[serde(default)]
    pub frame_offset: usize,
    #[serde(default)]
    pub window: WindowKind,
    /// Tukey taper fraction, ignored by other windows.
    #[serde(default = "default_window_alpha")]
    pub window_alpha: f32,
    #[serde(default = "default_filter_count")]
    pub filter_count: usize,
    #[serde(default = "default_low_freq_hz")]
    pub low_freq_hz: f32,
    #[serde(default = "default_high_freq_hz")]
    pub high_freq_hz: f32,
    #[serde(default = "default_num_coefficients")]
    pub num_coefficients: usize,
    #[serde(default)]
    pub lifter: LifterKind,
    /// Period of the sinusoidal lifter.
    #[serde(default = "default_cepstral_lifter")]
    pub cepstral_lifter: f32,
    #[serde(default)]
    pub log_compression: LogKind,
    /// Floor for `floored_ln` compression.
    #[serde(default = "default_mel_floor")]
    pub mel_floor: f32,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            frame_size: default_frame_size(),
            frame_step: default_frame_step(),
            frame_offset: 0,
            window: WindowKind::default(),
            window_alpha: default_window_alpha(),
            filter_count: default_filter_count(),
            low_freq_hz: default_low_freq_hz(),
            high_freq_hz: default_high_freq_hz(),
            num_coefficients: default_num_coefficients(),
            lifter: LifterKind::default(),
            cepstral_lifter: default_cepstral_lifter(),
            log_compression: LogKind::default(),
            mel_floor: default_mel_floor(),
        }
    }
}

impl MfccConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build every stage once to surface the first invalid parameter.
    pub fn validate(&self) -> Result<(), MfccError> {
        self.layout()?;
        self.window()?;
        self.pipeline()?;
        Ok(())
    }

    /// Number of one-sided spectrum bins a frame produces.
    pub fn fft_bin_count(&self) -> usize {
        self.frame_size / 2
    }

    pub fn layout(&self) -> Result<FrameLayout, MfccError> {
        Ok(FrameLayout::new(self.frame_size, self.frame_step)?.with_offset(self.frame_offset))
    }

    pub fn window(&self) -> Result<Window, MfccError> {
        Window::construct(self.window, self.frame_size, self.window_alpha)
    }

    pub fn lifter(&self) -> Result<Option<Lifter>, MfccError> {
        match self.lifter {
            LifterKind::None => Ok(None),
            LifterKind::Linear => Ok(Some(Lifter::Linear)),
            LifterKind::Sinusoidal => {
                if !self.cepstral_lifter.is_finite() || self.cepstral_lifter <= 0.0 {
                    return Err(MfccError::invalid(
                        "cepstral_lifter",
                        format!("{} must be positive", self.cepstral_lifter),
                    ));
                }
                Ok(Some(Lifter::Sinusoidal {
                    cep_lifter: self.cepstral_lifter,
                }))
            }
        }
    }

    pub fn log_compression(&self) -> LogCompression {
        match self.log_compression {
            LogKind::Log1p => LogCompression::Log1p,
            LogKind::FlooredLn => LogCompression::FlooredLn {
                floor: self.mel_floor,
            },
        }
    }

    pub fn pipeline(&self) -> Result<Mfcc, MfccError> {
        let filter_bank = FilterBank::construct(
            self.fft_bin_count(),
            self.filter_count,
            self.low_freq_hz,
            self.high_freq_hz,
            self.sample_rate,
        )?;
        let cache = CosineCache::new(self.num_coefficients)?;
        let dct = Dct::with_cache(std::sync::Arc::new(cache), self.lifter()?)?;
        Mfcc::from_parts(filter_bank, dct, self.log_compression())
    }
}
