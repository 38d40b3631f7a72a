//! Per-frame MFCC pipeline: periodogram, Mel filter bank, log, DCT.

use serde::{Deserialize, Serialize};

use super::dct::Dct;
use super::mel::FilterBank;
use super::power::power_spectrum;
use crate::error::{MfccError, ensure_finite};

/// Default floor used by [`LogCompression::FlooredLn`].
pub const DEFAULT_MEL_FLOOR: f32 = 1e-8;

/// Compression applied to Mel band energies before the DCT.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LogCompression {
    /// `ln(1 + m)`; zero energy maps to zero.
    #[default]
    Log1p,
    /// `ln(max(m, floor))`.
    FlooredLn { floor: f32 },
}

impl LogCompression {
    fn validate(&self) -> Result<(), MfccError> {
        match *self {
            Self::Log1p => Ok(()),
            Self::FlooredLn { floor } if floor.is_finite() && floor > 0.0 => Ok(()),
            Self::FlooredLn { floor } => Err(MfccError::invalid(
                "mel_floor",
                format!("{floor} must be a positive finite value"),
            )),
        }
    }

    pub fn apply(&self, energy: f32) -> f32 {
        match *self {
            Self::Log1p => energy.ln_1p(),
            Self::FlooredLn { floor } => energy.max(floor).ln(),
        }
    }
}

/// Every intermediate stage of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfccTrace {
    pub power: Vec<f32>,
    pub mel: Vec<f32>,
    pub log_mel: Vec<f32>,
    /// Zeroth cepstral term (sum of log Mel energies), kept out of `coefficients`.
    pub energy: f32,
    pub coefficients: Vec<f32>,
}

/// FFT magnitudes in, cepstral coefficients out.
///
/// The DCT basis starts at the first harmonic, so the returned coefficients
/// never include the DC "power" term; [`MfccTrace::energy`] carries it.
#[derive(Debug, Clone)]
pub struct Mfcc {
    filter_bank: FilterBank,
    dct: Dct,
    log: LogCompression,
}

impl Mfcc {
    /// Pipeline with twelve unliftered coefficients and `ln(1 + m)` compression.
    pub fn construct(
        fft_bin_count: usize,
        filter_count: usize,
        low_freq_hz: f32,
        high_freq_hz: f32,
        sample_rate: u32,
    ) -> Result<Self, MfccError> {
        let filter_bank = FilterBank::construct(
            fft_bin_count,
            filter_count,
            low_freq_hz,
            high_freq_hz,
            sample_rate,
        )?;
        Ok(Self {
            filter_bank,
            dct: Dct::default(),
            log: LogCompression::default(),
        })
    }

    pub fn from_parts(
        filter_bank: FilterBank,
        dct: Dct,
        log: LogCompression,
    ) -> Result<Self, MfccError> {
        log.validate()?;
        Ok(Self {
            filter_bank,
            dct,
            log,
        })
    }

    pub fn with_dct(mut self, dct: Dct) -> Self {
        self.dct = dct;
        self
    }

    pub fn with_log_compression(mut self, log: LogCompression) -> Result<Self, MfccError> {
        log.validate()?;
        self.log = log;
        Ok(self)
    }

    pub fn filter_bank(&self) -> &FilterBank {
        &self.filter_bank
    }

    pub fn dct(&self) -> &Dct {
        &self.dct
    }

    /// Number of FFT magnitudes each call expects.
    pub fn fft_bin_count(&self) -> usize {
        self.filter_bank.fft_bin_count()
    }

    pub fn compute(&self, amplitudes: &[f32]) -> Result<Vec<f32>, MfccError> {
        self.trace(amplitudes).map(|trace| trace.coefficients)
    }

    pub fn trace(&self, amplitudes: &[f32]) -> Result<MfccTrace, MfccError> {
        if amplitudes.len() != self.fft_bin_count() {
            return Err(MfccError::LengthMismatch {
                what: "FFT magnitudes",
                expected: self.fft_bin_count(),
                actual: amplitudes.len(),
            });
        }
        ensure_finite("FFT magnitudes", amplitudes)?;
        let power = power_spectrum(amplitudes);
        let mel = self.filter_bank.apply(&power)?;
        let log_mel: Vec<f32> = mel.iter().map(|&m| self.log.apply(m)).collect();
        ensure_finite("log Mel energies", &log_mel)?;
        let coefficients = self.dct.run(&log_mel)?;
        let energy: f32 = log_mel.iter().sum();
        Ok(MfccTrace {
            power,
            mel,
            log_mel,
            energy,
            coefficients,
        })
    }
}
