use thiserror::Error;

/// Errors raised while constructing or running the MFCC pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MfccError {
    /// A construction parameter is outside its valid range.
    #[error("Invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter that failed validation.
        name: &'static str,
        /// Human-readable constraint that was violated.
        reason: String,
    },
    /// Window type string did not name a supported window.
    #[error("Unknown window type {0:?} (expected ham, tukey or flat)")]
    UnknownWindow(String),
    /// A buffer handed to a stage had the wrong length.
    #[error("{what} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Which buffer was measured.
        what: &'static str,
        /// Length the stage was configured for.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// NaN or infinity reached a stage boundary.
    #[error("Non-finite value in {stage} at index {index}")]
    NonFinite {
        /// Stage that observed the value.
        stage: &'static str,
        /// Position of the first offending value.
        index: usize,
    },
    /// A Mel filter center landed outside the available FFT bins.
    #[error("Filter {filter} centers on bin {bin}, beyond the {fft_bin_count} available bins")]
    FilterOutOfRange {
        /// Filter index.
        filter: usize,
        /// Computed center bin.
        bin: usize,
        /// Number of bins the bank spans.
        fft_bin_count: usize,
    },
    /// Audio layout the pipeline cannot consume.
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),
    /// The spectrum provider failed to transform a frame. Reserved for
    /// [`SpectrumProvider`](crate::analysis::SpectrumProvider) implementations.
    #[error("Spectrum provider failed: {0}")]
    Spectrum(String),
}

impl MfccError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Return the first non-finite entry in `values` as an error.
pub(crate) fn ensure_finite(stage: &'static str, values: &[f32]) -> Result<(), MfccError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(MfccError::NonFinite { stage, index }),
        None => Ok(()),
    }
}
