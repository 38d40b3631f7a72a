//! Seam to the FFT: frames in, one-sided magnitudes out.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::MfccError;

/// Converts a time-domain frame into `frame.len() / 2` magnitude bins.
///
/// Implementations backed by a fallible transform report failures as
/// [`MfccError::Spectrum`].
pub trait SpectrumProvider: Sync {
    fn amplitudes(&self, frame: &[f32]) -> Result<Vec<f32>, MfccError>;
}

impl<F> SpectrumProvider for F
where
    F: Fn(&[f32]) -> Vec<f32> + Sync,
{
    fn amplitudes(&self, frame: &[f32]) -> Result<Vec<f32>, MfccError> {
        Ok(self(frame))
    }
}

/// Forward FFT planned once for a fixed frame size.
pub struct RustFftSpectrum {
    fft: Arc<dyn Fft<f32>>,
}

impl RustFftSpectrum {
    pub fn new(frame_size: usize) -> Result<Self, MfccError> {
        if frame_size < 2 {
            return Err(MfccError::invalid(
                "frame_size",
                format!("{frame_size} is too short for a one-sided spectrum"),
            ));
        }
        let fft = FftPlanner::<f32>::new().plan_fft_forward(frame_size);
        Ok(Self { fft })
    }

    pub fn frame_size(&self) -> usize {
        self.fft.len()
    }
}

impl SpectrumProvider for RustFftSpectrum {
    fn amplitudes(&self, frame: &[f32]) -> Result<Vec<f32>, MfccError> {
        if frame.len() != self.fft.len() {
            return Err(MfccError::LengthMismatch {
                what: "FFT frame",
                expected: self.fft.len(),
                actual: frame.len(),
            });
        }
        let mut buffer: Vec<Complex<f32>> = frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
        self.fft.process(&mut buffer);
        Ok(buffer[..frame.len() / 2].iter().map(|c| c.norm()).collect())
    }
}

impl std::fmt::Debug for RustFftSpectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustFftSpectrum")
            .field("frame_size", &self.fft.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_frame_lands_in_dc_bin() {
        let provider = RustFftSpectrum::new(8).unwrap();
        let out = provider.amplitudes(&[1.0; 8]).unwrap();
        assert_eq!(out.len(), 4);
        assert!((out[0] - 8.0).abs() < 1e-4);
        for &bin in &out[1..] {
            assert!(bin.abs() < 1e-4);
        }
    }

    #[test]
    fn sine_peaks_at_its_bin() {
        let n = 64;
        let provider = RustFftSpectrum::new(n).unwrap();
        let frame: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 5.0 * i as f32 / n as f32).sin())
            .collect();
        let out = provider.amplitudes(&frame).unwrap();
        let peak = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(bin, _)| bin);
        assert_eq!(peak, Some(5));
    }

    #[test]
    fn closures_act_as_providers() {
        let provider = |frame: &[f32]| vec![1.0; frame.len() / 2];
        assert_eq!(provider.amplitudes(&[0.0; 6]).unwrap(), vec![1.0; 3]);
    }

    struct Unavailable;

    impl SpectrumProvider for Unavailable {
        fn amplitudes(&self, _frame: &[f32]) -> Result<Vec<f32>, MfccError> {
            Err(MfccError::Spectrum("device lost".into()))
        }
    }

    #[test]
    fn provider_failures_reach_the_extractor() {
        use crate::analysis::{AudioFormat, MfccExtractor};
        use crate::config::MfccConfig;

        let extractor = MfccExtractor::new(&MfccConfig::default(), Unavailable).unwrap();
        let err = extractor
            .extract(&AudioFormat::mono(8_000, 32), &[0.0_f32; 64])
            .unwrap_err();
        assert_eq!(err, MfccError::Spectrum("device lost".into()));
        assert_eq!(err.to_string(), "Spectrum provider failed: device lost");
    }

    #[test]
    fn rejects_wrong_frame_size() {
        let provider = RustFftSpectrum::new(16).unwrap();
        assert!(provider.amplitudes(&[0.0; 8]).is_err());
        assert!(RustFftSpectrum::new(1).is_err());
    }
}
