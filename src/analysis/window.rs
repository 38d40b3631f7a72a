use std::f32::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MfccError;

/// Supported tapering windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindowKind {
    /// Hamming window, `0.54 - 0.46 cos(2πi/(N-1))`.
    #[default]
    #[serde(rename = "ham")]
    Hamming,
    /// Cosine-tapered rectangle; `alpha` sets the tapered fraction.
    #[serde(rename = "tukey")]
    Tukey,
    /// Rectangular window (all ones).
    #[serde(rename = "flat")]
    Flat,
}

impl WindowKind {
    /// Short name used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hamming => "ham",
            Self::Tukey => "tukey",
            Self::Flat => "flat",
        }
    }
}

impl FromStr for WindowKind {
    type Err = MfccError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ham" | "hamming" => Ok(Self::Hamming),
            "tukey" => Ok(Self::Tukey),
            "flat" | "rect" => Ok(Self::Flat),
            _ => Err(MfccError::UnknownWindow(value.to_string())),
        }
    }
}

/// Immutable per-sample weights applied to a frame before spectral analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    kind: WindowKind,
    coefficients: Vec<f32>,
}

impl Window {
    /// Build a window of `sample_count` coefficients.
    ///
    /// `alpha` only affects [`WindowKind::Tukey`] and must lie in `[0, 1]`.
    pub fn construct(kind: WindowKind, sample_count: usize, alpha: f32) -> Result<Self, MfccError> {
        if sample_count == 0 {
            return Err(MfccError::invalid("window length", "must be at least 1"));
        }
        let coefficients = match kind {
            WindowKind::Hamming => hamming(sample_count),
            WindowKind::Tukey => {
                if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
                    return Err(MfccError::invalid(
                        "window alpha",
                        format!("{alpha} is outside [0, 1]"),
                    ));
                }
                tukey(sample_count, alpha)
            }
            WindowKind::Flat => vec![1.0_f32; sample_count],
        };
        Ok(Self { kind, coefficients })
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn coefficients(&self) -> &[f32] {
        &self.coefficients
    }

    /// Multiply `frame` elementwise by the window coefficients.
    pub fn apply(&self, frame: &mut [f32]) -> Result<(), MfccError> {
        if frame.len() != self.coefficients.len() {
            return Err(MfccError::LengthMismatch {
                what: "windowed frame",
                expected: self.coefficients.len(),
                actual: frame.len(),
            });
        }
        for (sample, &coef) in frame.iter_mut().zip(&self.coefficients) {
            *sample *= coef;
        }
        Ok(())
    }
}

fn hamming(length: usize) -> Vec<f32> {
    if length == 1 {
        return vec![1.0];
    }
    let denom = (length - 1) as f32;
    (0..length)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f32 / denom).cos())
        .collect()
}

fn tukey(length: usize, alpha: f32) -> Vec<f32> {
    if length == 1 {
        return vec![1.0];
    }
    let span = (length - 1) as f32;
    let taper = alpha * span;
    let right_start = span * (1.0 - alpha / 2.0);
    (0..length)
        .map(|i| {
            let x = i as f32;
            if x < taper / 2.0 {
                0.5 * (1.0 + (PI * (2.0 * x / taper - 1.0)).cos())
            } else if x > right_start {
                0.5 * (1.0 + (PI * (2.0 * x / taper - 2.0 / alpha + 1.0)).cos())
            } else {
                1.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_matches_requested_length() {
        for kind in [WindowKind::Hamming, WindowKind::Tukey, WindowKind::Flat] {
            for len in [1, 2, 7, 64] {
                let w = Window::construct(kind, len, 0.5).unwrap();
                assert_eq!(w.len(), len, "{kind:?} with {len} samples");
            }
        }
    }

    #[test]
    fn hamming_stays_within_bounds_and_touches_floor_at_edges() {
        let w = Window::construct(WindowKind::Hamming, 64, 0.0).unwrap();
        for &c in w.coefficients() {
            assert!(c >= 0.08 - 1e-6 && c <= 1.0 + 1e-6, "coefficient {c}");
        }
        assert!((w.coefficients()[0] - 0.08).abs() < 1e-6);
        assert!((w.coefficients()[63] - 0.08).abs() < 1e-5);
    }

    #[test]
    fn tukey_tapers_edges_and_keeps_flat_middle() {
        let w = Window::construct(WindowKind::Tukey, 9, 0.5).unwrap();
        let c = w.coefficients();
        assert!(c[0].abs() < 1e-6);
        assert!((c[1] - 0.5).abs() < 1e-6);
        for &mid in &c[2..=6] {
            assert_eq!(mid, 1.0);
        }
        assert!((c[7] - 0.5).abs() < 1e-5);
        assert!(c[8].abs() < 1e-5);
    }

    #[test]
    fn tukey_with_zero_alpha_is_rectangular() {
        let w = Window::construct(WindowKind::Tukey, 16, 0.0).unwrap();
        assert!(w.coefficients().iter().all(|&c| c == 1.0));
    }

    #[test]
    fn tukey_rejects_alpha_outside_unit_range() {
        assert!(Window::construct(WindowKind::Tukey, 16, 1.5).is_err());
        assert!(Window::construct(WindowKind::Tukey, 16, f32::NAN).is_err());
    }

    #[test]
    fn unknown_window_name_is_reported() {
        let err = "blackman".parse::<WindowKind>().unwrap_err();
        assert_eq!(err, MfccError::UnknownWindow("blackman".into()));
        assert_eq!("ham".parse::<WindowKind>().unwrap(), WindowKind::Hamming);
    }

    #[test]
    fn apply_rejects_mismatched_frame() {
        let w = Window::construct(WindowKind::Flat, 4, 0.0).unwrap();
        let mut frame = vec![1.0; 3];
        assert!(w.apply(&mut frame).is_err());
    }
}
