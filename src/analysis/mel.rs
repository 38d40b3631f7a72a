//! Mel-scale triangular filter bank.

use ndarray::{Array2, ArrayView1, aview1};
use tracing::{debug, warn};

use crate::error::{MfccError, ensure_finite};

const MEL_SCALE: f64 = 1127.0;
const MEL_BREAK_HZ: f64 = 700.0;

pub fn hz_to_mels(hz: f64) -> f64 {
    MEL_SCALE * (1.0 + hz / MEL_BREAK_HZ).ln()
}

pub fn mels_to_hz(mels: f64) -> f64 {
    MEL_BREAK_HZ * ((mels / MEL_SCALE).exp() - 1.0)
}

/// A set of triangular filters spaced evenly on the Mel scale.
///
/// Filter `i` peaks at `center_bins()[i]` with weight 1.0 and falls off
/// linearly over `filter_ranges()[i]` bins on either side. The half-width is
/// the distance to the next center (the previous one for the last filter)
/// and never less than one bin.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    weights: Array2<f32>,
    center_bins: Vec<usize>,
    filter_ranges: Vec<usize>,
}

impl FilterBank {
    pub fn construct(
        fft_bin_count: usize,
        filter_count: usize,
        low_freq_hz: f32,
        high_freq_hz: f32,
        sample_rate: u32,
    ) -> Result<Self, MfccError> {
        validate(fft_bin_count, filter_count, low_freq_hz, high_freq_hz, sample_rate)?;
        let nyquist = sample_rate as f64 / 2.0;
        let to_bin = |hz: f64| ((fft_bin_count + 1) as f64 * hz / nyquist).floor() as usize;

        let low_mel = hz_to_mels(low_freq_hz as f64);
        let high_mel = hz_to_mels(high_freq_hz as f64);
        let delta = (high_mel - low_mel) / (filter_count + 1) as f64;
        let center_bins: Vec<usize> = (1..=filter_count)
            .map(|i| to_bin(mels_to_hz(low_mel + i as f64 * delta)))
            .collect();
        if let Some((filter, &bin)) = center_bins
            .iter()
            .enumerate()
            .find(|&(_, &bin)| bin >= fft_bin_count)
        {
            return Err(MfccError::FilterOutOfRange {
                filter,
                bin,
                fft_bin_count,
            });
        }

        let high_edge = to_bin(high_freq_hz as f64);
        let filter_ranges = filter_ranges(&center_bins, high_edge);
        let collapsed = center_bins.windows(2).filter(|w| w[0] == w[1]).count();
        if collapsed > 0 {
            warn!(
                "{collapsed} Mel filter centers share an FFT bin; \
                 {filter_count} filters over {fft_bin_count} bins is finer than the spectrum"
            );
        }
        debug!(?center_bins, ?filter_ranges, "Constructed Mel filter bank");

        let mut weights = Array2::<f32>::zeros((filter_count, fft_bin_count));
        for (i, mut row) in weights.rows_mut().into_iter().enumerate() {
            let center = center_bins[i];
            let range = filter_ranges[i];
            for (bin, weight) in row.iter_mut().enumerate() {
                *weight = cone_weight(bin, center, range);
            }
        }

        Ok(Self {
            weights,
            center_bins,
            filter_ranges,
        })
    }

    /// Estimated power in each Mel band for a periodogram of `fft_bin_count` bins.
    pub fn apply(&self, freq_powers: &[f32]) -> Result<Vec<f32>, MfccError> {
        if freq_powers.len() != self.fft_bin_count() {
            return Err(MfccError::LengthMismatch {
                what: "power spectrum",
                expected: self.fft_bin_count(),
                actual: freq_powers.len(),
            });
        }
        ensure_finite("power spectrum", freq_powers)?;
        Ok(self.weights.dot(&aview1(freq_powers)).to_vec())
    }

    pub fn len(&self) -> usize {
        self.weights.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.nrows() == 0
    }

    pub fn fft_bin_count(&self) -> usize {
        self.weights.ncols()
    }

    pub fn filter(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.len()).then(|| self.weights.row(index))
    }

    pub fn center_bins(&self) -> &[usize] {
        &self.center_bins
    }

    pub fn filter_ranges(&self) -> &[usize] {
        &self.filter_ranges
    }
}

fn validate(
    fft_bin_count: usize,
    filter_count: usize,
    low_freq_hz: f32,
    high_freq_hz: f32,
    sample_rate: u32,
) -> Result<(), MfccError> {
    if fft_bin_count == 0 {
        return Err(MfccError::invalid("fft_bin_count", "must be at least 1"));
    }
    if filter_count == 0 {
        return Err(MfccError::invalid("filter_count", "must be at least 1"));
    }
    if sample_rate == 0 {
        return Err(MfccError::invalid("sample_rate", "must be positive"));
    }
    let nyquist = sample_rate as f32 / 2.0;
    if !low_freq_hz.is_finite() || low_freq_hz < 0.0 {
        return Err(MfccError::invalid(
            "low_freq_hz",
            format!("{low_freq_hz} must be a non-negative frequency"),
        ));
    }
    if !high_freq_hz.is_finite() || high_freq_hz > nyquist {
        return Err(MfccError::invalid(
            "high_freq_hz",
            format!("{high_freq_hz} exceeds the Nyquist frequency {nyquist}"),
        ));
    }
    if low_freq_hz >= high_freq_hz {
        return Err(MfccError::invalid(
            "low_freq_hz",
            format!("{low_freq_hz} must be below high_freq_hz {high_freq_hz}"),
        ));
    }
    Ok(())
}

fn filter_ranges(center_bins: &[usize], high_edge: usize) -> Vec<usize> {
    let last = center_bins.len() - 1;
    center_bins
        .iter()
        .enumerate()
        .map(|(i, &center)| {
            let distance = if i < last {
                center_bins[i + 1] - center
            } else if i > 0 {
                center - center_bins[i - 1]
            } else {
                high_edge.saturating_sub(center)
            };
            distance.max(1)
        })
        .collect()
}

fn cone_weight(bin: usize, center: usize, range: usize) -> f32 {
    let distance = bin.abs_diff(center);
    if distance > range {
        0.0
    } else {
        1.0 - distance as f32 / range as f32
    }
}
