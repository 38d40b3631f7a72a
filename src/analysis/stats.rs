//! Aggregates over per-frame outputs.

use serde::{Deserialize, Serialize};

use super::extract::FrameCoefficients;

/// Mean and standard deviation for an aggregated metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub mean: f32,
    pub std: f32,
}

/// Mean amplitude observed in one FFT bin across frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BinStats {
    pub frequency_hz: f32,
    pub amplitude: Stats,
}

/// Per-coefficient statistics across frames, in coefficient order.
pub fn coefficient_stats(frames: &[FrameCoefficients]) -> Vec<Stats> {
    let columns: Vec<&[f32]> = frames.iter().map(|f| f.coefficients.as_slice()).collect();
    column_stats(&columns)
}

/// Per-bin amplitude statistics across spectra of `frame_size`-sample frames.
pub fn bin_stats(spectra: &[Vec<f32>], sample_rate: u32, frame_size: usize) -> Vec<BinStats> {
    let rows: Vec<&[f32]> = spectra.iter().map(Vec::as_slice).collect();
    let bin_hz = sample_rate as f32 / frame_size.max(1) as f32;
    column_stats(&rows)
        .into_iter()
        .enumerate()
        .map(|(bin, amplitude)| BinStats {
            frequency_hz: bin as f32 * bin_hz,
            amplitude,
        })
        .collect()
}

pub fn stats_f32(values: &[f32]) -> Stats {
    if values.is_empty() {
        return Stats { mean: 0.0, std: 0.0 };
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Stats {
        mean: mean as f32,
        std: var.sqrt() as f32,
    }
}

fn column_stats(rows: &[&[f32]]) -> Vec<Stats> {
    let width = rows.iter().map(|r| r.len()).min().unwrap_or(0);
    (0..width)
        .map(|col| {
            let column: Vec<f32> = rows.iter().map(|r| r[col]).collect();
            stats_f32(&column)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, coefficients: &[f32]) -> FrameCoefficients {
        FrameCoefficients {
            index,
            coefficients: coefficients.to_vec(),
        }
    }

    #[test]
    fn coefficient_stats_are_computed_per_column() {
        let frames = [frame(0, &[1.0, 10.0]), frame(1, &[3.0, 10.0])];
        let stats = coefficient_stats(&frames);
        assert_eq!(stats.len(), 2);
        assert!((stats[0].mean - 2.0).abs() < 1e-6);
        assert!((stats[0].std - 1.0).abs() < 1e-6);
        assert_eq!(stats[1], Stats { mean: 10.0, std: 0.0 });
    }

    #[test]
    fn bin_stats_pair_means_with_frequencies() {
        let spectra = vec![vec![0.0, 2.0, 4.0], vec![2.0, 2.0, 0.0]];
        let stats = bin_stats(&spectra, 8_000, 6);
        let freqs: Vec<f32> = stats.iter().map(|s| s.frequency_hz).collect();
        assert!((freqs[1] - 8_000.0 / 6.0).abs() < 1e-3);
        assert_eq!(freqs[0], 0.0);
        assert!((stats[0].amplitude.mean - 1.0).abs() < 1e-6);
        assert!((stats[2].amplitude.mean - 2.0).abs() < 1e-6);
    }

    #[test]
    fn empty_input_yields_no_stats() {
        assert!(coefficient_stats(&[]).is_empty());
        assert_eq!(stats_f32(&[]), Stats { mean: 0.0, std: 0.0 });
    }
}
