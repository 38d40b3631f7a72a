/// Periodogram estimate: each amplitude squared, divided by the bin count.
pub fn power_spectrum(amplitudes: &[f32]) -> Vec<f32> {
    let n = amplitudes.len() as f32;
    amplitudes.iter().map(|&a| a * a / n).collect()
}
