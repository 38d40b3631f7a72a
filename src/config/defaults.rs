use crate::analysis::dct::DEFAULT_NUM_COEFFICIENTS;
use crate::analysis::pipeline::DEFAULT_MEL_FLOOR;

pub(super) fn default_sample_rate() -> u32 {
    8_000
}

pub(super) fn default_frame_size() -> usize {
    64
}

pub(super) fn default_frame_step() -> usize {
    64
}

pub(super) fn default_window_alpha() -> f32 {
    0.5
}

pub(super) fn default_filter_count() -> usize {
    26
}

pub(super) fn default_low_freq_hz() -> f32 {
    300.0
}

pub(super) fn default_high_freq_hz() -> f32 {
    3_500.0
}

pub(super) fn default_num_coefficients() -> usize {
    DEFAULT_NUM_COEFFICIENTS
}

pub(super) fn default_cepstral_lifter() -> f32 {
    22.0
}

pub(super) fn default_mel_floor() -> f32 {
    DEFAULT_MEL_FLOOR
}
