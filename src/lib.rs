//! Mel-frequency cepstral coefficients from raw audio frames.
/// Framing, spectral and cepstral stages.
pub mod analysis;
/// TOML-backed pipeline settings.
pub mod config;
/// Error taxonomy shared by every stage.
pub mod error;
/// Tracing subscriber setup.
pub mod logging;

pub use config::MfccConfig;
pub use error::MfccError;
