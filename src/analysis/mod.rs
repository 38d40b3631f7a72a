//! MFCC feature extraction, leaves first: windows, framing, periodogram,
//! Mel filter bank, DCT, then the pipeline and whole-buffer extractor.

pub mod dct;
pub mod extract;
pub mod format;
pub mod framer;
pub mod lookup;
pub mod mel;
pub mod pipeline;
pub mod power;
pub mod spectrum;
pub mod stats;
pub mod window;

pub use dct::{CosineCache, CosineTable, Dct, Lifter};
pub use extract::{FrameCoefficients, MfccExtractor};
pub use format::AudioFormat;
pub use framer::{Frame, FrameLayout, Framer};
pub use lookup::LookupTable;
pub use mel::{FilterBank, hz_to_mels, mels_to_hz};
pub use pipeline::{LogCompression, Mfcc, MfccTrace};
pub use power::power_spectrum;
pub use spectrum::{RustFftSpectrum, SpectrumProvider};
pub use window::{Window, WindowKind};
