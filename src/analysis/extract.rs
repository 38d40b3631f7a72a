//! Whole-buffer extraction: framing, windowing, FFT and the MFCC pipeline.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::format::AudioFormat;
use super::framer::{Frame, FrameLayout, Framer};
use super::lookup::LookupTable;
use super::pipeline::Mfcc;
use super::spectrum::SpectrumProvider;
use super::window::Window;
use crate::config::MfccConfig;
use crate::error::MfccError;

/// Cepstral coefficients for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCoefficients {
    pub index: usize,
    pub coefficients: Vec<f32>,
}

pub struct MfccExtractor<P> {
    sample_rate: u32,
    layout: FrameLayout,
    window: Window,
    pipeline: Mfcc,
    provider: P,
}

impl<P: SpectrumProvider> MfccExtractor<P> {
    pub fn new(config: &MfccConfig, provider: P) -> Result<Self, MfccError> {
        Ok(Self {
            sample_rate: config.sample_rate,
            layout: config.layout()?,
            window: config.window()?,
            pipeline: config.pipeline()?,
            provider,
        })
    }

    pub fn pipeline(&self) -> &Mfcc {
        &self.pipeline
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Windowed frames of `buffer`, converting samples with `Into<f32>`.
    pub fn frames<'a, S>(&'a self, buffer: &'a [S]) -> Result<Framer<'a, S, fn(S) -> f32>, MfccError>
    where
        S: Copy + Into<f32>,
    {
        Framer::new(buffer, self.layout).windowed(&self.window)
    }

    /// One-sided magnitudes for a single frame.
    pub fn amplitudes(&self, frame: &Frame) -> Result<Vec<f32>, MfccError> {
        let amplitudes = self.provider.amplitudes(&frame.samples)?;
        if amplitudes.len() != self.pipeline.fft_bin_count() {
            return Err(MfccError::LengthMismatch {
                what: "spectrum provider output",
                expected: self.pipeline.fft_bin_count(),
                actual: amplitudes.len(),
            });
        }
        Ok(amplitudes)
    }

    /// Magnitude spectra for every complete frame of `buffer`.
    pub fn spectra<S>(&self, buffer: &[S]) -> Result<Vec<Vec<f32>>, MfccError>
    where
        S: Copy + Into<f32>,
    {
        self.frames(buffer)?
            .map(|frame| self.amplitudes(&frame))
            .collect()
    }

    pub fn process_frame(&self, frame: &Frame) -> Result<FrameCoefficients, MfccError> {
        let amplitudes = self.amplitudes(frame)?;
        Ok(FrameCoefficients {
            index: frame.index,
            coefficients: self.pipeline.compute(&amplitudes)?,
        })
    }

    pub fn run<I>(&self, frames: I) -> Result<Vec<FrameCoefficients>, MfccError>
    where
        I: IntoIterator<Item = Frame>,
    {
        frames
            .into_iter()
            .map(|frame| self.process_frame(&frame))
            .collect()
    }

    pub fn extract<S>(
        &self,
        format: &AudioFormat,
        buffer: &[S],
    ) -> Result<Vec<FrameCoefficients>, MfccError>
    where
        S: Copy + Into<f32>,
    {
        format.validate(self.sample_rate)?;
        let out = self.run(self.frames(buffer)?)?;
        info!(frames = out.len(), samples = buffer.len(), "Extracted MFCC frames");
        Ok(out)
    }

    /// Extract from 8-bit companded audio, decoding each byte through `table`.
    pub fn extract_ulaw(
        &self,
        format: &AudioFormat,
        bytes: &[u8],
        table: &LookupTable,
    ) -> Result<Vec<FrameCoefficients>, MfccError> {
        format.validate(self.sample_rate)?;
        if format.bits_per_sample != 8 {
            return Err(MfccError::UnsupportedFormat(format!(
                "{}-bit samples cannot be table-decoded; expected 8-bit",
                format.bits_per_sample
            )));
        }
        let frames = Framer::with_map(bytes, self.layout, |b: u8| table.decode(b))
            .windowed(&self.window)?;
        let out = self.run(frames)?;
        info!(
            frames = out.len(),
            samples = bytes.len(),
            "Extracted MFCC frames from table-decoded audio"
        );
        Ok(out)
    }

    /// Like [`extract`](Self::extract), but spreads frames over `workers` threads.
    ///
    /// All workers share the pipeline's cosine cache; results keep frame order.
    pub fn extract_parallel<S>(
        &self,
        format: &AudioFormat,
        buffer: &[S],
        workers: usize,
    ) -> Result<Vec<FrameCoefficients>, MfccError>
    where
        S: Copy + Into<f32>,
    {
        if workers == 0 {
            return Err(MfccError::invalid("workers", "must be at least 1"));
        }
        format.validate(self.sample_rate)?;
        let frames: Vec<Frame> = self.frames(buffer)?.collect();
        if frames.is_empty() {
            return Ok(Vec::new());
        }
        let chunk_len = frames.len().div_ceil(workers);
        let chunks: Vec<Result<Vec<FrameCoefficients>, MfccError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = frames
                .chunks(chunk_len)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|frame| self.process_frame(frame))
                            .collect::<Result<Vec<_>, _>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        });
        let mut out = Vec::with_capacity(frames.len());
        for chunk in chunks {
            out.extend(chunk?);
        }
        info!(
            frames = out.len(),
            workers = workers.min(frames.len()),
            "Extracted MFCC frames in parallel"
        );
        Ok(out)
    }
}
