use serde::{Deserialize, Serialize};

use super::window::Window;
use crate::error::MfccError;

/// Frame geometry: how many samples per frame, how far apart frames start,
/// and where in the buffer the first frame begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLayout {
    pub frame_size: usize,
    pub frame_step: usize,
    pub offset: usize,
}

impl FrameLayout {
    pub fn new(frame_size: usize, frame_step: usize) -> Result<Self, MfccError> {
        if frame_size == 0 {
            return Err(MfccError::invalid("frame_size", "must be at least 1"));
        }
        if frame_step == 0 {
            return Err(MfccError::invalid("frame_step", "must be at least 1"));
        }
        Ok(Self {
            frame_size,
            frame_step,
            offset: 0,
        })
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Number of complete frames a buffer of `buffer_len` samples yields.
    pub fn frame_count(&self, buffer_len: usize) -> usize {
        let available = buffer_len.saturating_sub(self.offset);
        if available < self.frame_size {
            return 0;
        }
        (available - self.frame_size) / self.frame_step + 1
    }
}

/// One windowed slice of the input, tagged with its sequential index.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: usize,
    pub samples: Vec<f32>,
}

/// Lazy, finite iterator over overlapping frames of a sample buffer.
///
/// Each raw sample passes through `map` before it lands in a frame; a
/// trailing partial frame is never produced.
#[derive(Clone)]
pub struct Framer<'a, S, M> {
    buffer: &'a [S],
    layout: FrameLayout,
    map: M,
    window: Option<&'a Window>,
    cursor: usize,
    index: usize,
}

impl<'a, S> Framer<'a, S, fn(S) -> f32>
where
    S: Copy + Into<f32>,
{
    /// Frame `buffer` converting each sample with `Into<f32>`.
    pub fn new(buffer: &'a [S], layout: FrameLayout) -> Self {
        Self {
            buffer,
            layout,
            map: <S as Into<f32>>::into as fn(S) -> f32,
            window: None,
            cursor: layout.offset,
            index: 0,
        }
    }
}

impl<'a, S, M> Framer<'a, S, M>
where
    S: Copy,
    M: Fn(S) -> f32,
{
    /// Frame `buffer`, remapping every raw sample through `map`.
    pub fn with_map(buffer: &'a [S], layout: FrameLayout, map: M) -> Self {
        Self {
            buffer,
            layout,
            map,
            window: None,
            cursor: layout.offset,
            index: 0,
        }
    }

    /// Scale every emitted frame by `window`.
    pub fn windowed(mut self, window: &'a Window) -> Result<Self, MfccError> {
        if window.len() != self.layout.frame_size {
            return Err(MfccError::LengthMismatch {
                what: "window",
                expected: self.layout.frame_size,
                actual: window.len(),
            });
        }
        self.window = Some(window);
        Ok(self)
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Rewind to the first frame.
    pub fn restart(&mut self) {
        self.cursor = self.layout.offset;
        self.index = 0;
    }

    fn remaining(&self) -> usize {
        self.layout
            .frame_count(self.buffer.len())
            .saturating_sub(self.index)
    }
}

impl<S, M> Iterator for Framer<'_, S, M>
where
    S: Copy,
    M: Fn(S) -> f32,
{
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let start = self.cursor;
        let end = start.checked_add(self.layout.frame_size)?;
        let raw = self.buffer.get(start..end)?;
        let mut samples: Vec<f32> = raw.iter().map(|&s| (self.map)(s)).collect();
        if let Some(window) = self.window {
            for (sample, &coef) in samples.iter_mut().zip(window.coefficients()) {
                *sample *= coef;
            }
        }
        let frame = Frame {
            index: self.index,
            samples,
        };
        self.cursor = start.saturating_add(self.layout.frame_step);
        self.index += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<S, M> ExactSizeIterator for Framer<'_, S, M>
where
    S: Copy,
    M: Fn(S) -> f32,
{
}
