// THEORY:
// The `Frame` module is the foundation of the data model. A `Frame` is a
// "dumb" data container: an owned, immutable RGB pixel buffer that knows
// its own shape and nothing else. All analysis lives in the modules above
// it; a frame only guards the invariants every one of them relies on:
// the buffer length always matches `width * height * 3`, and any two
// frames fed to a comparison share a shape.

use crate::error::{MonitorError, Result};

/// Number of color channels in every captured frame.
pub const CHANNELS: usize = 3;
/// Maximum per-channel value.
pub const CHANNEL_MAX: f32 = 255.0;

/// An owned RGB frame, row-major, immutable once produced by the capture
/// source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Builds a frame from a raw interleaved RGB buffer, validating that
    /// the buffer length matches the declared dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(MonitorError::BufferSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGB bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Errors unless `other` matches this frame's shape.
    pub fn ensure_same_shape(&self, other: &Frame) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(MonitorError::ShapeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: other.width,
                actual_height: other.height,
            });
        }
        Ok(())
    }
}
