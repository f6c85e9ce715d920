// THEORY:
// The distance map is the first analytical stage of the pipeline. Given
// two equally shaped frames, every pixel pair is collapsed into a single
// scalar: the Euclidean distance between the two colors, normalized by the
// largest distance the color space allows and scaled back onto the byte
// range. The result is a single-channel image in which bright pixels mark
// where the scene changed, regardless of the direction of the change:
// the distance is unsigned, so the two arguments are interchangeable.

use crate::core_modules::frame::{CHANNEL_MAX, CHANNELS, Frame};
use crate::error::Result;

/// Single-channel image of per-pixel color distances, sharing the shape of
/// the frames it was derived from. Discarded after the decision step,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    width: u32,
    height: u32,
    values: Vec<u8>,
}

impl DistanceMap {
    pub(crate) fn new(width: u32, height: u32, values: Vec<u8>) -> Self {
        debug_assert_eq!(values.len(), width as usize * height as usize);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }
}

/// Pythagorean color distance between two equally shaped frames.
///
/// Each pixel pair is differenced per channel in floating point, the
/// three-channel norm is divided by `sqrt(3 * 255^2)` and scaled back to
/// [0, 255] with integer truncation. Identical frames produce an all-zero
/// map; a frame with no counterpart in the color space (pure black against
/// pure white) produces 255.
pub fn compute_distance(a: &Frame, b: &Frame) -> Result<DistanceMap> {
    a.ensure_same_shape(b)?;

    let max_norm = (CHANNEL_MAX * CHANNEL_MAX * CHANNELS as f32).sqrt();
    let mut values = Vec::with_capacity(a.data().len() / CHANNELS);
    for (pa, pb) in a
        .data()
        .chunks_exact(CHANNELS)
        .zip(b.data().chunks_exact(CHANNELS))
    {
        let mut sum_sq = 0.0f32;
        for channel in 0..CHANNELS {
            let diff = pa[channel] as f32 - pb[channel] as f32;
            sum_sq += diff * diff;
        }
        values.push((sum_sq.sqrt() / max_norm * 255.0) as u8);
    }
    Ok(DistanceMap::new(a.width(), a.height(), values))
}
