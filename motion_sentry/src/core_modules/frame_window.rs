// THEORY:
// The frame window is the sliding three-frame memory behind the lagged
// distance pairing. Between cycles it retains the two most recent
// captures; when a new frame arrives it retires the frame captured two
// cycles earlier and hands it back as the comparison partner for the
// incoming one. Comparing frame N-2 against frame N, rather than the
// adjacent pair, damps single-frame jitter while still reacting within a
// few frames, and is the exact distance characteristic of the algorithm
// this engine descends from.

use std::mem;

use crate::core_modules::frame::Frame;
use crate::error::Result;

/// Sliding window over the most recent captures. During a cycle the
/// retired frame, the retained one and the incoming capture are all alive
/// at once.
#[derive(Debug)]
pub struct FrameWindow {
    older: Frame,
    newer: Frame,
}

impl FrameWindow {
    /// Seeds the window with the two warm-up captures.
    pub fn new(first: Frame, second: Frame) -> Result<Self> {
        first.ensure_same_shape(&second)?;
        Ok(Self {
            older: first,
            newer: second,
        })
    }

    /// Rotates `incoming` into the window and returns the frame captured
    /// two cycles earlier: the comparison partner for `incoming`.
    pub fn rotate(&mut self, incoming: Frame) -> Result<Frame> {
        self.newer.ensure_same_shape(&incoming)?;
        Ok(mem::replace(
            &mut self.older,
            mem::replace(&mut self.newer, incoming),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;

    fn tagged(tag: u8) -> Frame {
        Frame::from_raw(2, 2, vec![tag; 12]).unwrap()
    }

    #[test]
    fn rotate_returns_the_lag_two_frame() {
        let mut window = FrameWindow::new(tagged(0), tagged(1)).unwrap();
        for tag in 2u8..8 {
            let partner = window.rotate(tagged(tag)).unwrap();
            assert_eq!(
                partner,
                tagged(tag - 2),
                "capture {tag} must be paired with capture {}",
                tag - 2
            );
        }
    }

    #[test]
    fn seed_frames_must_share_a_shape() {
        let small = Frame::from_raw(1, 1, vec![0; 3]).unwrap();
        assert!(matches!(
            FrameWindow::new(tagged(0), small),
            Err(MonitorError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn rotation_rejects_a_shape_change() {
        let mut window = FrameWindow::new(tagged(0), tagged(1)).unwrap();
        let small = Frame::from_raw(1, 1, vec![0; 3]).unwrap();
        assert!(matches!(
            window.rotate(small),
            Err(MonitorError::ShapeMismatch { .. })
        ));
    }
}
