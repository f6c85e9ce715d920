use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the monitor pipeline and its collaborators.
///
/// Capture, shape and front-end failures are fatal: the loop propagates
/// them and the process exits with a diagnostic. A persistence failure is
/// the one recoverable case; the loop logs it and keeps watching.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The capture source failed to deliver a frame.
    #[error("capture source failed: {0}")]
    Capture(String),

    /// Two frames that must share a shape do not. Indicates the capture
    /// source broke its stable-dimensions contract.
    #[error(
        "frame shape mismatch: expected {expected_width}x{expected_height}, \
         got {actual_width}x{actual_height}"
    )]
    ShapeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// A pixel buffer does not fit its declared dimensions.
    #[error("frame buffer of {len} bytes does not fit {width}x{height}x3")]
    BufferSize { width: u32, height: u32, len: usize },

    /// Writing a captured image to the output directory failed.
    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("display sink failed: {0}")]
    Display(String),

    #[error("input source failed: {0}")]
    Input(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_names_both_shapes() {
        let err = MonitorError::ShapeMismatch {
            expected_width: 640,
            expected_height: 480,
            actual_width: 320,
            actual_height: 240,
        };
        let text = err.to_string();
        assert!(text.contains("640x480"), "message was: {text}");
        assert!(text.contains("320x240"), "message was: {text}");
    }

    #[test]
    fn io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MonitorError = io_err.into();
        assert!(matches!(err, MonitorError::Io(_)));
    }
}
