// THEORY:
// Everything the monitor persists lands in one flat output directory,
// created at startup and treated as the working root for the life of the
// process. Naming is deliberately minimal: motion captures are numbered
// `<index>.jpg`, operator snapshots `<index>-snapshot.jpg`, with one
// shared, never-reused index sequence between them. `DiskStore` is the
// filesystem implementation of the pipeline's `FrameStore` trait; the
// pure naming functions live here too so they can be tested on their own.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;

use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::core_modules::frame::Frame;
use crate::error::{MonitorError, Result};
use crate::pipeline::FrameStore;

/// Directory every persisted image lands in, created at startup if absent.
pub const DEFAULT_OUTPUT_DIR: &str = "detected-images";

/// Name for an automatically captured motion frame.
pub fn motion_capture_name(index: u64) -> String {
    format!("{index}.jpg")
}

/// Name for an operator-requested snapshot.
pub fn snapshot_name(index: u64) -> String {
    format!("{index}-snapshot.jpg")
}

#[cfg(target_os = "macos")]
const FILE_BROWSER: &str = "open";
#[cfg(target_os = "windows")]
const FILE_BROWSER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const FILE_BROWSER: &str = "xdg-open";

/// Filesystem-backed frame store rooted at the output directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Opens the store, creating the directory when missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameStore for DiskStore {
    fn write_frame(&mut self, name: &str, frame: &Frame) -> Result<()> {
        let path = self.root.join(name);
        encode_jpeg(&path, frame).map_err(|source| MonitorError::Persist {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "frame written");
        Ok(())
    }

    fn reveal(&mut self) -> Result<()> {
        Command::new(FILE_BROWSER).arg(&self.root).spawn()?;
        Ok(())
    }
}

fn encode_jpeg(path: &Path, frame: &Frame) -> std::result::Result<(), image::ImageError> {
    let output = File::create(path)?;
    let encoder = JpegEncoder::new(output);
    encoder.write_image(
        frame.data(),
        frame.width(),
        frame.height(),
        image::ExtendedColorType::Rgb8,
    )
}
