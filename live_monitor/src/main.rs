// Interactive webcam front end for the motion_sentry engine. Everything
// OpenCV lives here: the capture device, the display window with its
// burned-in overlay text, and the per-cycle key poll. The engine itself
// only ever sees the collaborator traits.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use motion_sentry::error::{MonitorError, Result as SentryResult};
use motion_sentry::pipeline::{
    CaptureSource, DialogSurface, DisplaySink, Frame, InputSource, Key, Monitor, MonitorConfig,
    Overlay,
};
use motion_sentry::storage::{DEFAULT_OUTPUT_DIR, DiskStore};
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const WINDOW: &str = "Live video";

/// Webcam-backed capture source. Frames come off the device in BGR and
/// are handed to the pipeline as owned RGB buffers.
struct CameraSource {
    cap: VideoCapture,
    bgr: Mat,
    rgb: Mat,
}

impl CameraSource {
    fn grab(&mut self) -> opencv::Result<Option<(u32, u32, Vec<u8>)>> {
        if !self.cap.read(&mut self.bgr)? || self.bgr.empty() {
            return Ok(None);
        }
        imgproc::cvt_color(&self.bgr, &mut self.rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let data = self.rgb.data_bytes()?.to_vec();
        Ok(Some((self.rgb.cols() as u32, self.rgb.rows() as u32, data)))
    }
}

impl CaptureSource for CameraSource {
    fn next_frame(&mut self) -> SentryResult<Frame> {
        match self.grab() {
            Ok(Some((width, height, data))) => Frame::from_raw(width, height, data),
            Ok(None) => Err(MonitorError::Capture(
                "webcam not found or no data from camera".into(),
            )),
            Err(err) => Err(MonitorError::Capture(err.to_string())),
        }
    }
}

/// Highgui window that burns the overlay into each frame before showing it.
struct WindowSink {
    window: &'static str,
}

impl WindowSink {
    fn render(&self, frame: &Frame, overlay: &Overlay) -> opencv::Result<()> {
        let mut rgb = Mat::new_size_with_default(
            core::Size::new(frame.width() as i32, frame.height() as i32),
            core::CV_8UC3,
            Scalar::all(0.0),
        )?;
        rgb.data_bytes_mut()?.copy_from_slice(frame.data());
        let mut canvas = Mat::default();
        imgproc::cvt_color(&rgb, &mut canvas, imgproc::COLOR_RGB2BGR, 0)?;

        let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
        let white = Scalar::new(255.0, 255.0, 255.0, 0.0);

        imgproc::put_text(
            &mut canvas,
            &overlay.timestamp,
            core::Point::new(280, 24),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.8,
            green,
            2,
            imgproc::LINE_AA,
            false,
        )?;
        imgproc::put_text(
            &mut canvas,
            &overlay.status_line(),
            core::Point::new(10, canvas.rows() - 10),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.5,
            white,
            1,
            imgproc::LINE_AA,
            false,
        )?;
        if let Some(marker) = overlay.motion_marker() {
            imgproc::put_text(
                &mut canvas,
                &marker,
                core::Point::new(0, 20),
                imgproc::FONT_HERSHEY_SIMPLEX,
                0.8,
                green,
                2,
                imgproc::LINE_AA,
                false,
            )?;
        }
        if overlay.paused {
            imgproc::put_text(
                &mut canvas,
                "PAUSED",
                core::Point::new(canvas.cols() / 2 - 110, canvas.rows() / 2),
                imgproc::FONT_HERSHEY_SIMPLEX,
                2.0,
                green,
                8,
                imgproc::LINE_AA,
                false,
            )?;
        }
        highgui::imshow(self.window, &canvas)?;
        Ok(())
    }
}

impl DisplaySink for WindowSink {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> SentryResult<()> {
        self.render(frame, overlay)
            .map_err(|err| MonitorError::Display(err.to_string()))
    }
}

/// Bounded per-cycle key poll over the highgui event queue.
struct KeyPoll {
    wait_ms: i32,
}

impl InputSource for KeyPoll {
    fn poll_key(&mut self) -> SentryResult<Option<Key>> {
        let code = highgui::wait_key(self.wait_ms)
            .map_err(|err| MonitorError::Input(err.to_string()))?;
        Ok(decode_key(code))
    }
}

/// Maps a raw waitKey code to an operator key. Letters are lowercased so
/// the dispatch table works with or without shift.
fn decode_key(code: i32) -> Option<Key> {
    if code < 0 {
        return None;
    }
    match code & 0xFF {
        13 => Some(Key::Enter),
        byte @ 0x20..=0x7E => Some(Key::Char((byte as u8 as char).to_ascii_lowercase())),
        _ => None,
    }
}

/// Terminal-backed dialog surface: a blocking y/N prompt and a plain
/// info block.
struct ConsoleDialog;

impl DialogSurface for ConsoleDialog {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        print!("{title} {message} [y/N]: ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("y")
    }

    fn info(&mut self, title: &str, message: &str) {
        println!("\n== {title} ==\n{message}\n");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let store = DiskStore::open(DEFAULT_OUTPUT_DIR)
        .with_context(|| format!("failed to prepare output directory `{DEFAULT_OUTPUT_DIR}`"))?;
    info!(dir = %store.root().display(), "output directory ready");

    let cap =
        VideoCapture::new(0, videoio::CAP_ANY).context("failed to open the default camera")?;
    if !cap.is_opened()? {
        bail!("no capture device found");
    }
    highgui::named_window(WINDOW, highgui::WINDOW_AUTOSIZE)?;

    let config = MonitorConfig::default();
    let input = KeyPoll {
        wait_ms: config.input_poll.as_millis() as i32,
    };
    let camera = CameraSource {
        cap,
        bgr: Mat::default(),
        rgb: Mat::default(),
    };

    let mut monitor = Monitor::new(
        camera,
        WindowSink { window: WINDOW },
        ConsoleDialog,
        store,
        input,
        config,
    )
    .context("failed to warm up the capture stream")?;
    monitor.run()?;

    highgui::destroy_all_windows()?;
    Ok(())
}
