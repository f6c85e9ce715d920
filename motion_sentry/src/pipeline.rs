// THEORY:
// The `pipeline` module is the top-level API for the whole engine. It
// assembles the analysis stages (distance map, smoothing, decision) and
// the control state machine into a single `Monitor` that drives one
// synchronous cycle at a time: capture, rotate, difference, smooth,
// evaluate, persist when warranted, display, and poll for one key.
//
// Every external collaborator (the camera, the window, the dialog
// surface, the image store, the keyboard) sits behind a narrow trait, so
// the loop's full behavior (including pausing and the modal quit
// confirmation) can be exercised against scripted stand-ins without any
// real I/O.

use std::time::Duration;

use tracing::{debug, error, info, warn};

// Re-export the types a front end needs alongside the monitor itself.
pub use crate::core_modules::control::{Key, RecordingMode, RunState};
pub use crate::core_modules::decision::{MotionVerdict, Sensitivity};
pub use crate::core_modules::frame::Frame;

use crate::core_modules::control::{
    ControlState, Directive, HELP_TEXT, HELP_TITLE, INITIAL_SENSITIVITY, QUIT_PROMPT, QUIT_TITLE,
    event_for_key,
};
use crate::core_modules::decision::evaluate;
use crate::core_modules::distance_map::compute_distance;
use crate::core_modules::frame_window::FrameWindow;
use crate::core_modules::smoothing::smooth;
use crate::error::Result;
use crate::storage::{motion_capture_name, snapshot_name};

/// Tunable knobs for the monitor loop.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Threshold the control state starts with.
    pub initial_sensitivity: Sensitivity,
    /// How long the input source may block on each poll.
    pub input_poll: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            initial_sensitivity: INITIAL_SENSITIVITY,
            input_poll: Duration::from_millis(20),
        }
    }
}

/// The operator-facing status burned into every displayed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Wall-clock timestamp, asctime style.
    pub timestamp: String,
    pub sensitivity: Sensitivity,
    pub recording: RecordingMode,
    /// Set only on a motion cycle; carries the index naming the capture.
    pub motion_index: Option<u64>,
    /// Set while the stream is paused.
    pub paused: bool,
}

impl Overlay {
    /// The status line along the bottom of the display.
    pub fn status_line(&self) -> String {
        format!(
            "   Press h for options : Sensitivity = {} : Save detected images is: {}",
            self.sensitivity,
            self.recording.label()
        )
    }

    /// The motion marker, present only on motion cycles.
    pub fn motion_marker(&self) -> Option<String> {
        self.motion_index.map(|index| format!("MD {index}"))
    }
}

/// A live video source. Frames must keep identical dimensions across
/// calls; any failure is fatal for the whole process.
pub trait CaptureSource {
    fn next_frame(&mut self) -> Result<Frame>;
}

/// Renders a frame, burning the overlay text into it first.
pub trait DisplaySink {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> Result<()>;
}

/// Blocking confirmation and information prompts. Assumed to always
/// return; failures of the surface itself are not modeled.
pub trait DialogSurface {
    fn confirm(&mut self, title: &str, message: &str) -> bool;
    fn info(&mut self, title: &str, message: &str);
}

/// Persists captured frames under the output directory.
pub trait FrameStore {
    fn write_frame(&mut self, name: &str, frame: &Frame) -> Result<()>;
    /// Opens the output directory in the system file browser.
    fn reveal(&mut self) -> Result<()>;
}

/// Per-cycle operator input: at most one key per poll, bounded wait.
pub trait InputSource {
    fn poll_key(&mut self) -> Result<Option<Key>>;
}

/// The monitor loop. One instance owns the whole live session: the
/// collaborators, the frame window and the control state.
pub struct Monitor<C, D, G, S, I> {
    capture: C,
    display: D,
    dialog: G,
    store: S,
    input: I,
    window: FrameWindow,
    state: ControlState,
}

impl<C, D, G, S, I> Monitor<C, D, G, S, I>
where
    C: CaptureSource,
    D: DisplaySink,
    G: DialogSurface,
    S: FrameStore,
    I: InputSource,
{
    /// Warms the frame window up with two captures and starts Running.
    pub fn new(
        mut capture: C,
        display: D,
        dialog: G,
        store: S,
        input: I,
        config: MonitorConfig,
    ) -> Result<Self> {
        let first = capture.next_frame()?;
        let second = capture.next_frame()?;
        let window = FrameWindow::new(first, second)?;
        Ok(Self {
            capture,
            display,
            dialog,
            store,
            input,
            window,
            state: ControlState::new(config.initial_sensitivity),
        })
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Runs cycles until the operator confirms a quit.
    pub fn run(&mut self) -> Result<()> {
        while self.state.run_state() != RunState::Terminated {
            self.run_cycle()?;
        }
        info!("monitor terminated");
        Ok(())
    }

    /// One iteration of the loop.
    ///
    /// While paused no frame is captured, evaluated or persisted; the
    /// first key observed resumes the stream. While running, automatic
    /// persistence happens at most once per cycle, and only when the
    /// verdict is motion with recording switched on.
    pub fn run_cycle(&mut self) -> Result<()> {
        if self.state.run_state() == RunState::Paused {
            if self.input.poll_key()?.is_some() {
                self.state.resume();
            }
            return Ok(());
        }

        let frame = self.capture.next_frame()?;
        let lagged = self.window.rotate(frame.clone())?;
        let distance = compute_distance(&lagged, &frame)?;
        let smoothed = smooth(&distance);
        let verdict = evaluate(&smoothed, self.state.sensitivity());
        debug!(
            mean = verdict.mean,
            std_dev = verdict.std_dev,
            threshold = self.state.sensitivity(),
            is_motion = verdict.is_motion,
            "cycle evaluated"
        );

        let motion_index = verdict.is_motion.then(|| self.state.image_index());
        if verdict.is_motion && self.state.recording() == RecordingMode::On {
            self.persist(&frame, motion_capture_name(self.state.image_index()));
        }

        let overlay = self.overlay(motion_index, false);
        self.display.show(&frame, &overlay)?;

        if let Some(key) = self.input.poll_key()? {
            self.dispatch(key, &frame)?;
        }
        Ok(())
    }

    /// Maps a key through the event table and executes the directive the
    /// transition produced. Entering the paused state re-renders the
    /// newest frame with the paused banner before the loop stops cycling.
    fn dispatch(&mut self, key: Key, newest: &Frame) -> Result<()> {
        let Some(event) = event_for_key(key) else {
            return Ok(());
        };
        match self.state.apply(event) {
            Directive::None => {}
            Directive::SaveSnapshot => {
                self.persist(newest, snapshot_name(self.state.image_index()));
            }
            Directive::RevealOutputFolder => {
                if let Err(err) = self.store.reveal() {
                    warn!(error = %err, "could not open the output folder");
                }
            }
            Directive::ShowHelp => self.dialog.info(HELP_TITLE, HELP_TEXT),
            Directive::ConfirmQuit => {
                let confirmed = self.dialog.confirm(QUIT_TITLE, QUIT_PROMPT);
                self.state.resolve_quit(confirmed);
            }
        }
        if self.state.run_state() == RunState::Paused {
            let overlay = self.overlay(None, true);
            self.display.show(newest, &overlay)?;
        }
        Ok(())
    }

    /// Writes one image, advancing the index only when the write lands.
    /// A failed write is logged and the loop keeps running.
    fn persist(&mut self, frame: &Frame, name: String) {
        match self.store.write_frame(&name, frame) {
            Ok(()) => {
                let index = self.state.claim_index();
                info!(name, index, "image persisted");
            }
            Err(err) => error!(error = %err, name, "failed to persist image"),
        }
    }

    fn overlay(&self, motion_index: Option<u64>, paused: bool) -> Overlay {
        Overlay {
            timestamp: chrono::Local::now()
                .format("%a %b %e %H:%M:%S %Y")
                .to_string(),
            sensitivity: self.state.sensitivity(),
            recording: self.state.recording(),
            motion_index,
            paused,
        }
    }
}
