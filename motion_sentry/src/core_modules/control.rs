// THEORY:
// The control module owns every piece of operator-facing state: whether
// detected frames are being recorded, the sensitivity threshold, the
// lifecycle of the loop itself, and the index the next persisted image
// will be named with. Discrete key events flow through one declarative
// dispatch table (`event_for_key`) into one transition interpreter
// (`ControlState::apply`), and side effects come back out as `Directive`
// values for the pipeline to execute. The state machine performs no I/O
// of its own, so every transition can be exercised without a camera, a
// window or a disk.

use tracing::info;

use crate::core_modules::decision::Sensitivity;

/// Threshold the monitor starts with; 10-15 suits most cameras and rooms.
pub const INITIAL_SENSITIVITY: Sensitivity = 15;

pub const QUIT_TITLE: &str = "Quit Motion Monitor?";
pub const QUIT_PROMPT: &str = "Are you sure?";
pub const HELP_TITLE: &str = "Motion Monitor help - Keys";

/// The static key reference shown on request.
pub const HELP_TEXT: &str = "\
H ~ This menu\n\
M ~ Start saving detected images\n\
S ~ Stop saving detected images\n\
X ~ Take a single snapshot\n\
V ~ View images folder\n\
+ ~ Camera sensitivity increase\n\
- ~ Camera sensitivity decrease\n\
Q ~ Quit\n\
ENTER ~ Pause video stream\n\
\n\
Tip: make sure the video window is selected\n\
for key presses to work.";

/// Whether detected-motion frames are persisted automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    Off,
    On,
}

impl RecordingMode {
    /// Label used in the overlay status line.
    pub fn label(self) -> &'static str {
        match self {
            RecordingMode::Off => "OFF",
            RecordingMode::On => "ON",
        }
    }
}

/// Lifecycle of the monitor loop. `Terminated` is the only terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    PendingQuitConfirm,
    Terminated,
}

/// A single key read from the operator, at most one per cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
}

/// The discrete operator events the state machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    RecordOn,
    RecordOff,
    RaiseSensitivity,
    LowerSensitivity,
    Snapshot,
    OpenFolder,
    ShowHelp,
    Pause,
    QuitRequest,
}

/// The key-to-event dispatch table. Unmapped keys are ignored.
pub fn event_for_key(key: Key) -> Option<ControlEvent> {
    match key {
        Key::Char('m') => Some(ControlEvent::RecordOn),
        Key::Char('s') => Some(ControlEvent::RecordOff),
        Key::Char('+') => Some(ControlEvent::RaiseSensitivity),
        Key::Char('-') => Some(ControlEvent::LowerSensitivity),
        Key::Char('x') => Some(ControlEvent::Snapshot),
        Key::Char('v') => Some(ControlEvent::OpenFolder),
        Key::Char('h') => Some(ControlEvent::ShowHelp),
        Key::Char('q') => Some(ControlEvent::QuitRequest),
        Key::Enter => Some(ControlEvent::Pause),
        Key::Char(_) => None,
    }
}

/// A side effect the pipeline must carry out after a transition. The
/// state machine itself never touches a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    None,
    SaveSnapshot,
    RevealOutputFolder,
    ShowHelp,
    ConfirmQuit,
}

/// All operator-facing state, updated in place each cycle by the loop
/// that owns it.
#[derive(Debug, Clone)]
pub struct ControlState {
    run_state: RunState,
    recording: RecordingMode,
    sensitivity: Sensitivity,
    image_index: u64,
}

impl ControlState {
    pub fn new(sensitivity: Sensitivity) -> Self {
        Self {
            run_state: RunState::Running,
            recording: RecordingMode::Off,
            sensitivity,
            image_index: 0,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn recording(&self) -> RecordingMode {
        self.recording
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// Index the next persisted image will be named with.
    pub fn image_index(&self) -> u64 {
        self.image_index
    }

    /// Applies one operator event and returns the side effect it requests.
    /// Events whose precondition is not met are ignored.
    pub fn apply(&mut self, event: ControlEvent) -> Directive {
        match event {
            ControlEvent::RecordOn if self.run_state == RunState::Running => {
                self.recording = RecordingMode::On;
                info!("saving of detected images switched ON");
                Directive::None
            }
            ControlEvent::RecordOff if self.run_state == RunState::Running => {
                self.recording = RecordingMode::Off;
                info!("saving of detected images switched OFF");
                Directive::None
            }
            ControlEvent::RaiseSensitivity => {
                self.sensitivity += 1;
                Directive::None
            }
            ControlEvent::LowerSensitivity => {
                self.sensitivity -= 1;
                Directive::None
            }
            ControlEvent::Snapshot if self.run_state == RunState::Running => Directive::SaveSnapshot,
            ControlEvent::OpenFolder => Directive::RevealOutputFolder,
            ControlEvent::ShowHelp => Directive::ShowHelp,
            ControlEvent::Pause if self.run_state == RunState::Running => {
                self.run_state = RunState::Paused;
                Directive::None
            }
            ControlEvent::QuitRequest if self.run_state == RunState::Running => {
                self.run_state = RunState::PendingQuitConfirm;
                Directive::ConfirmQuit
            }
            _ => Directive::None,
        }
    }

    /// Resolves a pending quit confirmation. A "no" restores the running
    /// state untouched; a "yes" terminates the loop for good.
    pub fn resolve_quit(&mut self, confirmed: bool) {
        if self.run_state != RunState::PendingQuitConfirm {
            return;
        }
        if confirmed {
            info!("quit confirmed");
            self.run_state = RunState::Terminated;
        } else {
            self.run_state = RunState::Running;
        }
    }

    /// Any key observed while paused resumes the stream.
    pub fn resume(&mut self) {
        if self.run_state == RunState::Paused {
            self.run_state = RunState::Running;
        }
    }

    /// Consumes the current image index after a successful write. Indices
    /// advance once per persisted image and are never reused.
    pub fn claim_index(&mut self) -> u64 {
        let index = self.image_index;
        self.image_index += 1;
        index
    }
}
