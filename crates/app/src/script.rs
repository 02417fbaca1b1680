//! JSON session scripts replayed by the driver binary
//!
//! A script is a list of steps. Pointer steps carry client coordinates and
//! go through the session's input adapter; the rest mirror the UI buttons.
//!
//! ```json
//! {
//!   "element": { "left": 0, "top": 0, "width": 300, "height": 300 },
//!   "steps": [
//!     "cycle_symmetry",
//!     { "pointer": { "type": "down", "x": 160, "y": 150 } },
//!     { "pointer": { "type": "move", "x": 180, "y": 170 } },
//!     { "pointer": { "type": "up" } },
//!     "toggle_playback",
//!     { "frames": 120 }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use symmetra_audio::PlaybackTransport;
use tracing::{debug, info};

use crate::input::{ElementRect, PointerEvent};
use crate::scheduler::FrameScheduler;
use crate::session::Session;

/// Errors raised while loading a script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Pointer(PointerEvent),
    CycleColor,
    CycleSymmetry,
    CycleSize,
    CycleStyle,
    CycleTool,
    Clear,
    TogglePlayback,
    /// Deliver up to this many reactive frames
    Frames(u32),
}

/// A complete script
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Displayed element box; defaults to the canvas resolution
    #[serde(default)]
    pub element: Option<ElementRect>,
    pub steps: Vec<ScriptStep>,
}

/// What a replay did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub committed: usize,
    pub frames: u32,
}

impl SessionScript {
    pub fn from_json_str(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Run every step against `session`
    pub fn replay<S, T>(&self, session: &mut Session<S, T>) -> ReplaySummary
    where
        S: FrameScheduler,
        T: PlaybackTransport,
    {
        if let Some(rect) = self.element {
            session.set_element_rect(rect);
        }

        let mut summary = ReplaySummary::default();
        for step in &self.steps {
            debug!("replay: {:?}", step);
            match *step {
                ScriptStep::Pointer(event) => {
                    if session.handle_pointer(event).is_some() {
                        summary.committed += 1;
                    }
                }
                ScriptStep::CycleColor => log_selection(session.cycle_color()),
                ScriptStep::CycleSymmetry => log_selection(session.cycle_symmetry()),
                ScriptStep::CycleSize => log_selection(session.cycle_size()),
                ScriptStep::CycleStyle => log_selection(session.cycle_style()),
                ScriptStep::CycleTool => log_selection(session.cycle_tool()),
                ScriptStep::Clear => {
                    session.clear();
                }
                ScriptStep::TogglePlayback => {
                    session.toggle_playback();
                }
                ScriptStep::Frames(count) => summary.frames += session.run_frames(count),
            }
            summary.steps += 1;
        }
        summary
    }
}

fn log_selection(selection: symmetra_painting::Selection) {
    info!(
        "Selection: {} / {}px / {}-fold / {:?} / {:?}",
        selection.color.hex(),
        selection.size.diameter(),
        selection.symmetry.count(),
        selection.style,
        selection.tool
    );
}
