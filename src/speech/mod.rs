//! Speech recognition collaborators.
//!
//! The practice screen only talks to a [`SpeechEngine`]; engines report back
//! through a channel of [`SpeechEvent`]s.
//!
//! - `console`: the user types what the recognizer heard
//! - `scripted`: replays transcripts given up front (non-interactive runs, tests)

mod console;
mod engine;
mod scripted;

pub use console::{ConsoleEngine, SharedInput, shared_stdin};
pub use engine::{RecognitionOptions, SpeechEngine, SpeechEvent};
#[cfg(test)]
pub use engine::NO_SPEECH_DETECTED;
pub use scripted::ScriptedEngine;
