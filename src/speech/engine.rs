//! Engine trait and the events engines emit.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Buffered events per engine (one cycle never produces more than a handful).
pub const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Error message used when an attempt ends without any speech.
pub const NO_SPEECH_DETECTED: &str = "No speech detected";

/// Parameters for a single recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionOptions {
    pub locale: String,        // BCP-47 locale, e.g. "en-US"
    pub interim_results: bool, // Report partial transcripts
    pub continuous: bool,      // Keep listening after the first result
}

impl RecognitionOptions {
    /// Single-shot, final-result-only options for the given locale.
    pub fn single_shot(locale: impl Into<String>) -> Self {
        Self { locale: locale.into(), interim_results: false, continuous: false }
    }
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self::single_shot("en-US")
    }
}

/// Event emitted by a speech engine.
///
/// Each start/stop cycle produces exactly one `Result` or `Error`, framed by
/// `Start` and `End`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SpeechEvent {
    Start,
    End,
    Result(String),
    Error(String),
}

/// Platform speech recognizer as seen by the practice screen.
#[allow(async_fn_in_trait)]
pub trait SpeechEngine {
    /// Ask for microphone and speech recognition permission.
    async fn request_permission(&mut self) -> bool;

    /// Begin a recognition attempt. Events arrive on the engine's channel.
    fn start(&mut self, options: &RecognitionOptions) -> Result<()>;

    /// Stop listening. The engine still emits `End` for the current attempt.
    fn stop(&mut self);
}
