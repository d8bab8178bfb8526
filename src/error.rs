//! User-facing errors.
//!
//! None of these are fatal: each is shown inline on the screen that produced
//! it and the user decides what to do next.

use thiserror::Error;

/// Message shown when an engine reports an error without a description.
pub const DEFAULT_RECOGNITION_ERROR: &str = "Speech recognition error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PronounceError {
    /// Blank or whitespace-only word on the entry screen.
    #[error("Please enter a word.")]
    EmptyWord,

    /// Microphone or speech permission refused.
    #[error("Microphone or speech recognition permission not granted.")]
    PermissionDenied,

    /// The recognition engine reported a failure.
    #[error("{0}")]
    Recognition(String),

    /// A recognition attempt is already running.
    #[error("Already listening. Stop the current attempt first.")]
    AlreadyRecognizing,
}

impl PronounceError {
    /// Build a recognition error, substituting a generic message for an empty one.
    pub fn recognition(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            PronounceError::Recognition(DEFAULT_RECOGNITION_ERROR.to_string())
        } else {
            PronounceError::Recognition(message)
        }
    }
}
