//! Scripted speech engine.
//!
//! Replays a fixed list of transcripts, one per recognition attempt. Used for
//! non-interactive runs (`--transcript`) and in tests.

use std::collections::VecDeque;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::engine::{EVENT_CHANNEL_CAPACITY, NO_SPEECH_DETECTED, RecognitionOptions, SpeechEngine, SpeechEvent};

pub struct ScriptedEngine {
    transcripts: VecDeque<String>,          // Remaining canned transcripts
    events_tx: mpsc::Sender<SpeechEvent>,   // Event channel to the practice screen
    permission_granted: bool,               // Answer to permission requests
    failure: Option<String>,                // Engine error to report instead of a result
}

impl ScriptedEngine {
    /// Create an engine that replays `transcripts` in order.
    ///
    /// # Returns
    /// A tuple of (ScriptedEngine, event receiver channel)
    pub fn new<I, S>(transcripts: I) -> (Self, mpsc::Receiver<SpeechEvent>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let engine = Self {
            transcripts: transcripts.into_iter().map(Into::into).collect(),
            events_tx,
            permission_granted: true,
            failure: None,
        };
        (engine, events_rx)
    }

    /// Set the answer given to permission requests.
    pub fn with_permission(mut self, granted: bool) -> Self {
        self.permission_granted = granted;
        self
    }

    /// Report `message` as an engine error on every attempt.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    fn emit(&self, event: SpeechEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            warn!("Failed to send speech event: {}", e);
        }
    }
}

impl SpeechEngine for ScriptedEngine {
    async fn request_permission(&mut self) -> bool {
        self.permission_granted
    }

    fn start(&mut self, options: &RecognitionOptions) -> Result<()> {
        debug!("Scripted recognition started ({})", options.locale);
        self.emit(SpeechEvent::Start);

        let outcome = match (&self.failure, self.transcripts.pop_front()) {
            (Some(message), _) => SpeechEvent::Error(message.clone()),
            (None, Some(transcript)) => SpeechEvent::Result(transcript),
            (None, None) => SpeechEvent::Error(NO_SPEECH_DETECTED.to_string()),
        };
        self.emit(outcome);
        self.emit(SpeechEvent::End);
        Ok(())
    }

    fn stop(&mut self) {
        debug!("Scripted recognition stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(rx: &mut mpsc::Receiver<SpeechEvent>) -> Vec<SpeechEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_replays_transcripts_in_order() {
        let (mut engine, mut rx) = ScriptedEngine::new(["cat", "cut"]);
        let options = RecognitionOptions::default();

        engine.start(&options).unwrap();
        assert_eq!(drain(&mut rx).await, vec![SpeechEvent::Start, SpeechEvent::Result("cat".into()), SpeechEvent::End]);

        engine.start(&options).unwrap();
        assert_eq!(drain(&mut rx).await, vec![SpeechEvent::Start, SpeechEvent::Result("cut".into()), SpeechEvent::End]);
    }

    #[tokio::test]
    async fn test_exhausted_script_reports_no_speech() {
        let (mut engine, mut rx) = ScriptedEngine::new(Vec::<String>::new());
        engine.start(&RecognitionOptions::default()).unwrap();
        let events = drain(&mut rx).await;
        assert_eq!(events[1], SpeechEvent::Error(NO_SPEECH_DETECTED.to_string()));
    }

    #[tokio::test]
    async fn test_permission_answer() {
        let (engine, _rx) = ScriptedEngine::new(["cat"]);
        let mut engine = engine.with_permission(false);
        assert!(!engine.request_permission().await);
    }
}
