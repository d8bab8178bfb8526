//! Practice screen session: drives one speech engine and turns transcripts
//! into feedback.
//!
//! State machine: `Idle -> Recognizing -> Scoring -> Idle`. Permission
//! denial and engine errors go straight back to `Idle` without scoring.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::entry::Word;
use crate::error::PronounceError;
use crate::scoring::{self, ScoreBand};
use crate::speech::{RecognitionOptions, SpeechEngine, SpeechEvent};
use crate::tips::{self, Tip};

/// Where the practice screen is in a recognition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionState {
    Idle,
    Recognizing,
    Scoring,
}

/// Outcome of one completed recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub word: String,
    pub transcript: String,
    pub score: u8,
    pub band: ScoreBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<Tip>,
}

/// Score a transcript and pick a tip when the score is below `tip_threshold`.
pub fn evaluate(word: &str, transcript: &str, tip_threshold: u8) -> Feedback {
    let score = scoring::score(word, transcript);
    let tip = if score < tip_threshold { tips::select_tip(word, transcript) } else { None };

    Feedback { word: word.to_string(), transcript: transcript.to_string(), score, band: ScoreBand::from_score(score), tip }
}

/// One practice screen bound to a word and an injected speech engine.
pub struct PracticeSession<'e, E: SpeechEngine> {
    word: Word,                        // Target word
    engine: &'e mut E,                 // Speech recognition collaborator
    options: RecognitionOptions,       // Options for every attempt
    tip_threshold: u8,                 // Tips are shown below this score
    state: RecognitionState,           // Current state
    attempt_open: bool,                // Between start() and the engine's End
    cancelled: bool,                   // User stopped the current attempt
    feedback: Option<Feedback>,        // Latest scored attempt
    error: Option<PronounceError>,     // Latest inline error
}

impl<'e, E: SpeechEngine> PracticeSession<'e, E> {
    pub fn new(word: Word, engine: &'e mut E, options: RecognitionOptions, tip_threshold: u8) -> Self {
        Self {
            word,
            engine,
            options,
            tip_threshold,
            state: RecognitionState::Idle,
            attempt_open: false,
            cancelled: false,
            feedback: None,
            error: None,
        }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn state(&self) -> RecognitionState {
        self.state
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn error(&self) -> Option<&PronounceError> {
        self.error.as_ref()
    }

    /// Whether an attempt is in flight (its `End` has not arrived yet).
    pub fn is_active(&self) -> bool {
        self.attempt_open
    }

    /// Whether the user stopped the in-flight attempt.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Begin a new recognition attempt.
    ///
    /// Clears the previous transcript, score, tip and error first.
    ///
    /// # Errors
    /// - [`PronounceError::AlreadyRecognizing`] if an attempt is in flight
    /// - [`PronounceError::PermissionDenied`] if the engine refuses permission
    /// - [`PronounceError::Recognition`] if the engine fails to start
    pub async fn start(&mut self) -> Result<(), PronounceError> {
        if self.attempt_open {
            return Err(PronounceError::AlreadyRecognizing);
        }

        self.feedback = None;
        self.error = None;
        self.cancelled = false;

        if !self.engine.request_permission().await {
            warn!("Speech permission not granted");
            return Err(self.fail(PronounceError::PermissionDenied));
        }

        if let Err(e) = self.engine.start(&self.options) {
            warn!("Failed to start recognition: {:#}", e);
            return Err(self.fail(PronounceError::recognition(e.to_string())));
        }

        debug!("Recognition started for '{}'", self.word);
        self.attempt_open = true;
        self.state = RecognitionState::Recognizing;
        Ok(())
    }

    /// Stop the current attempt. A transcript arriving afterwards is not scored.
    pub fn stop(&mut self) {
        if !self.attempt_open {
            return;
        }
        info!("⏹️  Recognition stopped");
        self.cancelled = true;
        self.engine.stop();
    }

    /// Apply an engine event.
    pub fn handle_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Start => {
                if self.attempt_open {
                    self.state = RecognitionState::Recognizing;
                }
            }
            SpeechEvent::Result(transcript) => self.on_result(transcript),
            SpeechEvent::Error(message) => {
                if !self.attempt_open {
                    debug!("Ignoring engine error outside an attempt: {}", message);
                    return;
                }
                let error = PronounceError::recognition(message);
                warn!("Recognition failed: {}", error);
                self.fail(error);
            }
            SpeechEvent::End => {
                self.attempt_open = false;
                self.state = RecognitionState::Idle;
            }
        }
    }

    fn on_result(&mut self, transcript: String) {
        if !self.attempt_open || self.state != RecognitionState::Recognizing {
            debug!("Ignoring transcript outside an attempt: {:?}", transcript);
            return;
        }
        if self.cancelled {
            debug!("Ignoring transcript after stop: {:?}", transcript);
            return;
        }

        self.state = RecognitionState::Scoring;
        let feedback = evaluate(self.word.as_str(), &transcript, self.tip_threshold);
        info!("🗣️ Heard \"{}\" for \"{}\": {}/{}", feedback.transcript, feedback.word, feedback.score, scoring::MAX_SCORE);
        self.feedback = Some(feedback);
        self.state = RecognitionState::Idle;
    }

    /// Record an inline error and return to idle.
    fn fail(&mut self, error: PronounceError) -> PronounceError {
        self.error = Some(error.clone());
        self.state = RecognitionState::Idle;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::validate_word;
    use crate::speech::{NO_SPEECH_DETECTED, ScriptedEngine};
    use tokio::sync::mpsc;

    fn pump<E: SpeechEngine>(session: &mut PracticeSession<'_, E>, rx: &mut mpsc::Receiver<SpeechEvent>) {
        while let Ok(event) = rx.try_recv() {
            session.handle_event(event);
        }
    }

    fn word(text: &str) -> Word {
        validate_word(text).unwrap()
    }

    #[test]
    fn test_evaluate_attaches_tip_below_threshold() {
        let feedback = evaluate("cut", "cat", 8);
        assert_eq!(feedback.score, 7);
        assert_eq!(feedback.band, ScoreBand::Fair);
        assert_eq!(feedback.tip, Some(Tip::UhVowel));
    }

    #[test]
    fn test_evaluate_skips_tip_at_threshold() {
        let feedback = evaluate("cat", "Cat", 8);
        assert_eq!(feedback.score, 10);
        assert_eq!(feedback.tip, None);
    }

    #[test]
    fn test_feedback_serialization() {
        let json = serde_json::to_value(evaluate("kit", "keet", 8)).unwrap();
        assert_eq!(json["score"], 5);
        assert_eq!(json["band"], "fair");
        assert_eq!(json["tip"], "short_i_vowel");

        let json = serde_json::to_value(evaluate("kit", "kit", 8)).unwrap();
        assert!(json.get("tip").is_none());
    }

    #[tokio::test]
    async fn test_successful_attempt_scores_transcript() {
        let (mut engine, mut rx) = ScriptedEngine::new(["cat"]);
        let mut session = PracticeSession::new(word("cut"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        assert_eq!(session.state(), RecognitionState::Recognizing);
        assert!(session.is_active());

        pump(&mut session, &mut rx);
        assert_eq!(session.state(), RecognitionState::Idle);
        assert!(!session.is_active());

        let feedback = session.feedback().unwrap();
        assert_eq!(feedback.transcript, "cat");
        assert_eq!(feedback.score, 7);
        assert_eq!(feedback.tip, Some(Tip::UhVowel));
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_untrimmed_word_counts_its_whitespace() {
        let (mut engine, mut rx) = ScriptedEngine::new(["cut"]);
        let mut session = PracticeSession::new(word("cut "), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        pump(&mut session, &mut rx);

        let feedback = session.feedback().unwrap();
        assert_eq!(feedback.word, "cut ");
        assert_eq!(feedback.score, 8);
        assert_eq!(feedback.tip, None);
    }

    #[tokio::test]
    async fn test_permission_denied_returns_to_idle() {
        let (engine, mut rx) = ScriptedEngine::new(["cat"]);
        let mut engine = engine.with_permission(false);
        let mut session = PracticeSession::new(word("cat"), &mut engine, RecognitionOptions::default(), 8);

        assert_eq!(session.start().await, Err(PronounceError::PermissionDenied));
        assert_eq!(session.state(), RecognitionState::Idle);
        assert!(!session.is_active());
        assert_eq!(session.error(), Some(&PronounceError::PermissionDenied));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_engine_error_is_shown_without_scoring() {
        let (engine, mut rx) = ScriptedEngine::new(["cat"]);
        let mut engine = engine.with_failure("audio device busy");
        let mut session = PracticeSession::new(word("cat"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        pump(&mut session, &mut rx);

        assert_eq!(session.state(), RecognitionState::Idle);
        assert!(session.feedback().is_none());
        assert_eq!(session.error(), Some(&PronounceError::Recognition("audio device busy".into())));
    }

    #[tokio::test]
    async fn test_empty_error_message_gets_default() {
        let (engine, mut rx) = ScriptedEngine::new(["cat"]);
        let mut engine = engine.with_failure("");
        let mut session = PracticeSession::new(word("cat"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        pump(&mut session, &mut rx);
        assert_eq!(session.error().map(ToString::to_string).as_deref(), Some("Speech recognition error"));
    }

    #[tokio::test]
    async fn test_only_one_attempt_at_a_time() {
        let (mut engine, mut rx) = ScriptedEngine::new(["cat", "cut"]);
        let mut session = PracticeSession::new(word("cut"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        assert_eq!(session.start().await, Err(PronounceError::AlreadyRecognizing));

        pump(&mut session, &mut rx);
        assert_eq!(session.feedback().map(|f| f.transcript.as_str()), Some("cat"));
    }

    #[tokio::test]
    async fn test_new_attempt_resets_previous_feedback() {
        let (mut engine, mut rx) = ScriptedEngine::new(["cat"]);
        let mut session = PracticeSession::new(word("cut"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        pump(&mut session, &mut rx);
        assert!(session.feedback().is_some());

        // Script exhausted: the second attempt reports no speech.
        session.start().await.unwrap();
        assert!(session.feedback().is_none());
        assert!(session.error().is_none());

        pump(&mut session, &mut rx);
        assert_eq!(session.error(), Some(&PronounceError::Recognition(NO_SPEECH_DETECTED.into())));
    }

    #[tokio::test]
    async fn test_result_after_stop_is_not_scored() {
        let (mut engine, mut rx) = ScriptedEngine::new(["cat"]);
        let mut session = PracticeSession::new(word("cut"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        session.stop();
        pump(&mut session, &mut rx);

        assert!(session.feedback().is_none());
        assert_eq!(session.state(), RecognitionState::Idle);
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_empty_transcript_scores_without_tip() {
        let (mut engine, mut rx) = ScriptedEngine::new([""]);
        let mut session = PracticeSession::new(word("cut"), &mut engine, RecognitionOptions::default(), 8);

        session.start().await.unwrap();
        pump(&mut session, &mut rx);

        let feedback = session.feedback().unwrap();
        assert_eq!(feedback.score, 0);
        assert_eq!(feedback.tip, None);
    }
}
