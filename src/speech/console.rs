//! Console speech engine.
//!
//! Stands in for a platform recognizer in the terminal: the user types what
//! was heard and that line becomes the transcript. Reading happens in a
//! spawned task so the practice screen can still stop the attempt (Ctrl+C)
//! or time it out.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::engine::{EVENT_CHANNEL_CAPACITY, NO_SPEECH_DETECTED, RecognitionOptions, SpeechEngine, SpeechEvent};

/// Message sent when the input stream ends during an attempt.
const INPUT_CLOSED: &str = "Input closed";

/// Line reader shared by the screens and the console engine.
pub type SharedInput = Arc<Mutex<Lines<Box<dyn AsyncBufRead + Unpin + Send>>>>;

/// Wrap any async reader in a [`SharedInput`].
pub fn shared_input<R>(reader: R) -> SharedInput
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(BufReader::new(reader));
    Arc::new(Mutex::new(reader.lines()))
}

/// Wrap the process stdin in a [`SharedInput`].
pub fn shared_stdin() -> SharedInput {
    shared_input(tokio::io::stdin())
}

pub struct ConsoleEngine {
    input: SharedInput,                   // Shared stdin line reader
    events_tx: mpsc::Sender<SpeechEvent>, // Event channel to the practice screen
    listen_timeout: Duration,             // Give up after this long without input
    permission_granted: bool,             // Remembered for the rest of the process
    cancel: Option<CancellationToken>,    // Cancels the in-flight attempt
}

impl ConsoleEngine {
    /// Create a console engine reading transcripts from `input`.
    ///
    /// # Arguments
    /// * `input` - Shared stdin reader
    /// * `listen_timeout` - How long an attempt waits for a line
    /// * `assume_permission` - Skip the permission prompt
    ///
    /// # Returns
    /// A tuple of (ConsoleEngine, event receiver channel)
    pub fn new(input: SharedInput, listen_timeout: Duration, assume_permission: bool) -> (Self, mpsc::Receiver<SpeechEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let engine = Self { input, events_tx, listen_timeout, permission_granted: assume_permission, cancel: None };
        (engine, events_rx)
    }

    fn is_listening(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| !token.is_cancelled())
    }
}

/// Interpret a y/n answer; an empty answer means yes.
fn parse_consent(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer == "y" || answer == "yes"
}

impl SpeechEngine for ConsoleEngine {
    async fn request_permission(&mut self) -> bool {
        if self.permission_granted {
            return true;
        }

        print!("Allow microphone and speech recognition access? [Y/n] ");
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush stdout: {}", e);
        }

        let answer = self.input.lock().await.next_line().await;
        self.permission_granted = match answer {
            Ok(Some(line)) => parse_consent(&line),
            Ok(None) => false,
            Err(e) => {
                warn!("Failed to read permission answer: {}", e);
                false
            }
        };

        info!("Speech permission {}", if self.permission_granted { "granted" } else { "denied" });
        self.permission_granted
    }

    fn start(&mut self, options: &RecognitionOptions) -> Result<()> {
        if self.is_listening() {
            anyhow::bail!("Recognition already in progress");
        }

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let input = self.input.clone();
        let events_tx = self.events_tx.clone();
        let listen_timeout = self.listen_timeout;
        let locale = options.locale.clone();

        tokio::spawn(async move {
            if let Err(e) = events_tx.send(SpeechEvent::Start).await {
                debug!("Failed to send speech event: {}", e);
            }
            println!("🎤 Listening ({}). Type what you said, Ctrl+C to stop:", locale);

            let read_line = async { input.lock().await.next_line().await };
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!("Console recognition cancelled");
                    None
                }
                line = tokio::time::timeout(listen_timeout, read_line) => Some(match line {
                    Ok(Ok(Some(text))) => SpeechEvent::Result(text.trim().to_string()),
                    Ok(Ok(None)) => SpeechEvent::Error(INPUT_CLOSED.to_string()),
                    Ok(Err(e)) => SpeechEvent::Error(format!("Failed to read input: {}", e)),
                    Err(_) => SpeechEvent::Error(NO_SPEECH_DETECTED.to_string()),
                }),
            };

            if let Some(event) = outcome
                && let Err(e) = events_tx.send(event).await
            {
                debug!("Failed to send speech event: {}", e);
            }
            token.cancel();
            if let Err(e) = events_tx.send(SpeechEvent::End).await {
                debug!("Failed to send speech event: {}", e);
            }
        });

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

impl Drop for ConsoleEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
