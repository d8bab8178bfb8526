//! HowToPronounce - pronunciation practice in the terminal.
//!
//! Type a word, say it, and get a 0-10 score for how close the recognized
//! transcript was, plus a tip when the score is low. Speech recognition is a
//! pluggable engine: the console engine takes the transcript from the
//! keyboard, the scripted engine replays transcripts given on the command line.

mod config;
mod error;
mod practice;
mod scoring;
mod speech;
mod tips;

use std::io::Write;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use config::AppConfig;
use practice::{PracticeSession, Route, Router, Word, render_attempt, render_feedback_json, validate_word};
use speech::{ConsoleEngine, ScriptedEngine, SharedInput, SpeechEngine, SpeechEvent};

/// What the user chose to do on the practice screen.
enum PracticeExit {
    AnotherWord,
    Quit,
}

/// Print a prompt and read one line.
///
/// Returns `None` on end of input or Ctrl+C.
async fn prompt(input: &SharedInput, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut lines = input.lock().await;
    tokio::select! {
        line = lines.next_line() => line.context("Failed to read from stdin"),
        _ = signal::ctrl_c() => {
            println!();
            Ok(None)
        }
    }
}

/// Run one attempt to completion: start, feed events until the engine's `End`.
///
/// Ctrl+C while listening stops the attempt instead of quitting.
async fn run_attempt<E: SpeechEngine>(session: &mut PracticeSession<'_, E>, events_rx: &mut mpsc::Receiver<SpeechEvent>) -> Result<()> {
    if session.start().await.is_err() {
        // Error is kept on the session and rendered inline.
        return Ok(());
    }

    while session.is_active() {
        tokio::select! {
            event = events_rx.recv() => {
                let event = event.context("Speech engine event channel closed")?;
                debug!("Speech event: {:?}", event);
                session.handle_event(event);
                debug!("Recognition state: {:?}", session.state());
            }
            _ = signal::ctrl_c(), if !session.is_cancelled() => {
                session.stop();
            }
        }
    }

    Ok(())
}

/// Entry screen: ask for a word until a valid one is given.
async fn entry_screen(input: &SharedInput, prefill: Option<String>) -> Result<Option<Word>> {
    println!();
    println!("HowToPronounce");

    let mut pending = prefill;
    loop {
        let text = match pending.take() {
            Some(text) => text,
            None => match prompt(input, "Enter a word to practice (e.g. cut, kit, amend): ").await? {
                Some(text) => text,
                None => return Ok(None),
            },
        };

        match validate_word(&text) {
            Ok(word) => return Ok(Some(word)),
            Err(e) => println!("❌ {}", e),
        }
    }
}

/// Practice screen: repeated attempts at one word.
async fn practice_screen(
    word: Word,
    config: &AppConfig,
    input: &SharedInput,
    engine: &mut ConsoleEngine,
    events_rx: &mut mpsc::Receiver<SpeechEvent>,
) -> Result<PracticeExit> {
    let mut session = PracticeSession::new(word, engine, config.recognition_options(), config.tip_threshold);

    println!();
    println!("Pronounce the word: {}", session.word());

    loop {
        let command = match prompt(input, "[Enter] speak  [n] another word  [q] quit: ").await? {
            Some(command) => command,
            None => return Ok(PracticeExit::Quit),
        };

        match command.trim().to_lowercase().as_str() {
            "" | "s" => {
                run_attempt(&mut session, events_rx).await?;
                print!("{}", render_attempt(&session));
            }
            "n" => return Ok(PracticeExit::AnotherWord),
            "q" => return Ok(PracticeExit::Quit),
            other => println!("Unknown command '{}'", other),
        }
    }
}

/// Interactive two-screen loop using the console engine.
async fn run_interactive(config: &AppConfig) -> Result<()> {
    let input = speech::shared_stdin();
    let (mut engine, mut events_rx) = ConsoleEngine::new(input.clone(), config.listen_timeout(), config.assume_permission);

    let mut router = Router::new();
    let mut prefill = config.word.clone();

    loop {
        let next = match router.current().clone() {
            Route::Entry => match entry_screen(&input, prefill.take()).await? {
                Some(word) => Route::Practice { word },
                None => break,
            },
            Route::Practice { word } => match practice_screen(word, config, &input, &mut engine, &mut events_rx).await? {
                PracticeExit::AnotherWord => Route::Entry,
                PracticeExit::Quit => break,
            },
        };
        router.replace(next);
    }

    Ok(())
}

/// Replay `--transcript` values against `--word`, one attempt each.
async fn run_scripted(config: &AppConfig) -> Result<()> {
    let word = validate_word(config.word.as_deref().unwrap_or_default())?;
    let (engine, mut events_rx) = ScriptedEngine::new(config.transcripts.iter().cloned());
    let mut engine = engine.with_permission(!config.deny_permission);
    if let Some(ref message) = config.engine_error {
        engine = engine.with_failure(message.as_str());
    }

    let mut session = PracticeSession::new(word, &mut engine, config.recognition_options(), config.tip_threshold);

    for _ in 0..config.transcripts.len() {
        run_attempt(&mut session, &mut events_rx).await?;

        if config.json {
            if let Some(feedback) = session.feedback() {
                println!("{}", render_feedback_json(feedback)?);
            } else if let Some(e) = session.error() {
                println!("{}", serde_json::json!({ "error": e.to_string() }));
            }
        } else {
            print!("{}", render_attempt(&session));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info.
    // Logs go to stderr so the screens on stdout stay readable.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🎤 HowToPronounce v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {}", e);
        std::process::exit(2);
    }
    config.log_config();

    let result = if config.is_scripted() { run_scripted(&config).await } else { run_interactive(&config).await };

    if let Err(ref e) = result {
        error!("❌ {:#}", e);
    } else {
        info!("👋 Bye");
    }
    result
}
