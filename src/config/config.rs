//! Application configuration and CLI argument parsing.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scoring::MAX_SCORE;
use crate::speech::RecognitionOptions;

/// Pronunciation practice configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "howtopronounce")]
#[command(author, version, about = "Speak a word and get a pronunciation score with a tip to improve", long_about = None)]
pub struct AppConfig {
    /// Word to practice (skips the entry screen's first prompt)
    #[arg(long, short = 'w')]
    pub word: Option<String>,

    /// Transcript to replay instead of listening; repeat for several attempts.
    /// Runs non-interactively and requires --word
    #[arg(long = "transcript", short = 't')]
    pub transcripts: Vec<String>,

    /// Recognition locale
    #[arg(long, short = 'l', env = "HOWTOPRONOUNCE_LOCALE", default_value = "en-US")]
    pub locale: String,

    /// Show a tip when the score is below this value (0-10)
    #[arg(long, env = "HOWTOPRONOUNCE_TIP_THRESHOLD", default_value = "8", value_parser = parse_tip_threshold)]
    pub tip_threshold: u8,

    /// Seconds to wait for speech before giving up
    #[arg(long, default_value = "30")]
    pub listen_timeout_secs: u64,

    /// Grant microphone and speech permission without asking
    #[arg(long, short = 'y')]
    pub assume_permission: bool,

    /// Refuse speech permission (replayed transcripts only)
    #[arg(long, requires = "transcripts")]
    pub deny_permission: bool,

    /// Make every replayed attempt fail with this recognition error
    #[arg(long, value_name = "MESSAGE", requires = "transcripts")]
    pub engine_error: Option<String>,

    /// Print replayed feedback as JSON lines
    #[arg(long, requires = "transcripts")]
    pub json: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Whether transcripts are replayed instead of read interactively.
    pub fn is_scripted(&self) -> bool {
        !self.transcripts.is_empty()
    }

    /// Options passed to the speech engine on every attempt.
    pub fn recognition_options(&self) -> RecognitionOptions {
        RecognitionOptions::single_shot(self.locale.trim())
    }

    pub fn listen_timeout(&self) -> Duration {
        Duration::from_secs(self.listen_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            anyhow::bail!("Locale must not be empty");
        }

        if self.listen_timeout_secs == 0 {
            anyhow::bail!("Listen timeout must be at least 1 second");
        }

        if self.tip_threshold > MAX_SCORE {
            anyhow::bail!("Tip threshold must be between 0 and {}", MAX_SCORE);
        }

        if self.is_scripted() && self.word.is_none() {
            anyhow::bail!("--transcript requires --word");
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        if let Some(ref word) = self.word {
            info!("  Word: {}", word);
        }
        info!("  Locale: {}", self.locale);
        info!("  Tip threshold: {}", self.tip_threshold);
        if self.is_scripted() {
            info!("  Replaying {} transcript(s)", self.transcripts.len());
        } else {
            info!("  Listen timeout: {}s", self.listen_timeout_secs);
        }
    }
}

/// Parse and validate the tip threshold (0-10).
fn parse_tip_threshold(s: &str) -> Result<u8, String> {
    let value: u8 = s.parse().map_err(|_| format!("'{}' is not a valid score", s))?;
    if value <= MAX_SCORE {
        Ok(value)
    } else {
        Err(format!("tip threshold must be between 0 and {}, got {}", MAX_SCORE, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::try_parse_from(["howtopronounce"]).unwrap();
        assert_eq!(config.tip_threshold, 8);
        assert_eq!(config.listen_timeout(), Duration::from_secs(30));
        assert!(!config.is_scripted());
        assert_eq!(config.recognition_options(), RecognitionOptions::single_shot("en-US"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_repeated_transcripts() {
        let config = AppConfig::try_parse_from(["howtopronounce", "-w", "cut", "-t", "cat", "-t", "cut", "--json"]).unwrap();
        assert_eq!(config.transcripts, vec!["cat", "cut"]);
        assert!(config.is_scripted());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_transcripts_require_word() {
        let config = AppConfig::try_parse_from(["howtopronounce", "-t", "cat"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tip_threshold_range() {
        assert!(AppConfig::try_parse_from(["howtopronounce", "--tip-threshold", "11"]).is_err());
        assert!(AppConfig::try_parse_from(["howtopronounce", "--tip-threshold", "x"]).is_err());
        let config = AppConfig::try_parse_from(["howtopronounce", "--tip-threshold", "10"]).unwrap();
        assert_eq!(config.tip_threshold, 10);
    }

    #[test]
    fn test_json_requires_transcripts() {
        assert!(AppConfig::try_parse_from(["howtopronounce", "--json"]).is_err());
    }

    #[test]
    fn test_engine_error_requires_transcripts() {
        assert!(AppConfig::try_parse_from(["howtopronounce", "--engine-error", "busy"]).is_err());
        let config = AppConfig::try_parse_from(["howtopronounce", "-w", "cat", "-t", "cat", "--engine-error", "busy"]).unwrap();
        assert_eq!(config.engine_error.as_deref(), Some("busy"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AppConfig::try_parse_from(["howtopronounce", "--listen-timeout-secs", "0"]).unwrap();
        assert!(config.validate().is_err());
    }
}
