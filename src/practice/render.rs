//! Text rendering for the practice screen.

use std::fmt::Write;

use anyhow::{Context, Result};

use super::session::{Feedback, PracticeSession};
use crate::scoring::{MAX_SCORE, ScoreBand};
use crate::speech::SpeechEngine;

fn band_marker(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Good => "🟢",
        ScoreBand::Fair => "🟡",
        ScoreBand::Poor => "🔴",
    }
}

/// Render the outcome of the latest attempt: feedback, inline error, or both.
pub fn render_attempt<E: SpeechEngine>(session: &PracticeSession<'_, E>) -> String {
    let mut out = String::new();

    if let Some(feedback) = session.feedback() {
        if feedback.transcript.is_empty() {
            out.push_str("Nothing was heard. Try again.\n");
        } else {
            let _ = writeln!(out, "You said: {}", feedback.transcript);
            let _ = writeln!(out, "{} Score: {}/{} ({})", band_marker(feedback.band), feedback.score, MAX_SCORE, feedback.band);
            if let Some(tip) = feedback.tip {
                let _ = writeln!(out, "💡 Tip to improve: {}", tip);
            }
        }
    }

    if let Some(error) = session.error() {
        let _ = writeln!(out, "❌ {}", error);
    }

    out
}

/// Render feedback as a single JSON line.
pub fn render_feedback_json(feedback: &Feedback) -> Result<String> {
    serde_json::to_string(feedback).context("Failed to serialize feedback")
}
