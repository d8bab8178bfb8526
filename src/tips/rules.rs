//! Ordered tip rules.
//!
//! Rules are evaluated top to bottom and the first match wins. Specific vowel
//! and consonant confusions come before the generic start/length checks, and
//! the table always ends with a catch-all.

use serde::{Deserialize, Serialize};

/// A single improvement hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tip {
    /// "kit" heard as "keet"
    ShortIVowel,
    /// "cut" heard as "cat"
    UhVowel,
    /// "cap" heard as "cup"
    ShortAVowel,
    /// Dropped final 'd'
    FinalD,
    /// Dropped final 't'
    FinalT,
    /// "dr" heard as "gr"
    InitialDr,
    /// Wrong first sound
    InitialSound,
    /// Too many or too few syllables
    SyllableCount,
    /// Catch-all
    ListenCarefully,
}

impl Tip {
    /// Human-readable hint shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Tip::ShortIVowel => "Try to make the 'i' sound short, like in 'sit'.",
            Tip::UhVowel => "The 'u' in 'cut' is like 'uh', not 'a' as in 'cat'.",
            Tip::ShortAVowel => "The 'a' in 'cap' is a short, open sound, not 'uh'.",
            Tip::FinalD => "Make sure to pronounce the ending 'd' sound.",
            Tip::FinalT => "Try to finish with a clear 't' sound at the end.",
            Tip::InitialDr => "Start with a 'd' sound, not 'g'.",
            Tip::InitialSound => "Try to start the word with the correct sound.",
            Tip::SyllableCount => "Try to match the number of syllables in the word.",
            Tip::ListenCarefully => "Listen carefully to the word and try to match each sound.",
        }
    }
}

impl std::fmt::Display for Tip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Lower-cased word/transcript pair the rules are evaluated against.
struct Attempt {
    word: String,
    heard: String,
}

/// One row of the rule table.
struct TipRule {
    tip: Tip,
    matches: fn(&Attempt) -> bool,
}

const SHORT_I_WORDS: &[&str] = &["kit", "kid", "kick"];
const UH_WORDS: &[&str] = &["cut", "cup"];
const SHORT_A_WORDS: &[&str] = &["cap", "cat"];

/// Words longer than this get the syllable-count check.
const SYLLABLE_CHECK_MIN_LEN: usize = 4;

/// Length difference (in characters) that counts as a syllable mismatch.
const SYLLABLE_LEN_TOLERANCE: usize = 2;

/// Evaluation order is priority order.
const RULES: &[TipRule] = &[
    TipRule { tip: Tip::ShortIVowel, matches: |a| SHORT_I_WORDS.contains(&a.word.as_str()) && a.heard.contains("keet") },
    TipRule { tip: Tip::UhVowel, matches: |a| UH_WORDS.contains(&a.word.as_str()) && a.heard.contains("cat") },
    TipRule { tip: Tip::ShortAVowel, matches: |a| SHORT_A_WORDS.contains(&a.word.as_str()) && a.heard.contains("cup") },
    TipRule { tip: Tip::FinalD, matches: |a| a.word.ends_with('d') && !a.heard.ends_with('d') },
    TipRule { tip: Tip::FinalT, matches: |a| a.word.ends_with('t') && !a.heard.ends_with('t') },
    TipRule { tip: Tip::InitialDr, matches: |a| a.word.starts_with("dr") && a.heard.starts_with("gr") },
    TipRule { tip: Tip::InitialSound, matches: |a| a.heard.chars().next() != a.word.chars().next() },
    TipRule { tip: Tip::SyllableCount, matches: syllable_mismatch },
    TipRule { tip: Tip::ListenCarefully, matches: |_| true },
];

fn syllable_mismatch(a: &Attempt) -> bool {
    let word_len = a.word.chars().count();
    let heard_len = a.heard.chars().count();
    word_len > SYLLABLE_CHECK_MIN_LEN && heard_len > 0 && word_len.abs_diff(heard_len) > SYLLABLE_LEN_TOLERANCE
}

/// Pick a tip for the given attempt.
///
/// Returns `None` when either the word or the transcript is empty. Otherwise
/// some tip is always returned, including for a perfect match; callers decide
/// whether the score warrants showing it.
pub fn select_tip(word: &str, transcript: &str) -> Option<Tip> {
    if word.is_empty() || transcript.is_empty() {
        return None;
    }

    let attempt = Attempt { word: word.to_lowercase(), heard: transcript.to_lowercase() };
    RULES.iter().find(|rule| (rule.matches)(&attempt)).map(|rule| rule.tip)
}
