//! Edit distance and the 0-10 similarity score derived from it.

use serde::{Deserialize, Serialize};

/// Highest possible score (perfect match).
pub const MAX_SCORE: u8 = 10;

/// Lowest score still considered a good pronunciation.
const GOOD_THRESHOLD: u8 = 8;

/// Lowest score considered a fair attempt.
const FAIR_THRESHOLD: u8 = 5;

/// Coarse quality band for a score, used when rendering feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// 8-10
    Good,
    /// 5-7
    Fair,
    /// 0-4
    Poor,
}

impl ScoreBand {
    /// Classify a score.
    pub fn from_score(score: u8) -> Self {
        if score >= GOOD_THRESHOLD {
            ScoreBand::Good
        } else if score >= FAIR_THRESHOLD {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreBand::Good => write!(f, "good"),
            ScoreBand::Fair => write!(f, "fair"),
            ScoreBand::Poor => write!(f, "poor"),
        }
    }
}

/// Compare two characters ignoring case.
///
/// Lowercasing per character keeps lengths in terms of the original
/// characters, even for characters whose lowercase form expands.
fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Levenshtein distance between two strings, case-insensitive.
///
/// Insertions, deletions and substitutions each cost 1.
/// Uses two rows of the DP table, O(min(m, n)) memory.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, &lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &sc) in short.iter().enumerate() {
            let cost = if chars_match(lc, sc) { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Score a transcript against the target word on a 0-10 scale.
///
/// `10` means identical (ignoring case); `0` means nothing in common.
/// Total over all inputs: two empty strings score 10.
pub fn score(word: &str, transcript: &str) -> u8 {
    let distance = edit_distance(word, transcript);
    let max_len = word.chars().count().max(transcript.chars().count()).max(1);

    let raw = (1.0 - distance as f64 / max_len as f64).max(0.0);
    (raw * f64::from(MAX_SCORE)).round() as u8
}
