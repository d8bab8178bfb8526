//! Pronunciation scoring.
//!
//! Compares the target word against the recognized transcript using a
//! case-insensitive edit distance and maps the result onto a 0-10 scale.

mod distance;

pub use distance::{MAX_SCORE, ScoreBand, score};
