//! Rule-based pronunciation tips.
//!
//! Looks at the target word and what the recognizer heard and picks a single
//! hint from an ordered rule table.

mod rules;

pub use rules::{Tip, select_tip};
