//! Entry screen: choosing the word to practice.

use serde::{Deserialize, Serialize};

use crate::error::PronounceError;

/// A validated target word, kept exactly as typed.
///
/// Surrounding whitespace only matters for validation; scoring sees the
/// word as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate what the user typed on the entry screen.
///
/// # Errors
/// Returns [`PronounceError::EmptyWord`] for blank or whitespace-only input.
pub fn validate_word(input: &str) -> Result<Word, PronounceError> {
    if input.trim().is_empty() {
        return Err(PronounceError::EmptyWord);
    }
    Ok(Word(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_rejected() {
        assert_eq!(validate_word(""), Err(PronounceError::EmptyWord));
        assert_eq!(validate_word("   \t\n"), Err(PronounceError::EmptyWord));
    }

    #[test]
    fn test_word_is_kept_as_typed() {
        let word = validate_word(" amend ").unwrap();
        assert_eq!(word.as_str(), " amend ");
        assert_eq!(word.to_string(), " amend ");
    }
}
