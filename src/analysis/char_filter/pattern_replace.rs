//! Regex replacement char filter.

use regex::Regex;

use super::CharFilter;
use crate::error::{BibliotopicError, Result};

/// Pattern for numbers that stand alone between word boundaries.
pub const STANDALONE_NUMBER_PATTERN: &str = r"\b\d+\b";

/// Pattern for runs of non-word characters.
pub const NON_WORD_PATTERN: &str = r"\W+";

/// A char filter that replaces every match of a regex pattern.
#[derive(Debug, Clone)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| BibliotopicError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }

    /// Blank out standalone numbers such as `2019` while keeping `covid19`.
    pub fn standalone_numbers() -> Result<Self> {
        Self::new(STANDALONE_NUMBER_PATTERN, " ")
    }

    /// Turn punctuation and other non-word runs into token boundaries.
    pub fn non_word() -> Result<Self> {
        Self::new(NON_WORD_PATTERN, " ")
    }

    /// Get the regex pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}
