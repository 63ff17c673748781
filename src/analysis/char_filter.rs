//! Char filters that rewrite the raw text before tokenization.
//!
//! - [`pattern_replace::PatternReplaceCharFilter`] - Regex-based replacement

/// Trait for character filters that transform text before tokenization.
pub trait CharFilter: Send + Sync {
    /// Apply this filter to the input text and return the rewritten text.
    fn filter(&self, input: &str) -> String;

    /// Get the name of this char filter.
    fn name(&self) -> &'static str;
}

pub mod pattern_replace;
