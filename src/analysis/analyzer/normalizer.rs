//! Abstract normalization for topic discovery.
//!
//! # Pipeline
//!
//! 1. PatternReplaceCharFilter (standalone numbers → space)
//! 2. PatternReplaceCharFilter (non-word runs → space)
//! 3. WhitespaceTokenizer
//! 4. LowercaseFilter
//! 5. StopFilter (English list)
//! 6. LemmaFilter (dictionary noun lemmas)
//!
//! Lowercasing after tokenization yields the same terms as lowercasing the
//! raw text first, since neither pattern depends on letter case.
//!
//! # Examples
//!
//! ```
//! use bibliotopic::analysis::analyzer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new().unwrap();
//! let terms = normalizer.normalize(Some("The 2 vaccine trials, in 2021.")).unwrap();
//! assert_eq!(terms, vec!["vaccine", "trial"]);
//!
//! assert!(normalizer.normalize(None).unwrap().is_empty());
//! ```

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lemma::LemmaFilter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Turns raw abstracts into lemmatized, stop-word-free terms.
#[derive(Clone)]
pub struct TextNormalizer {
    inner: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Create the normalizer with the default English pipeline.
    pub fn new() -> Result<Self> {
        Self::with_stop_filter(StopFilter::new())
    }

    /// Create the normalizer with a custom stop word filter.
    pub fn with_stop_filter(stop_filter: StopFilter) -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::standalone_numbers()?))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::non_word()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(stop_filter))
            .add_filter(Arc::new(LemmaFilter::new()))
            .with_name("abstract");

        Ok(Self { inner: analyzer })
    }

    /// Normalize an optional abstract into its terms.
    ///
    /// Absent and empty text both produce an empty vector. Calling this again
    /// on the same text reproduces the same sequence.
    pub fn normalize(&self, text: Option<&str>) -> Result<Vec<String>> {
        match text {
            Some(text) if !text.trim().is_empty() => {
                Ok(self.inner.analyze(text)?.map(|token| token.text).collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Lazily stream the normalized tokens of `text` with their offsets.
    pub fn token_stream(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    /// Normalize every text of a corpus, preserving order.
    pub fn normalize_all<'a, I>(&self, texts: I) -> Result<Vec<Vec<String>>>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        texts.into_iter().map(|text| self.normalize(text)).collect()
    }
}

impl Analyzer for TextNormalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "abstract"
    }
}

impl Debug for TextNormalizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("inner", &self.inner)
            .finish()
    }
}
