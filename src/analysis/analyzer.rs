//! Analyzers that combine char filters, a tokenizer and token filters.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream
//!             ↓
//!         Char Filters
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! - [`PipelineAnalyzer`] - Custom char filter, tokenizer and filter chains
//! - [`TextNormalizer`] - The abstract normalization used for topic discovery

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so an analyzer can be shared by the
/// worker threads of the topic discovery pipeline.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod normalizer;
pub mod pipeline;

pub use normalizer::TextNormalizer;
pub use pipeline::PipelineAnalyzer;
