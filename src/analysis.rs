//! Text analysis module for Bibliotopic.
//!
//! Abstracts pass through a small analysis pipeline before they reach the
//! corpus vectorizer:
//!
//! ```text
//! Raw Text → Char Filters → Tokenizer → Token Filters → Terms
//! ```
//!
//! [`analyzer::TextNormalizer`] wires the default pipeline used for topic
//! discovery.

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, TextNormalizer};
pub use token::{Token, TokenStream};
