//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows from the tokenizer through every token
//! filter. Filters either rewrite `text`, mark the token stopped, or drop it.
//!
//! # Examples
//!
//! ```
//! use bibliotopic::analysis::token::Token;
//!
//! let token = Token::with_offsets("vaccines", 0, 4, 12);
//! assert_eq!(token.text, "vaccines");
//! assert_eq!(token.start_offset, 4);
//!
//! let lemma = token.with_text("vaccine");
//! assert_eq!(lemma.original_text.as_deref(), Some("vaccines"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// Byte offset where this token starts in the filtered text
    pub start_offset: usize,

    /// Byte offset where this token ends in the filtered text
    pub end_offset: usize,

    /// Whether this token has been marked as stopped by a filter
    pub stopped: bool,

    /// The text before the first rewrite, if any filter changed it
    pub original_text: Option<String>,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            stopped: false,
            original_text: None,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
            original_text: None,
        }
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Replace the text, remembering the first original form.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        let text = text.into();
        if text != self.text && self.original_text.is_none() {
            self.original_text = Some(std::mem::take(&mut self.text));
        }
        self.text = text;
        self
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;
