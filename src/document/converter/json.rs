//! JSON and JSONL paper converter.
//!
//! A file whose first non-blank character is `[` is read as one JSON array;
//! anything else is read as JSON Lines, one record per non-blank line:
//!
//! ```jsonl
//! {"title": "Vaccine efficacy", "abstract": "...", "year": 2021}
//! {"title": "Climate policy", "abstract": "...", "year": 2019}
//! ```

use std::fs;
use std::path::Path;

use crate::document::converter::{PaperConverter, PaperRecord};
use crate::error::{BibliotopicError, Result};

/// A paper converter for JSON arrays and JSON Lines.
#[derive(Debug, Clone, Default)]
pub struct JsonPaperConverter;

impl JsonPaperConverter {
    /// Create a new converter.
    pub fn new() -> Self {
        JsonPaperConverter
    }

    /// Parse records from an in-memory string.
    pub fn parse_str(&self, content: &str) -> Result<Vec<PaperRecord>> {
        if content.trim_start().starts_with('[') {
            return Ok(serde_json::from_str(content)?);
        }

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(line_num, line)| {
                serde_json::from_str(line).map_err(|e| {
                    BibliotopicError::storage(format!(
                        "Failed to parse record on line {}: {e}",
                        line_num + 1
                    ))
                })
            })
            .collect()
    }
}

impl PaperConverter for JsonPaperConverter {
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PaperRecord>> {
        let content = fs::read_to_string(path.as_ref())?;
        self.parse_str(&content)
    }
}
