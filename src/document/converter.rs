//! Paper record import.
//!
//! Raw records come from spreadsheet exports where authors are a single
//! comma-separated string and categories are `|`-separated subject lists.
//! [`PaperRecord`] accepts both the cleaned and the raw shapes and
//! [`PaperRecord::into_paper`] normalizes them.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{Paper, PaperId};
use crate::error::Result;

pub mod json;

/// A trait for converting files into paper records.
pub trait PaperConverter {
    /// Read every record of the file at `path`.
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PaperRecord>>;
}

/// Authors given either as a list or as one comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorsField {
    List(Vec<String>),
    Text(String),
}

/// One imported paper before it receives a record store id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(alias = "title_e")]
    pub title: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Option<AuthorsField>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub factor: Option<f64>,
    #[serde(default, alias = "number_citations")]
    pub citations: Option<u32>,
    #[serde(default)]
    pub pmid: Option<u64>,
    #[serde(default, alias = "assigned_subjects1")]
    pub categories: Option<String>,
}

impl PaperRecord {
    /// Build the stored paper, cleaning authors and categories.
    pub fn into_paper(self, id: PaperId) -> Paper {
        let authors = match self.authors {
            Some(AuthorsField::List(list)) => list
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            Some(AuthorsField::Text(text)) => clean_authors(&text),
            None => Vec::new(),
        };

        Paper {
            id,
            title: self.title,
            abstract_text: self.abstract_text.filter(|a| !a.trim().is_empty()),
            year: self.year,
            doi: self.doi.filter(|d| !d.trim().is_empty()),
            authors,
            journal: self.journal,
            factor: self.factor,
            citations: self.citations,
            pmid: self.pmid,
            categories: self
                .categories
                .as_deref()
                .map(clean_categories)
                .unwrap_or_default(),
            topic: None,
        }
    }
}

/// Split a comma-separated author string, dropping trailing separators.
pub fn clean_authors(authors: &str) -> Vec<String> {
    let mut trimmed = authors.trim();
    while let Some(rest) = trimmed.strip_suffix(',') {
        trimmed = rest.trim_end();
    }

    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split(", ")
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Split a `|`-separated subject string into distinct, sorted tag names.
pub fn clean_categories(categories: &str) -> Vec<String> {
    categories
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
