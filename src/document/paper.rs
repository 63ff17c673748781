//! Paper record.

use serde::{Deserialize, Serialize};

use crate::document::PaperId;
use crate::topic::TopicId;

/// A bibliographic record.
///
/// Everything except `topic` is fixed once the paper is stored; `topic` is
/// rewritten wholesale by each topic discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Record store identifier
    pub id: PaperId,
    /// Title, matched by the boolean query language
    pub title: String,
    /// Abstract text; papers without one still exist but carry no terms
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Publication year
    #[serde(default)]
    pub year: Option<i32>,
    /// Digital object identifier
    #[serde(default)]
    pub doi: Option<String>,
    /// Authors in publication order
    #[serde(default)]
    pub authors: Vec<String>,
    /// Journal name
    #[serde(default)]
    pub journal: Option<String>,
    /// Journal impact factor or other quality score
    #[serde(default)]
    pub factor: Option<f64>,
    /// Citation count
    #[serde(default)]
    pub citations: Option<u32>,
    /// PubMed identifier
    #[serde(default)]
    pub pmid: Option<u64>,
    /// Category tag names
    #[serde(default)]
    pub categories: Vec<String>,
    /// Dominant topic from the latest discovery run
    #[serde(default)]
    pub topic: Option<TopicId>,
}

impl Paper {
    /// Create a paper with only an id and a title.
    pub fn new<S: Into<String>>(id: PaperId, title: S) -> Self {
        Paper {
            id,
            title: title.into(),
            abstract_text: None,
            year: None,
            doi: None,
            authors: Vec::new(),
            journal: None,
            factor: None,
            citations: None,
            pmid: None,
            categories: Vec::new(),
            topic: None,
        }
    }

    /// Set the abstract.
    pub fn with_abstract<S: Into<String>>(mut self, abstract_text: S) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    /// Set the publication year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set the DOI.
    pub fn with_doi<S: Into<String>>(mut self, doi: S) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Set the author list.
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the journal and its impact factor.
    pub fn with_journal<S: Into<String>>(mut self, journal: S, factor: Option<f64>) -> Self {
        self.journal = Some(journal.into());
        self.factor = factor;
        self
    }

    /// Set the category tags.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// The abstract as an optional string slice.
    pub fn abstract_str(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    /// Case-insensitive substring match against the title.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}
