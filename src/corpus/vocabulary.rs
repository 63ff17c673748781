//! Term vocabulary and document frequency table.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of a term within one vocabulary.
///
/// Ids are only meaningful inside the run that built the vocabulary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TermId(pub u32);

impl TermId {
    /// The id as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bidirectional mapping between terms and term ids.
///
/// Ids are handed out densely in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    term_to_id: AHashMap<String, TermId>,
    id_to_term: Vec<String>,
}

impl Vocabulary {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Vocabulary::default()
    }

    /// Return the id of `term`, inserting it if unseen.
    pub fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.term_to_id.get(term) {
            return id;
        }

        let id = TermId(self.id_to_term.len() as u32);
        self.term_to_id.insert(term.to_string(), id);
        self.id_to_term.push(term.to_string());
        id
    }

    /// Look up the id of a term.
    pub fn id(&self, term: &str) -> Option<TermId> {
        self.term_to_id.get(term).copied()
    }

    /// Look up the term of an id.
    pub fn term(&self, id: TermId) -> Option<&str> {
        self.id_to_term.get(id.index()).map(String::as_str)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.id_to_term.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_term.is_empty()
    }

    /// Iterate over `(id, term)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.id_to_term
            .iter()
            .enumerate()
            .map(|(i, term)| (TermId(i as u32), term.as_str()))
    }
}

/// Number of documents containing each term.
#[derive(Debug, Clone, Default)]
pub struct DocumentFrequency {
    counts: AHashMap<String, usize>,
    num_docs: usize,
}

impl DocumentFrequency {
    /// Count, for every term, the distinct documents that contain it.
    pub fn from_documents(documents: &[Vec<String>]) -> Self {
        let mut counts: AHashMap<String, usize> = AHashMap::new();

        for document in documents {
            let unique: BTreeSet<&str> = document.iter().map(String::as_str).collect();
            for term in unique {
                *counts.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        DocumentFrequency {
            counts,
            num_docs: documents.len(),
        }
    }

    /// Document frequency of a term (0 when unseen).
    pub fn get(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Number of documents that were counted.
    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no term was seen.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Terms whose document frequency is strictly above `ratio * num_docs`.
    pub fn above_ratio(&self, ratio: f64) -> BTreeSet<String> {
        let threshold = ratio * self.num_docs as f64;
        self.counts
            .iter()
            .filter(|(_, df)| **df as f64 > threshold)
            .map(|(term, _)| term.clone())
            .collect()
    }
}
