//! Corpus construction: vocabulary, document frequencies and bag-of-words
//! vectors for one topic discovery run.

pub mod bow;
pub mod vectorizer;
pub mod vocabulary;

use std::collections::BTreeSet;

pub use bow::BagOfWords;
pub use vectorizer::{CorpusVectorizer, VectorizerConfig};
pub use vocabulary::{DocumentFrequency, TermId, Vocabulary};

/// A vectorized corpus.
///
/// `tokens` and `bows` are parallel to the input documents. Term ids are
/// scoped to this corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) document_frequency: DocumentFrequency,
    pub(crate) excluded: BTreeSet<String>,
    pub(crate) tokens: Vec<Vec<String>>,
    pub(crate) bows: Vec<BagOfWords>,
}

impl Corpus {
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Document frequencies over the unfiltered tokens.
    pub fn document_frequency(&self) -> &DocumentFrequency {
        &self.document_frequency
    }

    /// The high-frequency exclusion set.
    pub fn excluded(&self) -> &BTreeSet<String> {
        &self.excluded
    }

    /// Token sequences with excluded terms removed.
    pub fn tokens(&self) -> &[Vec<String>] {
        &self.tokens
    }

    pub fn bows(&self) -> &[BagOfWords] {
        &self.bows
    }

    /// Number of documents, empty ones included.
    pub fn len(&self) -> usize {
        self.bows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bows.is_empty()
    }

    /// Number of documents with at least one surviving term.
    pub fn non_empty_documents(&self) -> usize {
        self.bows.iter().filter(|bow| !bow.is_empty()).count()
    }
}
