//! Corpus vectorizer.
//!
//! Turns normalized token sequences into a [`Corpus`]: document frequencies,
//! the corpus-specific high-frequency exclusion set, a vocabulary built from
//! the surviving tokens and one sparse vector per document.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::corpus::bow::BagOfWords;
use crate::corpus::vocabulary::{DocumentFrequency, Vocabulary};
use crate::error::{BibliotopicError, Result};

/// Configuration for the corpus vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Tokens found in strictly more than this share of documents are excluded.
    pub high_frequency_ratio: f64,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            high_frequency_ratio: 0.9,
        }
    }
}

impl VectorizerConfig {
    /// Check that the ratio lies in (0, 1].
    pub fn validate(&self) -> Result<()> {
        let ratio = self.high_frequency_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(BibliotopicError::invalid_config(format!(
                "high_frequency_ratio must be in (0, 1], got {ratio}"
            )));
        }
        Ok(())
    }
}

/// Builds a [`Corpus`] from normalized documents.
#[derive(Debug, Clone, Default)]
pub struct CorpusVectorizer {
    config: VectorizerConfig,
}

impl CorpusVectorizer {
    /// Create a vectorizer with the default 0.9 ratio.
    pub fn new() -> Self {
        CorpusVectorizer::default()
    }

    /// Create a vectorizer with a custom configuration.
    pub fn with_config(config: VectorizerConfig) -> Self {
        CorpusVectorizer { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Vectorize `documents`, keeping their order.
    pub fn fit_transform(&self, documents: &[Vec<String>]) -> Corpus {
        let document_frequency = DocumentFrequency::from_documents(documents);
        let excluded = document_frequency.above_ratio(self.config.high_frequency_ratio);

        let tokens: Vec<Vec<String>> = documents
            .iter()
            .map(|document| {
                document
                    .iter()
                    .filter(|token| !excluded.contains(token.as_str()))
                    .cloned()
                    .collect()
            })
            .collect();

        let mut vocabulary = Vocabulary::new();
        let bows: Vec<BagOfWords> = tokens
            .iter()
            .map(|document| {
                let ids: Vec<_> = document.iter().map(|t| vocabulary.intern(t)).collect();
                BagOfWords::from_terms(ids)
            })
            .collect();

        let empty = bows.iter().filter(|bow| bow.is_empty()).count();
        if empty > 0 {
            warn!("{empty} of {} documents have no surviving terms", bows.len());
        }
        if !excluded.is_empty() {
            debug!("Excluded high-frequency terms: {excluded:?}");
        }
        info!(
            "Vectorized {} documents: {} terms, {} excluded",
            bows.len(),
            vocabulary.len(),
            excluded.len()
        );

        Corpus {
            vocabulary,
            document_frequency,
            excluded,
            tokens,
            bows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_high_frequency_terms_are_excluded() {
        // "patient" occurs in all 10 documents (> 9), "study" in exactly 9.
        let mut raw = vec!["patient study vaccine"; 9];
        raw.push("patient climate");
        let corpus = CorpusVectorizer::new().fit_transform(&docs(&raw));

        assert!(corpus.excluded().contains("patient"));
        assert!(!corpus.excluded().contains("study"));
        assert_eq!(corpus.vocabulary().id("patient"), None);
        assert!(corpus.vocabulary().id("study").is_some());

        for token in corpus.excluded() {
            assert!(corpus.document_frequency().get(token) as f64 > 0.9 * 10.0);
        }
        for document in corpus.tokens() {
            assert!(!document.iter().any(|t| t == "patient"));
        }
    }

    #[test]
    fn test_fully_excluded_document_yields_empty_vector() {
        let corpus = CorpusVectorizer::with_config(VectorizerConfig {
            high_frequency_ratio: 0.5,
        })
        .fit_transform(&docs(&["common", "common rare", ""]));

        assert_eq!(corpus.len(), 3);
        assert!(corpus.bows()[0].is_empty());
        assert_eq!(corpus.bows()[1].len(), 1);
        assert!(corpus.bows()[2].is_empty());
        assert_eq!(corpus.non_empty_documents(), 1);
    }

    #[test]
    fn test_vocabulary_in_first_seen_order() {
        let corpus = CorpusVectorizer::with_config(VectorizerConfig {
            high_frequency_ratio: 1.0,
        })
        .fit_transform(&docs(&["trial vaccine trial", "climate vaccine"]));

        let terms: Vec<&str> = corpus.vocabulary().iter().map(|(_, t)| t).collect();
        assert_eq!(terms, vec!["trial", "vaccine", "climate"]);
        assert_eq!(corpus.bows()[0].total(), 3);
    }

    #[test]
    fn test_config_validation() {
        assert!(VectorizerConfig::default().validate().is_ok());
        assert!(
            VectorizerConfig {
                high_frequency_ratio: 0.0
            }
            .validate()
            .is_err()
        );
        assert!(
            VectorizerConfig {
                high_frequency_ratio: 1.5
            }
            .validate()
            .is_err()
        );
    }
}
