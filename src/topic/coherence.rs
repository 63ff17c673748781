//! NPMI topic coherence.
//!
//! Word occurrence is counted over boolean segments of the token sequences:
//! either whole documents or sliding windows of a fixed size. For two words
//! the normalized pointwise mutual information is
//!
//! ```text
//! npmi(a, b) = log((p(a, b) + eps) / (p(a) * p(b))) / -log(p(a, b) + eps)
//! ```
//!
//! A topic scores the mean NPMI of all pairs among its top words and a model
//! scores the mean over its topics.

use ahash::{AHashMap, AHashSet};

use crate::corpus::Corpus;
use crate::topic::config::CoherenceConfig;
use crate::topic::lda::LdaModel;

const EPSILON: f64 = 1e-12;

/// Occurrence statistics for NPMI scoring.
#[derive(Debug, Clone)]
pub struct NpmiCoherence {
    segments: Vec<AHashSet<String>>,
    occurrences: AHashMap<String, usize>,
}

impl NpmiCoherence {
    /// Collect segments from the token sequences.
    ///
    /// Documents without tokens contribute no segment.
    pub fn new(documents: &[Vec<String>], window_size: Option<usize>) -> Self {
        let mut segments: Vec<AHashSet<String>> = Vec::new();

        for document in documents.iter().filter(|d| !d.is_empty()) {
            match window_size {
                Some(size) if size > 0 && document.len() > size => {
                    for window in document.windows(size) {
                        segments.push(window.iter().cloned().collect());
                    }
                }
                _ => segments.push(document.iter().cloned().collect()),
            }
        }

        let mut occurrences: AHashMap<String, usize> = AHashMap::new();
        for segment in &segments {
            for word in segment {
                *occurrences.entry(word.clone()).or_insert(0) += 1;
            }
        }

        NpmiCoherence {
            segments,
            occurrences,
        }
    }

    /// Number of segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    fn probability(&self, word: &str) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        self.occurrences.get(word).copied().unwrap_or(0) as f64 / self.segments.len() as f64
    }

    fn joint_probability(&self, a: &str, b: &str) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        let together = self
            .segments
            .iter()
            .filter(|segment| segment.contains(a) && segment.contains(b))
            .count();
        together as f64 / self.segments.len() as f64
    }

    /// NPMI of one word pair, in [-1, 1].
    pub fn npmi(&self, a: &str, b: &str) -> f64 {
        let p_a = self.probability(a);
        let p_b = self.probability(b);
        if p_a == 0.0 || p_b == 0.0 {
            return -1.0;
        }

        let p_ab = self.joint_probability(a, b);
        if p_ab >= 1.0 {
            return 1.0;
        }

        let joint = p_ab + EPSILON;
        (joint / (p_a * p_b)).ln() / -joint.ln()
    }

    /// Mean pairwise NPMI of a word list (0 with fewer than two words).
    pub fn topic_coherence(&self, words: &[&str]) -> f64 {
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, a) in words.iter().enumerate() {
            for b in &words[i + 1..] {
                total += self.npmi(a, b);
                pairs += 1;
            }
        }

        if pairs == 0 { 0.0 } else { total / pairs as f64 }
    }

    /// Mean topic coherence of a model's top words.
    pub fn model_coherence(&self, model: &LdaModel, corpus: &Corpus, top_n: usize) -> f64 {
        let num_topics = model.num_topics();
        if num_topics == 0 {
            return 0.0;
        }

        let total: f64 = (0..num_topics)
            .map(|topic| {
                let words: Vec<&str> = model
                    .topic_words(topic, top_n)
                    .into_iter()
                    .filter_map(|(term, _)| corpus.vocabulary().term(term))
                    .collect();
                self.topic_coherence(&words)
            })
            .sum();

        total / num_topics as f64
    }
}

/// Score a trained model against the filtered token sequences of `corpus`.
pub fn score(model: &LdaModel, corpus: &Corpus, config: &CoherenceConfig) -> f64 {
    NpmiCoherence::new(corpus.tokens(), config.window_size).model_coherence(
        model,
        corpus,
        config.top_n,
    )
}
