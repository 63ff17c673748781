//! Latent Dirichlet Allocation trained by collapsed Gibbs sampling.
//!
//! Training is seeded so that a given corpus, topic count and configuration
//! always produce the same model. Document mixtures for assignment are
//! inferred deterministically by a fixed-point iteration against the trained
//! topic-word distributions.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::corpus::{BagOfWords, Corpus, TermId};
use crate::error::{BibliotopicError, Result};
use crate::topic::config::LdaConfig;

/// A trained LDA model.
#[derive(Debug, Clone)]
pub struct LdaModel {
    num_topics: usize,
    alpha: f64,
    beta: f64,
    inference_iterations: usize,

    /// Topic-word distributions, `num_topics` rows of vocabulary size.
    topic_word: Vec<Vec<f64>>,

    /// Number of tokens assigned to each topic at the end of training.
    topic_tokens: Vec<u64>,
}

/// Derive the sampler seed of one candidate from the base seed.
pub fn candidate_seed(seed: u64, num_topics: usize) -> u64 {
    seed ^ (num_topics as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

impl LdaModel {
    /// Train a model with `num_topics` topics on the corpus vectors.
    pub fn train(corpus: &Corpus, num_topics: usize, config: &LdaConfig) -> Result<Self> {
        if num_topics == 0 {
            return Err(BibliotopicError::model("num_topics must be positive"));
        }

        let vocab_size = corpus.vocabulary().len();
        if vocab_size == 0 {
            return Err(BibliotopicError::corpus_too_small(
                "vocabulary is empty after filtering",
            ));
        }

        let alpha = config.alpha.unwrap_or(1.0 / num_topics as f64);
        let beta = config.beta;
        let beta_sum = beta * vocab_size as f64;
        let mut rng = StdRng::seed_from_u64(candidate_seed(config.seed, num_topics));

        let documents: Vec<Vec<TermId>> = corpus
            .bows()
            .iter()
            .map(|bow| bow.occurrences().collect())
            .collect();

        let mut doc_topic = vec![vec![0u32; num_topics]; documents.len()];
        let mut topic_word = vec![vec![0u32; vocab_size]; num_topics];
        let mut topic_totals = vec![0u64; num_topics];
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(documents.len());

        for (d, words) in documents.iter().enumerate() {
            let mut z = Vec::with_capacity(words.len());
            for word in words {
                let k = rng.random_range(0..num_topics);
                doc_topic[d][k] += 1;
                topic_word[k][word.index()] += 1;
                topic_totals[k] += 1;
                z.push(k);
            }
            assignments.push(z);
        }

        let mut weights = vec![0.0f64; num_topics];
        for pass in 0..config.passes {
            for (d, words) in documents.iter().enumerate() {
                for (i, word) in words.iter().enumerate() {
                    let w = word.index();
                    let old = assignments[d][i];
                    doc_topic[d][old] -= 1;
                    topic_word[old][w] -= 1;
                    topic_totals[old] -= 1;

                    let mut total = 0.0;
                    for k in 0..num_topics {
                        let weight = (doc_topic[d][k] as f64 + alpha)
                            * (topic_word[k][w] as f64 + beta)
                            / (topic_totals[k] as f64 + beta_sum);
                        total += weight;
                        weights[k] = total;
                    }

                    let target = rng.random::<f64>() * total;
                    let new = weights
                        .iter()
                        .position(|&cumulative| target < cumulative)
                        .unwrap_or(num_topics - 1);

                    assignments[d][i] = new;
                    doc_topic[d][new] += 1;
                    topic_word[new][w] += 1;
                    topic_totals[new] += 1;
                }
            }
            debug!("LDA k={num_topics}: finished pass {}/{}", pass + 1, config.passes);
        }

        let phi = topic_word
            .iter()
            .zip(&topic_totals)
            .map(|(row, &total)| {
                let denominator = total as f64 + beta_sum;
                row.iter()
                    .map(|&count| (count as f64 + beta) / denominator)
                    .collect()
            })
            .collect();

        Ok(LdaModel {
            num_topics,
            alpha,
            beta,
            inference_iterations: config.inference_iterations,
            topic_word: phi,
            topic_tokens: topic_totals,
        })
    }

    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    pub fn vocab_size(&self) -> usize {
        self.topic_word.first().map(Vec::len).unwrap_or(0)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Probability of `term` under topic `topic`.
    pub fn word_probability(&self, topic: usize, term: TermId) -> f64 {
        self.topic_word
            .get(topic)
            .and_then(|row| row.get(term.index()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Share of training tokens held by each topic.
    pub fn topic_proportions(&self) -> Vec<f64> {
        let total: u64 = self.topic_tokens.iter().sum();
        if total == 0 {
            return vec![1.0 / self.num_topics as f64; self.num_topics];
        }
        self.topic_tokens
            .iter()
            .map(|&count| count as f64 / total as f64)
            .collect()
    }

    /// The `n` most probable terms of a topic, by weight descending.
    ///
    /// Equal weights are ordered by term id so the result is stable.
    pub fn topic_words(&self, topic: usize, n: usize) -> Vec<(TermId, f64)> {
        let Some(row) = self.topic_word.get(topic) else {
            return Vec::new();
        };

        let mut words: Vec<(TermId, f64)> = row
            .iter()
            .enumerate()
            .map(|(i, &p)| (TermId(i as u32), p))
            .collect();
        words.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        words.truncate(n);
        words
    }

    /// Infer the topic mixture of a document.
    ///
    /// Starts from the uniform mixture and repeatedly redistributes each
    /// word's count over topics in proportion to `theta_k * phi_kw`. An empty
    /// document keeps the uniform mixture.
    pub fn document_topics(&self, bow: &BagOfWords) -> Vec<f64> {
        let k = self.num_topics;
        let mut theta = vec![1.0 / k as f64; k];
        if bow.is_empty() {
            return theta;
        }

        let length = bow.total() as f64;
        let normalizer = length + self.alpha * k as f64;
        let mut next = vec![0.0f64; k];

        for _ in 0..self.inference_iterations {
            next.iter_mut().for_each(|v| *v = self.alpha);

            for &(term, count) in bow.entries() {
                let mut mass = 0.0;
                for (t, theta_t) in theta.iter().enumerate() {
                    mass += theta_t * self.word_probability(t, term);
                }
                if mass <= 0.0 {
                    continue;
                }
                for (t, theta_t) in theta.iter().enumerate() {
                    next[t] += count as f64 * theta_t * self.word_probability(t, term) / mass;
                }
            }

            let mut delta = 0.0;
            for (t, value) in next.iter().enumerate() {
                let updated = value / normalizer;
                delta += (updated - theta[t]).abs();
                theta[t] = updated;
            }
            if delta < 1e-10 {
                break;
            }
        }

        theta
    }

    /// Index of the largest entry, lowest index on ties.
    pub fn dominant_topic(distribution: &[f64]) -> usize {
        let mut best = 0;
        for (i, &value) in distribution.iter().enumerate().skip(1) {
            if value > distribution[best] {
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusVectorizer, VectorizerConfig};

    fn corpus() -> Corpus {
        let mut documents = Vec::new();
        for _ in 0..3 {
            documents.push(
                "vaccine trial dose antibody vaccine trial dose antibody"
                    .split(' ')
                    .map(str::to_string)
                    .collect(),
            );
        }
        for _ in 0..3 {
            documents.push(
                "climate carbon policy emission climate carbon policy emission"
                    .split(' ')
                    .map(str::to_string)
                    .collect(),
            );
        }
        CorpusVectorizer::with_config(VectorizerConfig {
            high_frequency_ratio: 1.0,
        })
        .fit_transform(&documents)
    }

    fn config() -> LdaConfig {
        LdaConfig {
            passes: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_training_is_deterministic() {
        let corpus = corpus();
        let a = LdaModel::train(&corpus, 2, &config()).unwrap();
        let b = LdaModel::train(&corpus, 2, &config()).unwrap();

        assert_eq!(a.topic_words(0, 4), b.topic_words(0, 4));
        assert_eq!(a.topic_words(1, 4), b.topic_words(1, 4));
    }

    #[test]
    fn test_topic_word_rows_are_distributions() {
        let model = LdaModel::train(&corpus(), 3, &config()).unwrap();
        assert_eq!(model.num_topics(), 3);
        assert_eq!(model.vocab_size(), 8);
        assert!((model.alpha() - 1.0 / 3.0).abs() < 1e-12);

        for topic in 0..3 {
            let sum: f64 = (0..8)
                .map(|i| model.word_probability(topic, TermId(i)))
                .sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        let proportions: f64 = model.topic_proportions().iter().sum();
        assert!((proportions - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_separates_disjoint_documents() {
        let corpus = corpus();
        let model = LdaModel::train(&corpus, 2, &config()).unwrap();

        let topics: Vec<usize> = corpus
            .bows()
            .iter()
            .map(|bow| LdaModel::dominant_topic(&model.document_topics(bow)))
            .collect();

        assert!(topics[..3].iter().all(|&t| t == topics[0]));
        assert!(topics[3..].iter().all(|&t| t == topics[3]));
        assert_ne!(topics[0], topics[3]);
    }

    #[test]
    fn test_empty_document_is_uniform() {
        let model = LdaModel::train(&corpus(), 4, &config()).unwrap();
        let theta = model.document_topics(&BagOfWords::default());

        assert_eq!(theta, vec![0.25; 4]);
        assert_eq!(LdaModel::dominant_topic(&theta), 0);
    }

    #[test]
    fn test_dominant_topic_prefers_lowest_index() {
        assert_eq!(LdaModel::dominant_topic(&[0.2, 0.4, 0.4]), 1);
        assert_eq!(LdaModel::dominant_topic(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_empty_vocabulary_is_rejected() {
        let corpus = CorpusVectorizer::new().fit_transform(&[Vec::new(), Vec::new()]);
        let result = LdaModel::train(&corpus, 2, &config());
        assert!(matches!(
            result,
            Err(BibliotopicError::CorpusTooSmall(_))
        ));
    }
}
