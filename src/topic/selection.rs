//! Model selection by coherence.
//!
//! One model is trained for every candidate topic count and scored with NPMI
//! coherence. Candidates are independent, so they train in parallel on a
//! rayon pool over the shared read-only corpus; the best model is picked by
//! an order-independent reduction.

use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::corpus::Corpus;
use crate::error::{BibliotopicError, Result};
use crate::topic::CandidateScore;
use crate::topic::coherence::NpmiCoherence;
use crate::topic::config::{CoherenceConfig, DiscoveryConfig, LdaConfig, SelectionConfig};
use crate::topic::lda::LdaModel;

/// Scores closer than this are treated as equal.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Outcome of model selection.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Selected topic count.
    pub num_topics: usize,

    /// The model trained at the selected count.
    pub model: LdaModel,

    /// Every candidate's score, in ascending topic count order.
    pub scores: Vec<CandidateScore>,

    pub min_topics: usize,
    pub max_topics: usize,
    pub step: usize,
}

impl Selection {
    /// Coherence of the selected model.
    pub fn coherence(&self) -> f64 {
        self.scores
            .iter()
            .find(|score| score.num_topics == self.num_topics)
            .map(|score| score.coherence)
            .unwrap_or(0.0)
    }
}

/// Trains and scores candidate models.
#[derive(Debug)]
pub struct ModelSelector {
    selection: SelectionConfig,
    lda: LdaConfig,
    coherence: CoherenceConfig,
    thread_pool: Option<Arc<ThreadPool>>,
}

/// Whether candidate `a` beats candidate `b`.
///
/// Higher coherence wins; within the tie tolerance the smaller count wins.
fn better(a: &CandidateScore, b: &CandidateScore) -> bool {
    if (a.coherence - b.coherence).abs() <= TIE_TOLERANCE {
        a.num_topics < b.num_topics
    } else {
        a.coherence > b.coherence
    }
}

impl ModelSelector {
    /// Create a selector from a discovery configuration.
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let thread_pool = if config.selection.parallel {
            let size = config.selection.num_threads.unwrap_or_else(num_cpus::get);
            let pool = ThreadPoolBuilder::new()
                .num_threads(size)
                .thread_name(|i| format!("topic-selection-{i}"))
                .build()
                .map_err(|e| {
                    BibliotopicError::other(format!("Failed to create thread pool: {e}"))
                })?;
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(ModelSelector {
            selection: config.selection.clone(),
            lda: config.lda.clone(),
            coherence: config.coherence.clone(),
            thread_pool,
        })
    }

    /// Candidate topic counts in ascending order.
    pub fn candidates(&self) -> Vec<usize> {
        self.selection.candidates()
    }

    /// Train every candidate and keep the most coherent model.
    pub fn select(&self, corpus: &Corpus) -> Result<Selection> {
        let non_empty = corpus.non_empty_documents();
        if non_empty == 0 {
            return Err(BibliotopicError::corpus_too_small(format!(
                "{} documents, none with surviving terms",
                corpus.len()
            )));
        }

        let candidates = self.candidates();
        if candidates.is_empty() {
            return Err(BibliotopicError::invalid_config("no candidate topic counts"));
        }

        info!(
            "Selecting topic count over {:?} on {non_empty} non-empty documents",
            candidates
        );

        let coherence = NpmiCoherence::new(corpus.tokens(), self.coherence.window_size);
        let train = |num_topics: usize| -> Result<(CandidateScore, LdaModel)> {
            let model = LdaModel::train(corpus, num_topics, &self.lda)?;
            let score = CandidateScore {
                num_topics,
                coherence: coherence.model_coherence(&model, corpus, self.coherence.top_n),
            };
            debug!("Trained candidate with {num_topics} topics");
            Ok((score, model))
        };

        let trained: Vec<(CandidateScore, LdaModel)> = match &self.thread_pool {
            Some(pool) => pool.install(|| {
                candidates
                    .par_iter()
                    .map(|&k| train(k))
                    .collect::<Result<Vec<_>>>()
            })?,
            None => candidates
                .iter()
                .map(|&k| train(k))
                .collect::<Result<Vec<_>>>()?,
        };

        let scores: Vec<CandidateScore> = trained.iter().map(|(score, _)| *score).collect();
        for score in &scores {
            info!(
                "Candidate {} topics: coherence {:.6}",
                score.num_topics, score.coherence
            );
        }

        let (best, model) = trained
            .into_iter()
            .reduce(|a, b| if better(&b.0, &a.0) { b } else { a })
            .ok_or_else(|| BibliotopicError::model("no candidate model was trained"))?;

        info!(
            "Selected {} topics (coherence {:.6})",
            best.num_topics, best.coherence
        );

        Ok(Selection {
            num_topics: best.num_topics,
            model,
            scores,
            min_topics: self.selection.min_topics,
            max_topics: self.selection.max_topics,
            step: self.selection.step,
        })
    }
}
