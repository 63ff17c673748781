//! Configuration for topic discovery.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::corpus::VectorizerConfig;
use crate::error::{BibliotopicError, Result};

/// Candidate range and execution settings for model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Smallest candidate topic count (inclusive).
    pub min_topics: usize,

    /// Largest candidate topic count (inclusive).
    pub max_topics: usize,

    /// Distance between consecutive candidates.
    pub step: usize,

    /// Train candidates on a thread pool.
    pub parallel: bool,

    /// Thread pool size (None = number of CPUs).
    pub num_threads: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            min_topics: 2,
            max_topics: 8,
            step: 1,
            parallel: true,
            num_threads: None,
        }
    }
}

impl SelectionConfig {
    /// Candidate topic counts in ascending order.
    pub fn candidates(&self) -> Vec<usize> {
        (self.min_topics..=self.max_topics)
            .step_by(self.step.max(1))
            .collect()
    }
}

/// Training parameters of the LDA model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LdaConfig {
    /// Full Gibbs sweeps over the corpus.
    pub passes: usize,

    /// Document-topic prior (None = 1 / num_topics).
    pub alpha: Option<f64>,

    /// Topic-word prior.
    pub beta: f64,

    /// Base random seed. Each candidate derives its own seed from it.
    pub seed: u64,

    /// Fixed-point iterations used to infer a document's topic mixture.
    pub inference_iterations: usize,
}

impl Default for LdaConfig {
    fn default() -> Self {
        LdaConfig {
            passes: 15,
            alpha: None,
            beta: 0.01,
            seed: 42,
            inference_iterations: 100,
        }
    }
}

/// NPMI coherence parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceConfig {
    /// Number of top words per topic that are scored.
    pub top_n: usize,

    /// Sliding window size in tokens (None = whole document).
    pub window_size: Option<usize>,
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        CoherenceConfig {
            top_n: 10,
            window_size: None,
        }
    }
}

/// Configuration of a full topic discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub vectorizer: VectorizerConfig,
    pub selection: SelectionConfig,
    pub lda: LdaConfig,
    pub coherence: CoherenceConfig,

    /// Number of keywords joined into a topic's name.
    pub label_top_n: usize,

    /// Where the visualization page is written (None = skip).
    pub visualization_path: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            vectorizer: VectorizerConfig::default(),
            selection: SelectionConfig::default(),
            lda: LdaConfig::default(),
            coherence: CoherenceConfig::default(),
            label_top_n: 5,
            visualization_path: Some(PathBuf::from("lda_visualization.html")),
        }
    }
}

impl DiscoveryConfig {
    /// Reject configurations that cannot produce a model.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;

        let selection = &self.selection;
        if selection.min_topics < 1 {
            return Err(BibliotopicError::invalid_config(
                "min_topics must be at least 1",
            ));
        }
        if selection.min_topics > selection.max_topics {
            return Err(BibliotopicError::invalid_config(format!(
                "min_topics ({}) exceeds max_topics ({})",
                selection.min_topics, selection.max_topics
            )));
        }
        if selection.step == 0 {
            return Err(BibliotopicError::invalid_config("step must be positive"));
        }
        if selection.num_threads == Some(0) {
            return Err(BibliotopicError::invalid_config(
                "num_threads must be positive",
            ));
        }

        if self.lda.passes == 0 {
            return Err(BibliotopicError::invalid_config("passes must be positive"));
        }
        if self.lda.inference_iterations == 0 {
            return Err(BibliotopicError::invalid_config(
                "inference_iterations must be positive",
            ));
        }
        if !(self.lda.beta > 0.0) {
            return Err(BibliotopicError::invalid_config("beta must be positive"));
        }
        if let Some(alpha) = self.lda.alpha {
            if !(alpha > 0.0) {
                return Err(BibliotopicError::invalid_config("alpha must be positive"));
            }
        }

        if self.coherence.top_n < 2 {
            return Err(BibliotopicError::invalid_config(
                "coherence top_n must be at least 2",
            ));
        }
        if self.coherence.window_size == Some(0) {
            return Err(BibliotopicError::invalid_config(
                "window_size must be positive",
            ));
        }
        if self.label_top_n == 0 {
            return Err(BibliotopicError::invalid_config(
                "label_top_n must be positive",
            ));
        }

        Ok(())
    }
}
