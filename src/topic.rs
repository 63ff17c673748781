//! Topic discovery.
//!
//! A discovery run normalizes every abstract, vectorizes the corpus, trains
//! one LDA model per candidate topic count, keeps the most coherent one and
//! commits labeled topics plus each paper's dominant topic through a
//! [`PaperRepository`](crate::storage::PaperRepository).
//!
//! Topics are tagged with the [`RunId`] of the run that produced them, so a
//! reference left over from an older run is detectable by comparing run ids.

pub mod assignment;
pub mod coherence;
pub mod config;
pub mod lda;
pub mod pipeline;
pub mod report;
pub mod selection;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use config::{CoherenceConfig, DiscoveryConfig, LdaConfig, SelectionConfig};

/// Monotonic identifier of a topic model run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl RunId {
    /// The id following this one.
    pub fn next(self) -> RunId {
        RunId(self.0 + 1)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generation-tagged topic identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TopicId {
    /// Run that produced the topic.
    pub run: RunId,

    /// Topic index within the run's model.
    pub index: usize,
}

impl TopicId {
    pub fn new(run: RunId, index: usize) -> Self {
        TopicId { run, index }
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.run, self.index)
    }
}

/// A weighted keyword of a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicKeyword {
    pub word: String,
    pub weight: f64,
}

/// A labeled topic of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,

    /// Comma-joined top keywords.
    pub name: String,

    /// Keywords ordered by weight descending.
    pub keywords: Vec<TopicKeyword>,
}

impl Topic {
    /// Build a topic whose name joins the given keywords.
    pub fn from_keywords(id: TopicId, keywords: Vec<TopicKeyword>) -> Self {
        let name = keywords
            .iter()
            .map(|keyword| keyword.word.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Topic { id, name, keywords }
    }

    /// Whether the topic belongs to `run`.
    pub fn is_from(&self, run: RunId) -> bool {
        self.id.run == run
    }
}

/// Coherence score of one candidate topic count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub num_topics: usize,
    pub coherence: f64,
}

/// Record of one completed topic discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicModelRun {
    pub id: RunId,
    pub min_topics: usize,
    pub max_topics: usize,
    pub step: usize,

    /// Scores of every candidate, in ascending topic count order.
    pub coherence: Vec<CandidateScore>,

    /// The selected topic count.
    pub num_topics: usize,

    pub created_at: DateTime<Utc>,
}

impl TopicModelRun {
    /// Score of the selected candidate.
    pub fn selected_coherence(&self) -> Option<f64> {
        self.coherence
            .iter()
            .find(|score| score.num_topics == self.num_topics)
            .map(|score| score.coherence)
    }
}
