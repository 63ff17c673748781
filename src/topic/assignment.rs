//! Topic materialization and paper assignment.

use chrono::Utc;
use log::{info, warn};
use serde::Serialize;

use crate::corpus::Corpus;
use crate::document::PaperId;
use crate::error::{BibliotopicError, Result};
use crate::storage::PaperRepository;
use crate::topic::lda::LdaModel;
use crate::topic::selection::Selection;
use crate::topic::{RunId, Topic, TopicId, TopicKeyword, TopicModelRun};

/// Summary of a committed run.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
    pub run: TopicModelRun,
    pub topics: Vec<Topic>,

    /// Dominant topic of every paper, in corpus order.
    pub assignments: Vec<(PaperId, TopicId)>,

    /// Number of papers assigned to each topic index.
    pub topic_sizes: Vec<usize>,

    /// Papers that had no surviving terms.
    pub empty_documents: usize,
}

/// Creates labeled topics and assigns each paper its dominant topic.
#[derive(Debug, Clone)]
pub struct TopicAssigner {
    label_top_n: usize,
}

impl Default for TopicAssigner {
    fn default() -> Self {
        TopicAssigner { label_top_n: 5 }
    }
}

impl TopicAssigner {
    /// Label topics with their `label_top_n` strongest keywords.
    pub fn new(label_top_n: usize) -> Self {
        TopicAssigner { label_top_n }
    }

    /// One labeled topic per model topic, tagged with `run`.
    pub fn build_topics(
        &self,
        run: RunId,
        model: &LdaModel,
        corpus: &Corpus,
    ) -> Vec<Topic> {
        (0..model.num_topics())
            .map(|index| {
                let keywords = model
                    .topic_words(index, self.label_top_n)
                    .into_iter()
                    .filter_map(|(term, weight)| {
                        corpus.vocabulary().term(term).map(|word| TopicKeyword {
                            word: word.to_string(),
                            weight,
                        })
                    })
                    .collect();
                Topic::from_keywords(TopicId::new(run, index), keywords)
            })
            .collect()
    }

    /// Commit a new generation for `papers`, which are parallel to `corpus`.
    pub fn assign(
        &self,
        repo: &dyn PaperRepository,
        selection: &Selection,
        corpus: &Corpus,
        papers: &[PaperId],
    ) -> Result<AssignmentReport> {
        if papers.len() != corpus.len() {
            return Err(BibliotopicError::corpus(format!(
                "{} papers for {} documents",
                papers.len(),
                corpus.len()
            )));
        }

        let run_id = repo.next_run_id()?;
        let model = &selection.model;
        let topics = self.build_topics(run_id, model, corpus);

        let mut topic_sizes = vec![0usize; model.num_topics()];
        let mut empty_documents = 0;
        let assignments: Vec<(PaperId, TopicId)> = papers
            .iter()
            .zip(corpus.bows())
            .map(|(&paper, bow)| {
                if bow.is_empty() {
                    empty_documents += 1;
                }
                let index = LdaModel::dominant_topic(&model.document_topics(bow));
                topic_sizes[index] += 1;
                (paper, TopicId::new(run_id, index))
            })
            .collect();

        if empty_documents > 0 {
            warn!("{empty_documents} papers without terms were assigned topic 0");
        }

        let run = TopicModelRun {
            id: run_id,
            min_topics: selection.min_topics,
            max_topics: selection.max_topics,
            step: selection.step,
            coherence: selection.scores.clone(),
            num_topics: selection.num_topics,
            created_at: Utc::now(),
        };

        repo.commit_run(run.clone(), topics.clone(), &assignments)?;
        for topic in &topics {
            info!(
                "Topic {}: {} ({} papers)",
                topic.id, topic.name, topic_sizes[topic.id.index]
            );
        }

        Ok(AssignmentReport {
            run,
            topics,
            assignments,
            topic_sizes,
            empty_documents,
        })
    }
}
