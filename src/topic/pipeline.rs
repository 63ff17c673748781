//! The topic discovery pipeline.
//!
//! [`TopicDiscovery::run`] chains normalization, vectorization, model
//! selection and assignment against a repository. Runs of one
//! `TopicDiscovery` value are serialized: a second call while one is in
//! flight fails with `PipelineBusy` instead of waiting.
//!
//! The lock lives in the `TopicDiscovery` value, not in the repository.
//! Separate values, or separate processes sharing one store file, are not
//! excluded from each other; callers that run discovery from several places
//! need their own job lock around the store.

use std::time::Instant;

use log::info;
use parking_lot::Mutex;

use crate::analysis::TextNormalizer;
use crate::corpus::CorpusVectorizer;
use crate::document::PaperId;
use crate::error::{BibliotopicError, Result};
use crate::storage::PaperRepository;
use crate::topic::assignment::{AssignmentReport, TopicAssigner};
use crate::topic::config::DiscoveryConfig;
use crate::topic::report::write_visualization;
use crate::topic::selection::ModelSelector;

/// Runs topic discovery over a repository.
#[derive(Debug)]
pub struct TopicDiscovery {
    config: DiscoveryConfig,
    normalizer: TextNormalizer,
    running: Mutex<()>,
}

impl TopicDiscovery {
    /// Create a pipeline after validating `config`.
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(TopicDiscovery {
            config,
            normalizer: TextNormalizer::new()?,
            running: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.running.is_locked()
    }

    /// Recompute topics for every paper and commit them as a new run.
    pub fn run(&self, repo: &dyn PaperRepository) -> Result<AssignmentReport> {
        let _guard = self.running.try_lock().ok_or_else(|| {
            BibliotopicError::pipeline_busy("another topic discovery run is in progress")
        })?;
        let start = Instant::now();

        let papers = repo.papers()?;
        let ids: Vec<PaperId> = papers.iter().map(|paper| paper.id).collect();
        info!("Starting topic discovery over {} papers", papers.len());

        let documents = self
            .normalizer
            .normalize_all(papers.iter().map(|paper| paper.abstract_str()))?;
        let corpus = CorpusVectorizer::with_config(self.config.vectorizer.clone())
            .fit_transform(&documents);

        let selection = ModelSelector::new(&self.config)?.select(&corpus)?;
        let report = TopicAssigner::new(self.config.label_top_n).assign(
            repo,
            &selection,
            &corpus,
            &ids,
        )?;

        if let Some(path) = &self.config.visualization_path {
            write_visualization(path, &report)?;
        }

        info!(
            "Run {} finished in {:.2?}: {} topics",
            report.run.id,
            start.elapsed(),
            report.run.num_topics
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;

    use super::*;
    use crate::document::{GroupId, Paper, PaperGroup};
    use crate::storage::memory::MemoryRepository;
    use crate::topic::{Topic, TopicId, TopicModelRun};

    /// Blocks inside `papers()` until released, holding the pipeline open.
    struct BlockingRepository {
        inner: MemoryRepository,
        entered: Mutex<Option<mpsc::Sender<()>>>,
        release: Mutex<Option<mpsc::Receiver<()>>>,
    }

    impl PaperRepository for BlockingRepository {
        fn papers(&self) -> Result<Vec<Paper>> {
            let entered = self.entered.lock().take();
            if let Some(entered) = entered {
                let _ = entered.send(());
                let release = self.release.lock().take();
                if let Some(release) = release {
                    let _ = release.recv();
                }
            }
            self.inner.papers()
        }

        fn paper(&self, id: PaperId) -> Result<Paper> {
            self.inner.paper(id)
        }

        fn insert_paper(&self, paper: Paper) -> Result<PaperId> {
            self.inner.insert_paper(paper)
        }

        fn groups(&self) -> Result<Vec<PaperGroup>> {
            self.inner.groups()
        }

        fn group(&self, id: GroupId) -> Result<PaperGroup> {
            self.inner.group(id)
        }

        fn insert_group(&self, group: PaperGroup) -> Result<GroupId> {
            self.inner.insert_group(group)
        }

        fn delete_group(&self, id: GroupId) -> Result<()> {
            self.inner.delete_group(id)
        }

        fn current_run(&self) -> Result<Option<TopicModelRun>> {
            self.inner.current_run()
        }

        fn topics(&self) -> Result<Vec<Topic>> {
            self.inner.topics()
        }

        fn commit_run(
            &self,
            run: TopicModelRun,
            topics: Vec<Topic>,
            assignments: &[(PaperId, TopicId)],
        ) -> Result<()> {
            self.inner.commit_run(run, topics, assignments)
        }
    }

    fn config() -> DiscoveryConfig {
        let mut config = DiscoveryConfig::default();
        config.selection.max_topics = 3;
        config.selection.parallel = false;
        config.visualization_path = None;
        config
    }

    fn seed(repo: &MemoryRepository) {
        let abstracts = [
            "Vaccine efficacy in a randomized trial.",
            "Vaccine trial results and efficacy.",
            "Climate policy and carbon taxes.",
            "Carbon pricing as climate policy.",
        ];
        for (i, text) in abstracts.iter().enumerate() {
            repo.insert_paper(Paper::new(PaperId(i as u64 + 1), format!("Paper {i}")).with_abstract(*text))
                .unwrap();
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = config();
        config.selection.step = 0;
        assert!(matches!(
            TopicDiscovery::new(config),
            Err(BibliotopicError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_on_empty_store_is_too_small() {
        let pipeline = TopicDiscovery::new(config()).unwrap();
        let repo = MemoryRepository::new();
        repo.insert_paper(Paper::new(PaperId(1), "No abstract")).unwrap();

        let result = pipeline.run(&repo);
        assert!(matches!(result, Err(BibliotopicError::CorpusTooSmall(_))));
        assert!(repo.current_run().unwrap().is_none());
        assert!(!pipeline.is_running());
    }

    #[test]
    fn test_run_assigns_every_paper() {
        let pipeline = TopicDiscovery::new(config()).unwrap();
        let repo = MemoryRepository::new();
        seed(&repo);

        let report = pipeline.run(&repo).unwrap();
        assert_eq!(report.assignments.len(), 4);
        for paper in repo.papers().unwrap() {
            assert_eq!(paper.topic.map(|t| t.run), Some(report.run.id));
        }
    }

    #[test]
    fn test_concurrent_run_is_busy() {
        let pipeline = TopicDiscovery::new(config()).unwrap();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let repo = BlockingRepository {
            inner: MemoryRepository::new(),
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(Some(release_rx)),
        };
        seed(&repo.inner);

        thread::scope(|scope| {
            let first = scope.spawn(|| pipeline.run(&repo));

            entered_rx.recv().unwrap();
            assert!(pipeline.is_running());
            let second = pipeline.run(&repo);
            assert!(matches!(second, Err(BibliotopicError::PipelineBusy(_))));

            release_tx.send(()).unwrap();
            assert!(first.join().unwrap().is_ok());
        });

        assert!(!pipeline.is_running());
    }

    #[test]
    fn test_lock_is_scoped_to_one_pipeline() {
        let blocked = TopicDiscovery::new(config()).unwrap();
        let other = TopicDiscovery::new(config()).unwrap();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let repo = BlockingRepository {
            inner: MemoryRepository::new(),
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(Some(release_rx)),
        };
        seed(&repo.inner);

        thread::scope(|scope| {
            let first = scope.spawn(|| blocked.run(&repo));

            entered_rx.recv().unwrap();
            assert!(blocked.is_running());
            assert!(!other.is_running());

            let second = other.run(&repo).unwrap();
            assert_eq!(second.run.id.0, 1);

            release_tx.send(()).unwrap();
            let first = first.join().unwrap().unwrap();
            assert_eq!(first.run.id.0, 2);
        });

        assert_eq!(repo.current_run().unwrap().unwrap().id.0, 2);
    }
}
