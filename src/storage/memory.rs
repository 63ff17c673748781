//! In-memory repository with a JSON snapshot format.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::document::{GroupId, Paper, PaperGroup, PaperId};
use crate::error::{BibliotopicError, Result};
use crate::storage::PaperRepository;
use crate::topic::{Topic, TopicId, TopicModelRun};

#[derive(Debug, Default)]
struct State {
    papers: BTreeMap<PaperId, Paper>,
    groups: BTreeMap<GroupId, PaperGroup>,
    run: Option<TopicModelRun>,
    topics: Vec<Topic>,
}

/// On-disk layout of a store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    papers: Vec<Paper>,
    #[serde(default)]
    groups: Vec<PaperGroup>,
    #[serde(default)]
    run: Option<TopicModelRun>,
    #[serde(default)]
    topics: Vec<Topic>,
}

/// A repository held in memory behind a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        MemoryRepository::default()
    }

    /// Read a store file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;

        let state = State {
            papers: snapshot.papers.into_iter().map(|p| (p.id, p)).collect(),
            groups: snapshot.groups.into_iter().map(|g| (g.id, g)).collect(),
            run: snapshot.run,
            topics: snapshot.topics,
        };
        info!(
            "Loaded {} papers and {} groups from {}",
            state.papers.len(),
            state.groups.len(),
            path.display()
        );

        Ok(MemoryRepository {
            state: RwLock::new(state),
        })
    }

    /// Read a store file, or start empty when it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            debug!("{} does not exist, starting empty", path.as_ref().display());
            Ok(Self::new())
        }
    }

    /// Write the repository to a store file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot = {
            let state = self.state.read();
            Snapshot {
                papers: state.papers.values().cloned().collect(),
                groups: state.groups.values().cloned().collect(),
                run: state.run.clone(),
                topics: state.topics.clone(),
            }
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path.as_ref(), json)?;
        debug!("Saved store to {}", path.as_ref().display());
        Ok(())
    }

    /// Number of stored papers.
    pub fn len(&self) -> usize {
        self.state.read().papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().papers.is_empty()
    }
}

impl PaperRepository for MemoryRepository {
    fn papers(&self) -> Result<Vec<Paper>> {
        Ok(self.state.read().papers.values().cloned().collect())
    }

    fn paper(&self, id: PaperId) -> Result<Paper> {
        self.state
            .read()
            .papers
            .get(&id)
            .cloned()
            .ok_or_else(|| BibliotopicError::not_found(format!("paper {id}")))
    }

    fn insert_paper(&self, paper: Paper) -> Result<PaperId> {
        let id = paper.id;
        self.state.write().papers.insert(id, paper);
        Ok(id)
    }

    fn groups(&self) -> Result<Vec<PaperGroup>> {
        Ok(self.state.read().groups.values().cloned().collect())
    }

    fn group(&self, id: GroupId) -> Result<PaperGroup> {
        self.state
            .read()
            .groups
            .get(&id)
            .cloned()
            .ok_or_else(|| BibliotopicError::not_found(format!("group {id}")))
    }

    fn insert_group(&self, group: PaperGroup) -> Result<GroupId> {
        let mut state = self.state.write();
        if let Some(missing) = group.papers.iter().find(|id| !state.papers.contains_key(*id)) {
            return Err(BibliotopicError::not_found(format!("paper {missing}")));
        }
        let id = group.id;
        state.groups.insert(id, group);
        Ok(id)
    }

    fn delete_group(&self, id: GroupId) -> Result<()> {
        self.state
            .write()
            .groups
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BibliotopicError::not_found(format!("group {id}")))
    }

    fn current_run(&self) -> Result<Option<TopicModelRun>> {
        Ok(self.state.read().run.clone())
    }

    fn topics(&self) -> Result<Vec<Topic>> {
        Ok(self.state.read().topics.clone())
    }

    fn commit_run(
        &self,
        run: TopicModelRun,
        topics: Vec<Topic>,
        assignments: &[(PaperId, TopicId)],
    ) -> Result<()> {
        if let Some(stale) = topics.iter().find(|topic| !topic.is_from(run.id)) {
            return Err(BibliotopicError::storage(format!(
                "topic {} does not belong to run {}",
                stale.id, run.id
            )));
        }

        let mut state = self.state.write();
        for (paper, topic) in assignments {
            if !state.papers.contains_key(paper) {
                return Err(BibliotopicError::not_found(format!("paper {paper}")));
            }
            if !topics.iter().any(|t| t.id == *topic) {
                return Err(BibliotopicError::not_found(format!("topic {topic}")));
            }
        }

        let assigned: BTreeMap<PaperId, TopicId> = assignments.iter().copied().collect();
        for (id, paper) in state.papers.iter_mut() {
            paper.topic = assigned.get(id).copied();
        }

        info!(
            "Committed run {} with {} topics and {} assignments",
            run.id,
            topics.len(),
            assigned.len()
        );
        state.topics = topics;
        state.run = Some(run);
        Ok(())
    }
}
