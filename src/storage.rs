//! Record store abstraction.
//!
//! Papers, groups and the current topic generation live behind the
//! [`PaperRepository`] trait. The topic pipeline and the collection algebra
//! receive a repository instead of reaching for global state, so any backend
//! (a database, a remote service, the bundled [`memory::MemoryRepository`])
//! can be plugged in.
//!
//! # Example
//!
//! ```
//! use bibliotopic::document::{Paper, PaperId};
//! use bibliotopic::storage::PaperRepository;
//! use bibliotopic::storage::memory::MemoryRepository;
//!
//! # fn main() -> bibliotopic::error::Result<()> {
//! let repo = MemoryRepository::new();
//! let id = repo.next_paper_id()?;
//! repo.insert_paper(Paper::new(id, "Cancer risk factors"))?;
//! assert_eq!(repo.paper(id)?.title, "Cancer risk factors");
//! # Ok(())
//! # }
//! ```

use crate::document::{GroupId, Paper, PaperGroup, PaperId};
use crate::error::Result;
use crate::topic::{RunId, Topic, TopicId, TopicModelRun};

pub mod memory;

/// Read/write access to papers, groups and topic generations.
///
/// Lookups of a single record return `NotFound` when it is missing.
pub trait PaperRepository: Send + Sync {
    /// All papers, ordered by id.
    fn papers(&self) -> Result<Vec<Paper>>;

    /// A single paper.
    fn paper(&self, id: PaperId) -> Result<Paper>;

    /// Insert or replace a paper.
    fn insert_paper(&self, paper: Paper) -> Result<PaperId>;

    /// All groups, ordered by id.
    fn groups(&self) -> Result<Vec<PaperGroup>>;

    /// A single group.
    fn group(&self, id: GroupId) -> Result<PaperGroup>;

    /// Insert or replace a group.
    fn insert_group(&self, group: PaperGroup) -> Result<GroupId>;

    /// Remove a group. Member papers are untouched.
    fn delete_group(&self, id: GroupId) -> Result<()>;

    /// The most recent completed run, if any.
    fn current_run(&self) -> Result<Option<TopicModelRun>>;

    /// Topics of the current run, ordered by index.
    fn topics(&self) -> Result<Vec<Topic>>;

    /// Replace the current generation.
    ///
    /// Prior topics are dropped, `topics` become current and every paper's
    /// topic is overwritten: papers listed in `assignments` receive their
    /// topic, all others are cleared.
    fn commit_run(
        &self,
        run: TopicModelRun,
        topics: Vec<Topic>,
        assignments: &[(PaperId, TopicId)],
    ) -> Result<()>;

    /// A paper id not used by any stored paper.
    fn next_paper_id(&self) -> Result<PaperId> {
        let max = self.papers()?.iter().map(|paper| paper.id.0).max();
        Ok(PaperId(max.map_or(1, |id| id + 1)))
    }

    /// A group id not used by any stored group.
    fn next_group_id(&self) -> Result<GroupId> {
        let max = self.groups()?.iter().map(|group| group.id.0).max();
        Ok(GroupId(max.map_or(1, |id| id + 1)))
    }

    /// The id the next run should carry.
    fn next_run_id(&self) -> Result<RunId> {
        Ok(self
            .current_run()?
            .map_or(RunId(1), |run| run.id.next()))
    }

    /// The topic of the current run with the given index.
    fn topic(&self, id: TopicId) -> Result<Topic> {
        self.topics()?
            .into_iter()
            .find(|topic| topic.id == id)
            .ok_or_else(|| crate::error::BibliotopicError::not_found(format!("topic {id}")))
    }
}
