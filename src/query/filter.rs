//! Composed paper filters.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::document::{GroupId, Paper};
use crate::error::Result;
use crate::query::BooleanQuery;
use crate::storage::PaperRepository;
use crate::topic::TopicId;

/// Filters ANDed together over the stored papers.
///
/// The scope (topic, then group) selects the candidates; the title query,
/// the year and the keyword then narrow them. Blank strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperFilter {
    pub query: Option<String>,
    pub year: Option<i32>,
    pub keyword: Option<String>,
    pub group: Option<GroupId>,
    pub topic: Option<TopicId>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl PaperFilter {
    pub fn new() -> Self {
        PaperFilter::default()
    }

    pub fn with_query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_keyword<S: Into<String>>(mut self, keyword: S) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_topic(mut self, topic: TopicId) -> Self {
        self.topic = Some(topic);
        self
    }

    /// Whether no filter is set.
    pub fn is_empty(&self) -> bool {
        non_blank(&self.query).is_none()
            && self.year.is_none()
            && non_blank(&self.keyword).is_none()
            && self.group.is_none()
            && self.topic.is_none()
    }

    /// Run the filters against a repository, returning papers by id.
    ///
    /// A scope that names a missing group, or a topic outside the current
    /// run, is reported as `NotFound`.
    pub fn apply(&self, repo: &dyn PaperRepository) -> Result<Vec<Paper>> {
        let mut papers = repo.papers()?;

        if let Some(topic) = self.topic {
            repo.topic(topic)?;
            papers.retain(|paper| paper.topic == Some(topic));
        }

        if let Some(group) = self.group {
            let group = repo.group(group)?;
            papers.retain(|paper| group.contains(paper.id));
        }

        if let Some(query) = non_blank(&self.query) {
            papers = BooleanQuery::parse(query).apply(&papers);
        }

        if let Some(year) = self.year {
            papers.retain(|paper| paper.year == Some(year));
        }

        if let Some(keyword) = non_blank(&self.keyword) {
            papers.retain(|paper| paper.title_contains(keyword));
        }

        debug!("Filter {:?} matched {} papers", self, papers.len());
        Ok(papers)
    }
}
