//! Paper groups.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::{GroupId, PaperId};

/// A named, owned set of paper references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperGroup {
    /// Record store identifier
    pub id: GroupId,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Owning user name
    #[serde(default)]
    pub owner: Option<String>,
    /// Member papers; a set, so order and duplicates do not matter
    #[serde(default)]
    pub papers: BTreeSet<PaperId>,
}

impl PaperGroup {
    /// Create an empty group.
    pub fn new<S: Into<String>>(id: GroupId, name: S) -> Self {
        PaperGroup {
            id,
            name: name.into(),
            description: None,
            owner: None,
            papers: BTreeSet::new(),
        }
    }

    /// Add members to the group.
    pub fn with_papers<I: IntoIterator<Item = PaperId>>(mut self, papers: I) -> Self {
        self.papers.extend(papers);
        self
    }

    /// Set the owner.
    pub fn with_owner<S: Into<String>>(mut self, owner: S) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the description.
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the paper is a member.
    pub fn contains(&self, paper: PaperId) -> bool {
        self.papers.contains(&paper)
    }

    /// Number of member papers.
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// Whether the group has no members.
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}
