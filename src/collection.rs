//! Collection algebra over paper groups.
//!
//! Two groups combine by union, intersection or directional difference. The
//! result is a deduplicated list sorted by paper id. Groups are only read.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::document::{GroupId, Paper, PaperId};
use crate::error::{BibliotopicError, Result};
use crate::storage::PaperRepository;

/// A set operation between two groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOperation {
    Union,
    Intersection,
    /// Papers of the first group missing from the second.
    Difference,
}

impl SetOperation {
    /// Every supported operation.
    pub const ALL: [SetOperation; 3] = [
        SetOperation::Union,
        SetOperation::Intersection,
        SetOperation::Difference,
    ];

    /// Parse an operation name, case-insensitively. Unknown names give `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "union" => Some(SetOperation::Union),
            "intersection" => Some(SetOperation::Intersection),
            "difference" => Some(SetOperation::Difference),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SetOperation::Union => "union",
            SetOperation::Intersection => "intersection",
            SetOperation::Difference => "difference",
        }
    }

    /// Combine two id sets.
    pub fn apply(&self, a: &BTreeSet<PaperId>, b: &BTreeSet<PaperId>) -> BTreeSet<PaperId> {
        match self {
            SetOperation::Union => a.union(b).copied().collect(),
            SetOperation::Intersection => a.intersection(b).copied().collect(),
            SetOperation::Difference => a.difference(b).copied().collect(),
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetOperation {
    type Err = BibliotopicError;

    fn from_str(s: &str) -> Result<Self> {
        SetOperation::parse(s).ok_or_else(|| {
            BibliotopicError::query(format!(
                "unknown set operation '{s}', expected union, intersection or difference"
            ))
        })
    }
}

/// Evaluates set operations against a repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionAlgebra;

impl CollectionAlgebra {
    pub fn new() -> Self {
        CollectionAlgebra
    }

    /// Combine two groups by operation name.
    ///
    /// An unrecognized name yields an empty list rather than an error. A
    /// missing group or member paper is reported as `NotFound`.
    pub fn combine(
        &self,
        repo: &dyn PaperRepository,
        first: GroupId,
        second: GroupId,
        operation: &str,
    ) -> Result<Vec<Paper>> {
        let Some(operation) = SetOperation::parse(operation) else {
            warn!("Unknown set operation '{operation}', returning no papers");
            return Ok(Vec::new());
        };
        self.combine_with(repo, first, second, operation)
    }

    /// Combine two groups with a typed operation.
    pub fn combine_with(
        &self,
        repo: &dyn PaperRepository,
        first: GroupId,
        second: GroupId,
        operation: SetOperation,
    ) -> Result<Vec<Paper>> {
        let a = repo.group(first)?;
        let b = repo.group(second)?;

        let ids = operation.apply(&a.papers, &b.papers);
        debug!(
            "{} of group {} ({}) and group {} ({}): {} papers",
            operation,
            first,
            a.len(),
            second,
            b.len(),
            ids.len()
        );

        ids.into_iter().map(|id| repo.paper(id)).collect()
    }
}
