//! Bibliographic records.
//!
//! # Core Components
//!
//! - [`paper::Paper`] - A paper with its metadata and optional topic
//! - [`group::PaperGroup`] - A named set of papers used by the collection algebra
//! - [`converter`] - Importing paper records from JSON / JSONL files
//!
//! # Examples
//!
//! ```
//! use bibliotopic::document::{Paper, PaperId};
//!
//! let paper = Paper::new(PaperId(1), "Cancer risk factors")
//!     .with_abstract("Smoking and obesity are leading risk factors.")
//!     .with_year(2021)
//!     .with_authors(vec!["Ada Lovelace".to_string()]);
//!
//! assert_eq!(paper.title, "Cancer risk factors");
//! assert!(paper.topic.is_none());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod converter;
pub mod group;
pub mod paper;

pub use group::PaperGroup;
pub use paper::Paper;

/// Identifier of a paper in the record store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PaperId(pub u64);

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a paper group in the record store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
