//! # Bibliotopic
//!
//! Topic discovery and collection algebra for bibliographic corpora.
//!
//! ## Features
//!
//! - Abstract normalization pipeline (lowercasing, number and punctuation
//!   stripping, stop words, lemmatization)
//! - Corpus vectorization with corpus-specific high-frequency term exclusion
//! - LDA topic models with the topic count chosen by NPMI coherence
//! - Generation-tagged topic assignment written back through a repository
//! - Union / intersection / difference over paper groups
//! - `AND` / `OR` title search composed with year, keyword and scope filters

pub mod analysis;
pub mod cli;
pub mod collection;
pub mod corpus;
pub mod document;
pub mod error;
pub mod query;
pub mod storage;
pub mod topic;

pub mod prelude {
    pub use crate::collection::{CollectionAlgebra, SetOperation};
    pub use crate::corpus::{Corpus, CorpusVectorizer};
    pub use crate::document::{GroupId, Paper, PaperGroup, PaperId};
    pub use crate::error::{BibliotopicError, Result};
    pub use crate::query::{BooleanQuery, PaperFilter};
    pub use crate::storage::PaperRepository;
    pub use crate::storage::memory::MemoryRepository;
    pub use crate::topic::pipeline::TopicDiscovery;
    pub use crate::topic::{DiscoveryConfig, RunId, Topic, TopicId, TopicModelRun};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
