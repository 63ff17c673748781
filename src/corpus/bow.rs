//! Sparse bag-of-words vectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::corpus::vocabulary::TermId;

/// Sparse term-count vector of one document.
///
/// Entries are sorted by term id and never hold a zero count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagOfWords {
    entries: Vec<(TermId, u32)>,
}

impl BagOfWords {
    /// Build a vector from a sequence of term ids, counting repeats.
    pub fn from_terms<I>(terms: I) -> Self
    where
        I: IntoIterator<Item = TermId>,
    {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for term in terms {
            *counts.entry(term).or_insert(0) += 1;
        }

        BagOfWords {
            entries: counts.into_iter().collect(),
        }
    }

    /// The `(term, count)` entries in term id order.
    pub fn entries(&self) -> &[(TermId, u32)] {
        &self.entries
    }

    /// Count of a single term.
    pub fn count(&self, term: TermId) -> u32 {
        self.entries
            .binary_search_by_key(&term, |(id, _)| *id)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no surviving term.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| *count as u64).sum()
    }

    /// Expand the vector back into one term id per occurrence.
    pub fn occurrences(&self) -> impl Iterator<Item = TermId> + '_ {
        self.entries
            .iter()
            .flat_map(|(term, count)| std::iter::repeat_n(*term, *count as usize))
    }
}
