//! Title search and paper filtering.
//!
//! [`BooleanQuery`] implements the small `AND`/`OR` title query language and
//! [`PaperFilter`] composes it with year, keyword and scope filters.

pub mod filter;
pub mod parser;

use serde::{Deserialize, Serialize};

use crate::document::Paper;

pub use filter::PaperFilter;
pub use parser::{Predicate, QueryParser};

/// A parsed title query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanQuery {
    predicate: Predicate,
}

impl BooleanQuery {
    /// Parse a query string.
    ///
    /// ```
    /// use bibliotopic::query::{BooleanQuery, Predicate};
    ///
    /// let query = BooleanQuery::parse("Cancer AND diabetes");
    /// assert_eq!(
    ///     query.predicate(),
    ///     &Predicate::And(vec!["cancer".to_string(), "diabetes".to_string()])
    /// );
    /// ```
    pub fn parse(query: &str) -> Self {
        BooleanQuery {
            predicate: QueryParser::new().parse(query),
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Whether the paper's title satisfies the query.
    pub fn matches(&self, paper: &Paper) -> bool {
        self.predicate.matches(&paper.title)
    }

    /// The candidates that satisfy the query, in their original order.
    pub fn apply(&self, candidates: &[Paper]) -> Vec<Paper> {
        candidates
            .iter()
            .filter(|paper| self.matches(paper))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PaperId;

    fn candidates() -> Vec<Paper> {
        vec![
            Paper::new(PaperId(1), "Cancer risk factors"),
            Paper::new(PaperId(2), "Diabetes management"),
            Paper::new(PaperId(3), "Cancer and diabetes comorbidity"),
        ]
    }

    fn titles(papers: &[Paper]) -> Vec<&str> {
        papers.iter().map(|paper| paper.title.as_str()).collect()
    }

    #[test]
    fn test_and_query() {
        let result = BooleanQuery::parse("Cancer AND diabetes").apply(&candidates());
        assert_eq!(titles(&result), vec!["Cancer and diabetes comorbidity"]);
    }

    #[test]
    fn test_or_query() {
        let result = BooleanQuery::parse("Cancer OR diabetes").apply(&candidates());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_no_match() {
        let result = BooleanQuery::parse("xyz123").apply(&candidates());
        assert!(result.is_empty());
    }

    #[test]
    fn test_and_takes_precedence_over_or() {
        // Split on " AND " only; "risk OR diabetes" becomes one literal term.
        let query = BooleanQuery::parse("cancer AND risk OR diabetes");
        assert!(query.apply(&candidates()).is_empty());
    }

    #[test]
    fn test_operator_words_are_never_matched() {
        // Without " AND " the words are ORed and the bare "and" is skipped,
        // so the title "Cancer and diabetes comorbidity" is not matched by it.
        let result = BooleanQuery::parse("and management").apply(&candidates());
        assert_eq!(titles(&result), vec!["Diabetes management"]);
    }
}
