//! Parser for the title query language.

use serde::{Deserialize, Serialize};

const AND_SEPARATOR: &str = " AND ";
const OR_SEPARATOR: &str = " OR ";

/// A predicate over paper titles.
///
/// Terms are stored lowercased and matched as case-insensitive substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// No constraint.
    All,
    /// The title contains the term.
    Term(String),
    /// The title contains every term.
    And(Vec<String>),
    /// The title contains at least one term.
    Or(Vec<String>),
}

impl Predicate {
    /// Evaluate the predicate against a title.
    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        match self {
            Predicate::All => true,
            Predicate::Term(term) => title.contains(term.as_str()),
            Predicate::And(terms) => terms.iter().all(|term| title.contains(term.as_str())),
            Predicate::Or(terms) => terms.iter().any(|term| title.contains(term.as_str())),
        }
    }

    /// The terms the predicate looks for.
    pub fn terms(&self) -> Vec<&str> {
        match self {
            Predicate::All => Vec::new(),
            Predicate::Term(term) => vec![term.as_str()],
            Predicate::And(terms) | Predicate::Or(terms) => {
                terms.iter().map(String::as_str).collect()
            }
        }
    }
}

/// Parses query strings into [`Predicate`]s.
///
/// Operators are not mixed: a query containing `" AND "` is split on it into
/// a conjunction, otherwise one containing `" OR "` is split into a
/// disjunction, otherwise its whitespace-separated words are ORed. Bare
/// `AND`/`OR` words are skipped and never searched for.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        QueryParser
    }

    pub fn parse(&self, query: &str) -> Predicate {
        if query.contains(AND_SEPARATOR) {
            Self::combine(query.split(AND_SEPARATOR), Predicate::And)
        } else if query.contains(OR_SEPARATOR) {
            Self::combine(query.split(OR_SEPARATOR), Predicate::Or)
        } else {
            Self::combine(query.split_whitespace(), Predicate::Or)
        }
    }

    fn combine<'a, I, F>(parts: I, join: F) -> Predicate
    where
        I: Iterator<Item = &'a str>,
        F: Fn(Vec<String>) -> Predicate,
    {
        let mut terms: Vec<String> = parts
            .map(str::trim)
            .filter(|term| !term.is_empty() && !Self::is_operator(term))
            .map(str::to_lowercase)
            .collect();

        match terms.len() {
            0 => Predicate::All,
            1 => Predicate::Term(terms.remove(0)),
            _ => join(terms),
        }
    }

    fn is_operator(term: &str) -> bool {
        term.eq_ignore_ascii_case("and") || term.eq_ignore_ascii_case("or")
    }
}
