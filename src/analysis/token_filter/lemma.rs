//! Lemmatizing token filter.
//!
//! Reduces inflected nouns to their dictionary form so that "trials" and
//! "trial" land on the same vocabulary entry. Unlike a stemmer, the output is
//! always a readable word, which matters because topic labels are built from
//! these lemmas.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for lemmatization algorithms.
pub trait Lemmatizer: Send + Sync {
    /// Reduce a lowercase word to its lemma.
    fn lemmatize(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

/// Irregular plural forms and their lemmas.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("appendices", "appendix"),
    ("children", "child"),
    ("crises", "crisis"),
    ("criteria", "criterion"),
    ("diagnoses", "diagnosis"),
    ("feet", "foot"),
    ("foci", "focus"),
    ("formulae", "formula"),
    ("fungi", "fungus"),
    ("geese", "goose"),
    ("halves", "half"),
    ("hypotheses", "hypothesis"),
    ("indices", "index"),
    ("knives", "knife"),
    ("larvae", "larva"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("loci", "locus"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("nuclei", "nucleus"),
    ("phenomena", "phenomenon"),
    ("prognoses", "prognosis"),
    ("selves", "self"),
    ("stimuli", "stimulus"),
    ("syntheses", "synthesis"),
    ("teeth", "tooth"),
    ("theses", "thesis"),
    ("vertices", "vertex"),
    ("wives", "wife"),
    ("women", "woman"),
];

/// Words that look plural but are their own lemma.
const INVARIANT_NOUNS: &[&str] = &[
    "aids", "always", "atlas", "bias", "biceps", "data", "diabetes", "economics", "genetics",
    "lens", "measles", "means", "mumps", "news", "physics", "rabies", "series", "species",
    "statistics", "thus",
];

static IRREGULAR_NOUN_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_NOUNS.iter().copied().collect());

static INVARIANT_NOUN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| INVARIANT_NOUNS.iter().copied().collect());

/// Noun lemmatizer backed by an exception dictionary and detachment rules.
///
/// Lookup order: irregular forms, invariant words, then suffix rules
/// (`sses→ss`, `ies→y`, `xes/zes/ches/shes→` stem, `s→`). Words of three
/// characters or fewer and `-ss`/`-us`/`-is` endings are left alone.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLemmatizer;

impl DictionaryLemmatizer {
    /// Create a new dictionary lemmatizer.
    pub fn new() -> Self {
        DictionaryLemmatizer
    }

    fn detach(word: &str) -> Option<String> {
        if word.chars().count() <= 3 {
            return None;
        }

        if let Some(stem) = word.strip_suffix("sses") {
            return Some(format!("{stem}ss"));
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if stem.chars().count() >= 2 {
                return Some(format!("{stem}y"));
            }
            return None;
        }

        for suffix in ["xes", "zes", "ches", "shes"] {
            if word.ends_with(suffix) {
                return Some(word[..word.len() - 2].to_string());
            }
        }

        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return None;
        }

        word.strip_suffix('s').map(str::to_string)
    }
}

impl Lemmatizer for DictionaryLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = IRREGULAR_NOUN_MAP.get(word) {
            return (*lemma).to_string();
        }

        if INVARIANT_NOUN_SET.contains(word) || !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }

        Self::detach(word).unwrap_or_else(|| word.to_string())
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}

/// Filter that replaces each token with its lemma.
#[derive(Clone)]
pub struct LemmaFilter {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl std::fmt::Debug for LemmaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmaFilter")
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl LemmaFilter {
    /// Create a new lemma filter with the dictionary lemmatizer.
    pub fn new() -> Self {
        LemmaFilter {
            lemmatizer: Arc::new(DictionaryLemmatizer::new()),
        }
    }

    /// Create a lemma filter with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        LemmaFilter { lemmatizer }
    }
}

impl Default for LemmaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let lemmatizer = Arc::clone(&self.lemmatizer);

        Ok(Box::new(tokens.map(move |token| {
            if token.is_stopped() {
                token
            } else {
                let lemma = lemmatizer.lemmatize(&token.text);
                token.with_text(lemma)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_regular_plurals() {
        let lemmatizer = DictionaryLemmatizer::new();

        assert_eq!(lemmatizer.lemmatize("trials"), "trial");
        assert_eq!(lemmatizer.lemmatize("vaccines"), "vaccine");
        assert_eq!(lemmatizer.lemmatize("diseases"), "disease");
        assert_eq!(lemmatizer.lemmatize("studies"), "study");
        assert_eq!(lemmatizer.lemmatize("policies"), "policy");
        assert_eq!(lemmatizer.lemmatize("classes"), "class");
        assert_eq!(lemmatizer.lemmatize("approaches"), "approach");
        assert_eq!(lemmatizer.lemmatize("boxes"), "box");
    }

    #[test]
    fn test_words_left_alone() {
        let lemmatizer = DictionaryLemmatizer::new();

        assert_eq!(lemmatizer.lemmatize("virus"), "virus");
        assert_eq!(lemmatizer.lemmatize("analysis"), "analysis");
        assert_eq!(lemmatizer.lemmatize("stress"), "stress");
        assert_eq!(lemmatizer.lemmatize("gas"), "gas");
        assert_eq!(lemmatizer.lemmatize("species"), "species");
        assert_eq!(lemmatizer.lemmatize("diabetes"), "diabetes");
        assert_eq!(lemmatizer.lemmatize("covid19"), "covid19");
    }

    #[test]
    fn test_irregular_nouns() {
        let lemmatizer = DictionaryLemmatizer::new();

        assert_eq!(lemmatizer.lemmatize("women"), "woman");
        assert_eq!(lemmatizer.lemmatize("children"), "child");
        assert_eq!(lemmatizer.lemmatize("analyses"), "analysis");
        assert_eq!(lemmatizer.lemmatize("criteria"), "criterion");
    }

    #[test]
    fn test_lemma_filter() {
        let filter = LemmaFilter::new();
        let tokens = vec![
            Token::new("trials", 0),
            Token::new("women", 1),
            Token::new("studies", 2).stop(),
        ];

        let result: Vec<Token> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();

        assert_eq!(result[0].text, "trial");
        assert_eq!(result[0].original_text.as_deref(), Some("trials"));
        assert_eq!(result[1].text, "woman");
        assert_eq!(result[2].text, "studies"); // Stopped tokens are not processed
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(LemmaFilter::new().name(), "lemma");
    }
}
