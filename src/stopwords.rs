//! Stopword lists keyed by language.
//!
//! Topic modelling and lexical diversity both ignore function words. The
//! lists come from the `stop-words` crate.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::Language;

/// A lowercase stopword set for one language.
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Load the stopword list for `language`.
    pub fn new(language: Language) -> Self {
        let lang = match language {
            Language::English => LANGUAGE::English,
            Language::Portuguese => LANGUAGE::Portuguese,
        };
        Self {
            stopwords: get(lang).iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Create an empty filter (nothing is a stopword).
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// Create a filter from a custom list.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Whether `word` is a stopword, ignoring case.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Whether `word` is a stopword; `word` must already be lowercase.
    pub(crate) fn contains_lowercase(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Number of stopwords in the filter.
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Whether the filter is empty.
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
