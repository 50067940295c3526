//! Language detection.
//!
//! Only the stopword list depends on the language, so the detector only has
//! to tell Portuguese from everything else. Anything not recognized as
//! Portuguese is treated as English.
//!
//! The built-in detector votes with stopword lists. The `langid` feature
//! adds [`WhatlangDetector`](crate::WhatlangDetector), a trigram model that
//! knows many more languages.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;

use crate::StopwordFilter;

/// A supported document language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    /// English, also the fallback for unrecognized text.
    #[default]
    English,
    /// Portuguese.
    Portuguese,
}

impl Language {
    /// Two-letter code: `en` or `pt`.
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Portuguese => "pt",
        }
    }

    /// Map a classifier label to a language.
    ///
    /// Accepts fastText style labels (`__label__pt`), names (`portuguese`)
    /// and codes (`pt`). Everything else maps to English.
    ///
    /// ```rust
    /// use sift::Language;
    ///
    /// assert_eq!(Language::from_label("__label__pt"), Language::Portuguese);
    /// assert_eq!(Language::from_label("portuguese"), Language::Portuguese);
    /// assert_eq!(Language::from_label("__label__de"), Language::English);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        let label = label.strip_prefix("__label__").unwrap_or(&label);
        match label {
            "pt" | "portuguese" => Self::Portuguese,
            _ => Self::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classifies text into a [`Language`].
///
/// Implementations receive text with newlines already flattened to spaces
/// and return a single top-1 guess.
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`.
    fn detect(&self, text: &str) -> Language;
}

/// Stopword-vote language detector.
///
/// Counts how many words of the text appear in each language's stopword list
/// and picks Portuguese only when it strictly wins. Function words dominate
/// any running text, which makes this reliable on sentences and up.
///
/// ```rust
/// use sift::{Language, LanguageDetector, StopwordLanguageDetector};
///
/// let detector = StopwordLanguageDetector::new();
/// assert_eq!(detector.detect("O gato está em cima da mesa e não quer sair"), Language::Portuguese);
/// assert_eq!(detector.detect("The cat is on the table and does not want to leave"), Language::English);
/// ```
#[derive(Debug, Clone)]
pub struct StopwordLanguageDetector {
    english: StopwordFilter,
    portuguese: StopwordFilter,
}

impl StopwordLanguageDetector {
    /// Create a detector with the bundled stopword lists.
    pub fn new() -> Self {
        Self {
            english: StopwordFilter::new(Language::English),
            portuguese: StopwordFilter::new(Language::Portuguese),
        }
    }
}

impl Default for StopwordLanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for StopwordLanguageDetector {
    fn detect(&self, text: &str) -> Language {
        let (mut en, mut pt) = (0usize, 0usize);
        for word in text.unicode_words() {
            let word = word.to_lowercase();
            en += usize::from(self.english.contains_lowercase(&word));
            pt += usize::from(self.portuguese.contains_lowercase(&word));
        }
        if pt > en {
            Language::Portuguese
        } else {
            Language::English
        }
    }
}

/// Trigram-model language detector backed by `whatlang`.
///
/// Takes the top-1 guess over all languages whatlang knows; anything but
/// Portuguese maps to English.
///
/// ```rust
/// use sift::{Language, LanguageDetector, WhatlangDetector};
///
/// let detector = WhatlangDetector;
/// assert_eq!(
///     detector.detect("A equipe de pesquisa publicou os resultados do estudo ontem à tarde."),
///     Language::Portuguese
/// );
/// ```
#[cfg(feature = "whatlang")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

#[cfg(feature = "whatlang")]
impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Language {
        match whatlang::detect_lang(text) {
            Some(whatlang::Lang::Por) => Language::Portuguese,
            _ => Language::English,
        }
    }
}

/// Detect the language of `text` after flattening newlines.
pub fn detect_language(detector: &dyn LanguageDetector, text: &str) -> Language {
    detector.detect(&text.replace('\n', " "))
}
