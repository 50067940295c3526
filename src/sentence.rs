//! Sentence splitting.
//!
//! The compressor selects whole sentences, so it needs them in document
//! order with a stable position each.
//!
//! ## The Hard Part: Finding Sentences
//!
//! Sentence detection seems simple until you encounter:
//!
//! ```text
//! "Dr. Smith went to Washington D.C. on Jan. 15th."
//!     ^                          ^       ^
//!     Not a sentence end (abbreviation)
//! ```
//!
//! We use Unicode Standard Annex #29 (UAX #29) for sentence segmentation,
//! then split each segment again on line breaks. Headings, list items and
//! table rows rarely end in punctuation, and without the second pass a
//! whole bulleted list would become one "sentence".
//!
//! ## Positions
//!
//! Every piece gets the index it has in the flattened list. Selection
//! reorders by that index, so two sentences with identical text keep their
//! own slots.

use unicode_segmentation::UnicodeSegmentation;

/// A sentence and its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// The trimmed sentence text.
    pub text: String,
    /// Zero-based position among the document's sentences.
    pub index: usize,
}

impl Sentence {
    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Split `text` into sentences, then each sentence on `\n`.
///
/// Pieces are trimmed; empty pieces are dropped.
///
/// ```rust
/// use sift::split_sentences;
///
/// let sentences = split_sentences("Intro\nFirst point. Second point.");
/// let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, vec!["Intro", "First point.", "Second point."]);
/// assert_eq!(sentences[2].index, 2);
/// ```
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    text.split_sentence_bounds()
        .flat_map(|sentence| sentence.split('\n'))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(index, piece)| Sentence {
            text: piece.to_string(),
            index,
        })
        .collect()
}

/// Uppercase the first character of `sentence`, leaving the rest untouched.
///
/// Unlike Python's `str.capitalize`, the remaining characters are not
/// lowercased, so acronyms and names inside the sentence keep their case.
///
/// ```rust
/// use sift::capitalize_first;
///
/// assert_eq!(
///     capitalize_first("the NASA probe reached ORBIT."),
///     "The NASA probe reached ORBIT."
/// );
/// ```
pub fn capitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
