//! Extractive semantic compression.
//!
//! ## The Algorithm
//!
//! ```text
//! document
//!    │ split_sentences (UAX #29, then line breaks)
//!    ▼
//! [S0, S1, S2, S3, S4]                      detect language → stopwords
//!    │ score: 0.6·semantic + 0.3·topic + 0.2·lexical
//!    ▼
//! [S3: .81, S0: .77, S4: .52, S1: .40, S2: .12]
//!    │ accept in score order while words ≤ floor(total · rate)
//!    ▼
//! {S3, S0}
//!    │ restore document order, capitalize, join, dedup n-grams
//!    ▼
//! "S0 S3"
//! ```
//!
//! Selection stops at the first sentence that does not fit. If not even the
//! best sentence fits, the first sentence of the document is kept, so the
//! output is never empty.
//!
//! ## Rate vs Token Budget
//!
//! [`CompressOptions::compression_rate`] is the fraction to *remove*: 0.7
//! keeps about 30% of the words. A `target_token_count` instead keeps
//! `target / tokens(document)` of the words, and returns the document
//! untouched if it already fits.
//!
//! ## Failure
//!
//! Compression never fails outward. Any error (model failure, a document of
//! nothing but stopwords, a bad rate) returns the original text with
//! [`Outcome::Fallback`] carrying the reason.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::score::{SentenceScore, SentenceScorer, REFERENCE_WEIGHT};
use crate::sentence::capitalize_first;
use crate::{
    blend, compute_and_remove_repeated_ngrams, detect_language, split_sentences, structurize_text,
    CharTokenizer, CompressOptions, CompressorConfig, Embedder, Error, Language, LanguageDetector,
    Result, Sentence, StopwordFilter, StopwordLanguageDetector, Tokenizer,
};

/// How a top-level call produced its text.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The text was computed normally.
    Computed,
    /// The input already satisfied the request and was returned as is.
    Unchanged,
    /// Something failed; the untouched input was returned.
    Fallback(Error),
}

impl Outcome {
    /// Whether the call fell back to its input.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Result of [`Compressor::compress_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct Compression {
    /// The compressed text, or the original on [`Outcome::Unchanged`] and
    /// [`Outcome::Fallback`].
    pub text: String,
    /// How `text` was produced.
    pub outcome: Outcome,
}

/// Semantic compressor and haystack searcher.
///
/// Holds the long-lived, read-only collaborators: tokenizer, language
/// detector and semantic embedder. Everything fit to a document (the
/// vectorizer and topic model) is built inside each call and dropped on
/// return, so a compressor can be shared across threads.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use sift::{CompressOptions, Compressor, HashedNgramEmbedder};
///
/// // Any `Embedder` works; production code would use `FastEmbedder`.
/// let compressor = Compressor::new(Arc::new(HashedNgramEmbedder::new()));
///
/// let text = "Solar panels convert sunlight into electricity. \
///             Batteries store that electricity for the night. \
///             Inverters turn the stored direct current into alternating current. \
///             Some people paint their panels blue.";
/// let result = compressor.compress_text(text, &CompressOptions::default().with_rate(0.5));
///
/// assert!(!result.outcome.is_fallback());
/// assert!(result.text.split_whitespace().count() < text.split_whitespace().count());
/// ```
#[derive(Clone)]
pub struct Compressor {
    pub(crate) tokenizer: Arc<dyn Tokenizer>,
    pub(crate) detector: Arc<dyn LanguageDetector>,
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) config: CompressorConfig,
}

impl Compressor {
    /// Create a compressor around a semantic embedder, with the character
    /// tokenizer, the stopword language detector and default configuration.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            tokenizer: Arc::new(CharTokenizer),
            detector: Arc::new(StopwordLanguageDetector::new()),
            embedder,
            config: CompressorConfig::default(),
        }
    }

    /// Create a compressor backed by fastembed's default model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to load.
    #[cfg(feature = "semantic")]
    pub fn with_default_model() -> Result<Self> {
        Ok(Self::new(Arc::new(crate::FastEmbedder::new()?)))
    }

    /// Create a compressor backed by fastembed's default model.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::SemanticFeatureRequired`]; enable the
    /// `semantic` feature.
    #[cfg(not(feature = "semantic"))]
    pub fn with_default_model() -> Result<Self> {
        Err(Error::SemanticFeatureRequired)
    }

    /// Replace the tokenizer used for token counts and chunking.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the language detector.
    #[must_use]
    pub fn with_language_detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: CompressorConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Number of tokens in `text`.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }

    /// Split `text` into chunks of `tokens_per_chunk` tokens sharing
    /// `chunk_overlap` tokens; see [`structurize_text`].
    ///
    /// # Errors
    ///
    /// Returns an error for a zero chunk size or an overlap not smaller than it.
    pub fn structurize_text(&self, text: &str, tokens_per_chunk: usize, chunk_overlap: usize) -> Result<Vec<String>> {
        structurize_text(&*self.tokenizer, text, tokens_per_chunk, chunk_overlap)
    }

    /// Language of `text`.
    pub fn detect_language(&self, text: &str) -> Language {
        detect_language(&*self.detector, text)
    }

    /// Compress `text` by rate or token budget.
    ///
    /// Never fails: on error the original text comes back with
    /// [`Outcome::Fallback`].
    pub fn compress_text(&self, text: &str, options: &CompressOptions) -> Compression {
        match self.try_compress(text, options) {
            Ok(Some(compressed)) => Compression {
                text: compressed,
                outcome: Outcome::Computed,
            },
            Ok(None) => Compression {
                text: text.to_string(),
                outcome: Outcome::Unchanged,
            },
            Err(e) => {
                warn!(error = %e, "compression failed, returning original text");
                Compression {
                    text: text.to_string(),
                    outcome: Outcome::Fallback(e),
                }
            }
        }
    }

    /// `Ok(None)` when the text already fits the token budget.
    fn try_compress(&self, text: &str, options: &CompressOptions) -> Result<Option<String>> {
        let keep_rate = match options.target_token_count {
            None => 1.0 - validate_rate(options.compression_rate)?,
            Some(target) => {
                let original = self.count_tokens(text);
                if original <= target {
                    debug!(original, target, "text already within token budget");
                    return Ok(None);
                }
                target as f64 / original as f64
            }
        };

        self.semantic_compress_text(text, keep_rate, options.reference_text.as_deref())
            .map(Some)
    }

    /// Keep about `keep_rate` of the words of `text`, choosing the most
    /// important sentences.
    ///
    /// Unlike [`compress_text`](Self::compress_text) this returns errors
    /// instead of falling back.
    ///
    /// # Errors
    ///
    /// Returns an error if `keep_rate` is outside `[0, 1]`, the text has no
    /// sentences or no vocabulary after stopword removal, or embedding fails.
    pub fn semantic_compress_text(&self, text: &str, keep_rate: f64, reference_text: Option<&str>) -> Result<String> {
        let keep_rate = validate_rate(keep_rate)?;
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let language = self.detect_language(text);
        let stopwords = StopwordFilter::new(language);

        let mut doc_embedding = self.embedder.embed(text)?;
        if let Some(reference) = reference_text {
            let reference_embedding = self.embedder.embed(reference)?;
            doc_embedding = blend(&doc_embedding, &reference_embedding, REFERENCE_WEIGHT)?;
        }

        let scorer = SentenceScorer::new(&sentences, doc_embedding, stopwords, self.config.topic_model())?;

        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != sentences.len() {
            return Err(Error::Embedding(format!(
                "expected {} sentence embeddings, got {}",
                sentences.len(),
                embeddings.len()
            )));
        }

        let mut scores = scorer.score_all(&sentences, &embeddings)?;
        scores.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        let total_words: usize = sentences.iter().map(Sentence::word_count).sum();
        let target_words = (total_words as f64 * keep_rate).floor() as usize;
        let selected = select_within_budget(&sentences, &scores, target_words);

        debug!(
            language = %language,
            sentences = sentences.len(),
            selected = selected.len(),
            total_words,
            target_words,
            "selected sentences"
        );

        let joined = selected
            .iter()
            .map(|&i| capitalize_first(&sentences[i].text))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(compute_and_remove_repeated_ngrams(
            &joined,
            self.config.ngram_size(),
            self.config.ngram_threshold(),
        ))
    }
}

impl std::fmt::Debug for Compressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compressor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn validate_rate(rate: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(Error::InvalidCompressionRate(rate))
    }
}

/// Accept sentences in score order until the next one would exceed
/// `target_words`. Returns sentence positions in document order.
fn select_within_budget(sentences: &[Sentence], ranked: &[SentenceScore], target_words: usize) -> Vec<usize> {
    let mut selected = Vec::new();
    let mut words = 0;

    for score in ranked {
        let count = sentences[score.index].word_count();
        if words + count > target_words {
            break;
        }
        selected.push(score.index);
        words += count;
    }

    if selected.is_empty() {
        selected.push(0);
    }

    selected.sort_unstable();
    selected
}
