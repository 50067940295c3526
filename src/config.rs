//! Compressor configuration.
//!
//! Process-wide settings are collected in one value and handed to
//! [`Compressor`](crate::Compressor) at construction. Per-call settings live
//! in [`CompressOptions`] and [`NeedleOptions`].
//!
//! ## Environment
//!
//! [`CompressorConfig::from_env`] starts from the defaults and applies any of:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `SIFT_NUM_TOPICS` | `num_topics` |
//! | `SIFT_TOPIC_SEED` | `topic_seed` |
//! | `SIFT_NGRAM_SIZE` | `ngram_size` |
//! | `SIFT_NGRAM_THRESHOLD` | `ngram_threshold` |

use crate::chunk::DEFAULT_TOKENS_PER_CHUNK;
use crate::topic::TopicModelConfig;
use crate::{Error, Result};

/// Settings shared by every call on one compressor.
///
/// # Examples
///
/// ```rust
/// use sift::CompressorConfig;
///
/// let config = CompressorConfig::default().with_num_topics(8).unwrap();
/// assert_eq!(config.num_topics(), 8);
/// assert!(CompressorConfig::default().with_num_topics(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorConfig {
    num_topics: usize,
    topic_seed: u64,
    topic_max_iter: usize,
    ngram_size: usize,
    ngram_threshold: usize,
}

impl CompressorConfig {
    /// Number of LDA topics fit per document.
    pub const fn num_topics(&self) -> usize {
        self.num_topics
    }

    /// Seed of the topic model's initialization.
    pub const fn topic_seed(&self) -> u64 {
        self.topic_seed
    }

    /// LDA passes over the sentences.
    pub const fn topic_max_iter(&self) -> usize {
        self.topic_max_iter
    }

    /// Word n-gram length used by repeated n-gram cleanup.
    pub const fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    /// An n-gram seen more than this many times is deduplicated.
    pub const fn ngram_threshold(&self) -> usize {
        self.ngram_threshold
    }

    /// Set the number of topics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTopicCount`] if `num_topics == 0`.
    pub fn with_num_topics(self, num_topics: usize) -> Result<Self> {
        if num_topics == 0 {
            return Err(Error::InvalidTopicCount);
        }
        Ok(Self { num_topics, ..self })
    }

    /// Set the topic model seed.
    #[must_use]
    pub const fn with_topic_seed(self, topic_seed: u64) -> Self {
        Self { topic_seed, ..self }
    }

    /// Set the number of LDA passes.
    #[must_use]
    pub const fn with_topic_max_iter(self, topic_max_iter: usize) -> Self {
        Self {
            topic_max_iter,
            ..self
        }
    }

    /// Set the repeated n-gram cleanup parameters.
    #[must_use]
    pub const fn with_ngram_cleanup(self, ngram_size: usize, ngram_threshold: usize) -> Self {
        Self {
            ngram_size,
            ngram_threshold,
            ..self
        }
    }

    /// Defaults overridden by `SIFT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] if a variable is set but does not parse,
    /// or [`Error::InvalidTopicCount`] if it sets zero topics.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(n) = parse_var(&lookup, "SIFT_NUM_TOPICS")? {
            config = config.with_num_topics(n)?;
        }
        if let Some(seed) = parse_var(&lookup, "SIFT_TOPIC_SEED")? {
            config = config.with_topic_seed(seed);
        }
        if let Some(size) = parse_var(&lookup, "SIFT_NGRAM_SIZE")? {
            config.ngram_size = size;
        }
        if let Some(threshold) = parse_var(&lookup, "SIFT_NGRAM_THRESHOLD")? {
            config.ngram_threshold = threshold;
        }
        Ok(config)
    }

    pub(crate) fn topic_model(&self) -> TopicModelConfig {
        TopicModelConfig {
            num_topics: self.num_topics,
            seed: self.topic_seed,
            max_iter: self.topic_max_iter,
            ..TopicModelConfig::default()
        }
    }
}

impl Default for CompressorConfig {
    fn default() -> Self {
        let topics = TopicModelConfig::default();
        Self {
            num_topics: topics.num_topics,
            topic_seed: topics.seed,
            topic_max_iter: topics.max_iter,
            ngram_size: 3,
            ngram_threshold: 3,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidEnv { key, value }),
    }
}

/// Per-call settings for [`Compressor::compress_text`](crate::Compressor::compress_text).
///
/// `compression_rate` is the fraction of words to remove: 0.7 keeps about
/// 30% of the text. When `target_token_count` is set it takes precedence and
/// the rate is derived from the document's token count.
///
/// ```rust
/// use sift::CompressOptions;
///
/// let opts = CompressOptions::default()
///     .with_target_token_count(200)
///     .with_reference_text("quarterly revenue");
/// assert_eq!(opts.compression_rate, 0.7);
/// assert_eq!(opts.target_token_count, Some(200));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompressOptions {
    /// Token budget; overrides `compression_rate` when set.
    pub target_token_count: Option<usize>,
    /// Fraction of the text to remove, in `[0, 1]`.
    pub compression_rate: f64,
    /// Text whose meaning should steer which sentences survive.
    pub reference_text: Option<String>,
}

impl CompressOptions {
    /// Remove `compression_rate` of the words.
    #[must_use]
    pub fn with_rate(mut self, compression_rate: f64) -> Self {
        self.compression_rate = compression_rate;
        self
    }

    /// Compress down to about `target_token_count` tokens.
    #[must_use]
    pub fn with_target_token_count(mut self, target_token_count: usize) -> Self {
        self.target_token_count = Some(target_token_count);
        self
    }

    /// Steer selection toward `reference_text`.
    #[must_use]
    pub fn with_reference_text(mut self, reference_text: impl Into<String>) -> Self {
        self.reference_text = Some(reference_text.into());
        self
    }
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            target_token_count: None,
            compression_rate: 0.7,
            reference_text: None,
        }
    }
}

/// Per-call settings for
/// [`Compressor::find_needle_in_haystack`](crate::Compressor::find_needle_in_haystack).
///
/// The weights need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeedleOptions {
    /// Tokens per haystack block.
    pub block_size: usize,
    /// Weight of semantic similarity.
    pub semantic_weight: f32,
    /// Weight of textual (character n-gram) similarity.
    pub textual_weight: f32,
}

impl NeedleOptions {
    /// Set the block size in tokens.
    #[must_use]
    pub const fn with_block_size(self, block_size: usize) -> Self {
        Self { block_size, ..self }
    }

    /// Set the semantic and textual weights.
    #[must_use]
    pub const fn with_weights(self, semantic_weight: f32, textual_weight: f32) -> Self {
        Self {
            semantic_weight,
            textual_weight,
            ..self
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("semantic_weight", self.semantic_weight),
            ("textual_weight", self.textual_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

impl Default for NeedleOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_TOKENS_PER_CHUNK,
            semantic_weight: 0.3,
            textual_weight: 0.7,
        }
    }
}
