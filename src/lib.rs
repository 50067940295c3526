//! # sift
//!
//! Extractive semantic compression: make a document shorter by keeping its
//! most important sentences, verbatim.
//!
//! ## The Problem
//!
//! Language models have context windows and token bills. Retrieved documents
//! are longer than the question needs. Abstractive summarization rewrites
//! text and can invent facts; truncation throws away whatever happens to
//! come last.
//!
//! Extractive compression sits in between: every output sentence is an input
//! sentence, and only the least informative ones are dropped.
//!
//! ## Scoring Sentences
//!
//! Each sentence gets an importance score from three signals:
//!
//! ```text
//! importance = 0.6 · cos(doc_embedding, sentence_embedding)   semantic centrality
//!            + 0.3 · max(topic distribution)                  topic dominance
//!            + 0.2 · unique non-stopwords / words             lexical diversity
//! ```
//!
//! The topic model is a small LDA fit over the document's own sentences on
//! every call. Nothing carries over between calls.
//!
//! ## Selecting Sentences
//!
//! ```text
//! Words: 100, compression_rate: 0.7  →  keep floor(100 · 0.3) = 30 words
//!
//! ranked:   S4(12w)  S1(10w)  S7(9w)  S2(14w) ...
//! running:    12       22       31 ✗  stop
//! output:   S1 S4   (document order)
//! ```
//!
//! A reference text can steer the ranking: the document embedding becomes
//! `0.6 · doc + 0.4 · reference`.
//!
//! ## Needle in a Haystack
//!
//! [`Compressor::find_needle_in_haystack`] cuts a long document into token
//! blocks, scores each against a short query with a blend of semantic and
//! character n-gram similarity, and returns the best block with one
//! neighbour on each side.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sift::{CompressOptions, Compressor, HashedNgramEmbedder, NeedleOptions};
//!
//! // With the `semantic` feature: Compressor::with_default_model()?
//! let compressor = Compressor::new(Arc::new(HashedNgramEmbedder::new()));
//!
//! let text = "Rust guarantees memory safety without a garbage collector. \
//!             Ownership rules are checked at compile time. \
//!             The mascot is a crab named Ferris. \
//!             Borrowing lets functions use data without taking ownership.";
//!
//! let short = compressor.compress_text(text, &CompressOptions::default());
//! assert!(!short.text.is_empty());
//!
//! let budgeted = compressor.compress_text(text, &CompressOptions::default().with_target_token_count(10_000));
//! assert_eq!(budgeted.text, text); // already fits
//!
//! let found = compressor.find_needle_in_haystack(text, "crab named Ferris", &NeedleOptions::default());
//! assert!(found.text.contains("Ferris"));
//! ```
//!
//! ## Failure Is Not an Error
//!
//! The top-level calls never fail. If anything goes wrong they return their
//! input untouched, and say so in [`Outcome`]:
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | `Computed` | Normal result |
//! | `Unchanged` | Input already within the token budget |
//! | `Fallback(e)` | Error `e`; input returned as is |
//!
//! The lower-level pieces ([`Compressor::semantic_compress_text`],
//! [`structurize_text`], [`TopicModel`]) return [`Result`] instead.

mod chunk;
mod compress;
mod config;
mod dedup;
mod embedding;
mod error;
mod language;
mod needle;
mod score;
mod sentence;
mod slab;
mod stopwords;
mod tokenizer;
mod topic;

#[cfg(feature = "semantic")]
mod semantic;

pub use chunk::{structurize_text, TokenChunker, DEFAULT_TOKENS_PER_CHUNK};
pub use compress::{Compression, Compressor, Outcome};
pub use config::{CompressOptions, CompressorConfig, NeedleOptions};
pub use dedup::compute_and_remove_repeated_ngrams;
pub use embedding::{
    blend, cosine_similarity, extract_textual_embeddings, Embedder, HashedNgramEmbedder,
    MAX_NGRAM_CHARS, TEXTUAL_FEATURES,
};
pub use error::{Error, Result};
pub use language::{detect_language, Language, LanguageDetector, StopwordLanguageDetector};
pub use needle::NeedleMatch;
pub use score::{
    lexical_diversity, SentenceScore, SentenceScorer, LEXICAL_WEIGHT, REFERENCE_WEIGHT,
    SEMANTIC_WEIGHT, TOPIC_WEIGHT,
};
pub use sentence::{capitalize_first, split_sentences, Sentence};
pub use slab::Slab;
pub use stopwords::StopwordFilter;
pub use tokenizer::{ByteTokenizer, CharTokenizer, Tokenizer};
pub use topic::{TermCounts, TermVectorizer, TopicModel, TopicModelConfig};

#[cfg(feature = "semantic")]
pub use semantic::FastEmbedder;

#[cfg(feature = "whatlang")]
pub use language::WhatlangDetector;
