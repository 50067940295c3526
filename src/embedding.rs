//! Embedding extractors and vector similarity.
//!
//! Two kinds of vectors are used:
//!
//! - **Semantic**: dense vectors from a sentence-embedding model, behind the
//!   [`Embedder`] trait. They capture meaning and match paraphrases.
//! - **Textual**: a bag of hashed character n-grams ([`HashedNgramEmbedder`]).
//!   It captures surface form and is a strong signal for literal matches.
//!
//! Vectors from different extractors live in different spaces and must never
//! be compared with each other.
//!
//! ## Hashed Character N-grams
//!
//! ```text
//! "ab c"  ->  1-grams: a b ␠ c
//!             2-grams: ab b␠ ␠c
//!             3-grams: ab␠ b␠c
//!             4-grams: ab␠c
//!
//! each n-gram -> hash -> bucket in [0, 512), sign from another hash bit
//! ```
//!
//! The signed buckets are summed and the result is L2-normalized. Two texts
//! with the same n-gram multiset get the same vector (up to collisions).

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::{Error, Result};

/// Number of buckets in the textual n-gram signature.
pub const TEXTUAL_FEATURES: usize = 512;

/// Largest character n-gram hashed into the textual signature.
pub const MAX_NGRAM_CHARS: usize = 6;

/// Produces embedding vectors for text.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector, and every vector from one embedder has the same length.
pub trait Embedder: Send + Sync {
    /// Embed one text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if the underlying model fails.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts. The default embeds them one by one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] if any text fails to embed.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Textual embedder: signed hashing of character 1..=6-grams into 512 buckets.
///
/// Text is lowercased and whitespace runs are collapsed to a single space
/// before n-grams are taken.
///
/// ```rust
/// use sift::{cosine_similarity, HashedNgramEmbedder};
///
/// let embedder = HashedNgramEmbedder::new();
/// let a = embedder.extract("The Quick  Fox");
/// let b = embedder.extract("the quick fox");
/// assert_eq!(a, b);
/// assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HashedNgramEmbedder;

impl HashedNgramEmbedder {
    /// Create a new textual embedder.
    pub const fn new() -> Self {
        Self
    }

    /// Compute the n-gram signature of `text`.
    pub fn extract(&self, text: &str) -> Vec<f32> {
        let normalized = normalize(text);
        let mut features = vec![0.0f32; TEXTUAL_FEATURES];

        // Byte offset of every char, plus the end
        let bounds: Vec<usize> = normalized
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(normalized.len()))
            .collect();
        let n_chars = bounds.len() - 1;

        for n in 1..=MAX_NGRAM_CHARS.min(n_chars) {
            for i in 0..=(n_chars - n) {
                let gram = &normalized[bounds[i]..bounds[i + n]];
                let (bucket, sign) = hash_feature(gram);
                features[bucket] += sign;
            }
        }

        l2_normalize(&mut features);
        features
    }
}

impl Embedder for HashedNgramEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.extract(text))
    }
}

/// Textual embedding of `text`; see [`HashedNgramEmbedder`].
pub fn extract_textual_embeddings(text: &str) -> Vec<f32> {
    HashedNgramEmbedder::new().extract(text)
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns 0.0 when either vector has zero norm.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    #[cfg(feature = "innr")]
    {
        Ok(innr::cosine(a, b))
    }

    #[cfg(not(feature = "innr"))]
    {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a > 0.0 && norm_b > 0.0 {
            Ok(dot / (norm_a * norm_b))
        } else {
            Ok(0.0)
        }
    }
}

/// Weighted blend `(1 - weight) * base + weight * steer`.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the lengths differ.
pub fn blend(base: &[f32], steer: &[f32], weight: f32) -> Result<Vec<f32>> {
    if base.len() != steer.len() {
        return Err(Error::DimensionMismatch {
            left: base.len(),
            right: steer.len(),
        });
    }
    Ok(base
        .iter()
        .zip(steer)
        .map(|(b, s)| (1.0 - weight) * b + weight * s)
        .collect())
}

/// Lowercase and collapse every whitespace run into one space.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

fn hash_feature(gram: &str) -> (usize, f32) {
    let mut hasher = FxHasher::default();
    hasher.write(gram.as_bytes());
    let h = hasher.finish();
    let bucket = (h % TEXTUAL_FEATURES as u64) as usize;
    let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
    (bucket, sign)
}

fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-9 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
