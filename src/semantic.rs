//! Semantic embeddings from a local ONNX sentence encoder.
//!
//! Wraps fastembed, which downloads the model on first use and runs it on
//! ONNX Runtime. Inference threads are managed by the runtime itself.
//!
//! ## Performance
//!
//! Compression embeds the document once and every sentence once; haystack
//! search embeds every block. Sentences are embedded in one batch call so
//! the runtime can parallelize internally.

use crate::{Embedder, Error, Result};

/// Sentence embedder backed by fastembed.
///
/// ## Example
///
/// ```rust,ignore
/// use sift::{Embedder, FastEmbedder};
///
/// // Uses fastembed's default model (BGE-small-en)
/// let embedder = FastEmbedder::new()?;
/// let v = embedder.embed("Semantic compression keeps the important sentences.")?;
/// assert_eq!(v.len(), 384);
/// ```
pub struct FastEmbedder {
    model: fastembed::TextEmbedding,
    batch_size: Option<usize>,
}

impl FastEmbedder {
    /// Create an embedder with fastembed's default model.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding model fails to load.
    pub fn new() -> Result<Self> {
        Self::with_options(fastembed::InitOptions::default())
    }

    /// Create an embedder from explicit fastembed options (model, cache dir,
    /// execution providers).
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding model fails to load.
    pub fn with_options(options: fastembed::InitOptions) -> Result<Self> {
        let model = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| Error::Embedding(e.to_string()))?;

        Ok(Self {
            model,
            batch_size: None,
        })
    }

    /// Set the inference batch size used by [`Embedder::embed_batch`].
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| Error::Embedding("model returned no embedding".into()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let embeddings = self
            .model
            .embed(texts.to_vec(), self.batch_size)
            .map_err(|e| Error::Embedding(e.to_string()))?;
        if embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
