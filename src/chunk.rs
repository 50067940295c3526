//! Fixed token-count chunking with overlap.
//!
//! The text is encoded once and the token stream is cut every `size` tokens.
//! Each new chunk is seeded with the last `overlap` tokens of the previous one.
//!
//! ## How It Works
//!
//! ```text
//! size = 4, overlap = 1
//!
//! Tokens:  a b c d e f g h i j
//!
//! Chunk 0: a b c d        [0..4]
//! Chunk 1: d e f g        [3..7]   <- seeded with "d"
//! Chunk 2: g h i j        [6..10]  <- seeded with "g"
//! ```
//!
//! The final chunk is always emitted, however short. Empty input still
//! yields one (empty) chunk, so callers always get something to index.
//!
//! ## Why Tokens?
//!
//! Embedding models and prompt budgets are measured in tokens. Cutting on
//! tokens keeps every chunk under the model limit regardless of script or
//! word length.

use crate::{Error, Result, Slab, Tokenizer};

/// Token chunk size used by the haystack search unless configured otherwise.
pub const DEFAULT_TOKENS_PER_CHUNK: usize = 300;

/// Token-count chunker with configurable overlap.
///
/// ## Example
///
/// ```rust
/// use sift::{CharTokenizer, TokenChunker};
///
/// let chunker = TokenChunker::new(10, 2).unwrap();
/// let slabs = chunker.chunk(&CharTokenizer, "abcdefghijklmnopqrstuvwxyz");
///
/// assert_eq!(slabs[0].text, "abcdefghij");
/// assert_eq!(slabs[1].start, 8); // 10 - 2 overlap
/// assert_eq!(slabs[1].text, "ijklmnopqr");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenChunker {
    size: usize,
    overlap: usize,
}

impl TokenChunker {
    /// Create a new token chunker.
    ///
    /// # Arguments
    ///
    /// * `size` - Maximum tokens per chunk
    /// * `overlap` - Tokens shared between adjacent chunks
    ///
    /// # Errors
    ///
    /// Returns an error if `size == 0` or `overlap >= size`.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidChunkSize(size));
        }
        if overlap >= size {
            return Err(Error::OverlapExceedsSize { size, overlap });
        }
        Ok(Self { size, overlap })
    }

    /// Create a chunker with no overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if `size == 0`.
    pub fn no_overlap(size: usize) -> Result<Self> {
        Self::new(size, 0)
    }

    /// Maximum tokens per chunk.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Tokens shared between adjacent chunks.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }

    /// Encode `text` and split it into chunks.
    pub fn chunk(&self, tokenizer: &dyn Tokenizer, text: &str) -> Vec<Slab> {
        let tokens = tokenizer.encode(text);
        self.chunk_tokens(tokenizer, &tokens)
    }

    /// Split an already encoded token stream into chunks.
    ///
    /// Slab spans index into `tokens`.
    pub fn chunk_tokens(&self, tokenizer: &dyn Tokenizer, tokens: &[u32]) -> Vec<Slab> {
        let mut slabs = Vec::with_capacity(self.estimate_chunks(tokens.len()));
        let mut start = 0;

        for i in 0..tokens.len() {
            if i - start + 1 > self.size {
                slabs.push(Self::slab(tokenizer, tokens, start, i, slabs.len()));
                // Seed with the trailing overlap, unless the stream is still shorter than it
                start = if i > self.overlap { i - self.overlap } else { i };
            }
        }

        slabs.push(Self::slab(tokenizer, tokens, start, tokens.len(), slabs.len()));
        slabs
    }

    /// Expected number of chunks for a stream of `token_len` tokens.
    #[must_use]
    pub fn estimate_chunks(&self, token_len: usize) -> usize {
        if token_len <= self.size {
            return 1;
        }
        let step = self.size - self.overlap;
        1 + (token_len - self.size).div_ceil(step)
    }

    fn slab(tokenizer: &dyn Tokenizer, tokens: &[u32], start: usize, end: usize, index: usize) -> Slab {
        Slab::new(tokenizer.decode(&tokens[start..end]), start, end, index)
    }
}

impl Default for TokenChunker {
    fn default() -> Self {
        Self {
            size: DEFAULT_TOKENS_PER_CHUNK,
            overlap: 0,
        }
    }
}

/// Split `text` into decoded chunks of at most `tokens_per_chunk` tokens.
///
/// Consecutive chunks share exactly `chunk_overlap` tokens.
///
/// ```rust
/// use sift::{structurize_text, CharTokenizer};
///
/// let chunks = structurize_text(&CharTokenizer, "abcdefgh", 3, 0).unwrap();
/// assert_eq!(chunks, vec!["abc", "def", "gh"]);
/// ```
///
/// # Errors
///
/// Returns an error if `tokens_per_chunk == 0` or
/// `chunk_overlap >= tokens_per_chunk`.
pub fn structurize_text(
    tokenizer: &dyn Tokenizer,
    text: &str,
    tokens_per_chunk: usize,
    chunk_overlap: usize,
) -> Result<Vec<String>> {
    let chunker = TokenChunker::new(tokens_per_chunk, chunk_overlap)?;
    Ok(chunker
        .chunk(tokenizer, text)
        .into_iter()
        .map(|slab| slab.text)
        .collect())
}
