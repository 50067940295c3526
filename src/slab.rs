//! The Slab type: a decoded chunk with its token span.

/// A chunk of text with its position in the source token stream.
///
/// Each slab is a self-contained piece that can be embedded and scored
/// independently, as the haystack search does.
///
/// ## Token Offsets
///
/// `start` and `end` index the token sequence the text was encoded to, not
/// bytes or characters. Decoding `tokens[start..end]` gives back `text`:
///
/// ```rust
/// use sift::{CharTokenizer, Slab, Tokenizer};
///
/// let tok = CharTokenizer;
/// let tokens = tok.encode("Hello, world!");
/// let slab = Slab::new("world", 7, 12, 0);
///
/// assert_eq!(tok.decode(&tokens[slab.span()]), slab.text);
/// ```
///
/// ## Overlap Handling
///
/// With a chunk overlap of `k`, slab `i + 1` starts `k` tokens before slab
/// `i` ends:
///
/// ```text
/// Tokens:  t0 t1 t2 t3 t4 t5 t6      size 4, overlap 1
/// Slab 0:  t0 t1 t2 t3               [0..4]
/// Slab 1:           t3 t4 t5 t6      [3..7]
///                   ^
///               shared token
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slab {
    /// The decoded chunk text.
    pub text: String,
    /// Token offset where this chunk starts.
    pub start: usize,
    /// Token offset where this chunk ends (exclusive).
    pub end: usize,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
}

impl Slab {
    /// Create a new slab.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize, index: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            index,
        }
    }

    /// Number of tokens in this chunk.
    #[must_use]
    pub fn token_len(&self) -> usize {
        self.end - self.start
    }

    /// Whether this chunk holds no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The token span of this chunk.
    #[must_use]
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl std::fmt::Display for Slab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Slab {{ index: {}, tokens: {}..{}, len: {} }}",
            self.index,
            self.start,
            self.end,
            self.token_len()
        )
    }
}
