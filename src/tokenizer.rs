//! Tokenizer adapter.
//!
//! Chunking and token budgets are expressed in tokens, not characters. Any
//! tokenizer can drive them as long as it round-trips content:
//! `decode(encode(text))` must give back the same text, modulo whitespace
//! normalization.
//!
//! ## The Default: Characters
//!
//! [`CharTokenizer`] maps every Unicode scalar value to one token. Every
//! token decodes on its own, so cutting a token stream anywhere still yields
//! valid text and concatenated chunks rebuild the input exactly:
//!
//! ```text
//! "olá" -> [111, 108, 225]   (3 tokens)
//! ```
//!
//! ## Bytes
//!
//! [`ByteTokenizer`] maps every UTF-8 byte to one token, which is what a
//! byte-level BPE tokenizer does before any merges are learned. It is
//! opt-in: a chunk boundary can fall inside a multi-byte character, and the
//! chunk then decodes with a U+FFFD replacement character.
//!
//! ```text
//! "olá" -> [111, 108, 195, 161]   (4 tokens, 3 chars)
//! ```

/// Encode text into token ids and back.
pub trait Tokenizer: Send + Sync {
    /// Encode text into a token sequence.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode a token sequence back into text.
    fn decode(&self, tokens: &[u32]) -> String;

    /// Number of tokens `text` encodes to.
    fn count_tokens(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// One token per Unicode scalar value.
///
/// ```rust
/// use sift::{CharTokenizer, Tokenizer};
///
/// let tok = CharTokenizer;
/// let ids = tok.encode("olá");
/// assert_eq!(ids, vec![111, 108, 225]);
/// assert_eq!(tok.decode(&ids[2..]), "á");
/// assert_eq!(tok.count_tokens("olá"), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    fn decode(&self, tokens: &[u32]) -> String {
        tokens
            .iter()
            .map(|&t| char::from_u32(t).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// One token per UTF-8 byte.
///
/// Chunks cut from a byte stream may split a character; prefer
/// [`CharTokenizer`] unless byte counts are what the budget means.
///
/// ```rust
/// use sift::{ByteTokenizer, Tokenizer};
///
/// let tok = ByteTokenizer;
/// let ids = tok.encode("hi!");
/// assert_eq!(ids, vec![104, 105, 33]);
/// assert_eq!(tok.decode(&ids), "hi!");
/// assert_eq!(tok.count_tokens("olá"), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteTokenizer;

impl Tokenizer for ByteTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.bytes().map(u32::from).collect()
    }

    fn decode(&self, tokens: &[u32]) -> String {
        // Ids above 255 cannot come from `encode`; they decode as replacement bytes.
        let bytes: Vec<u8> = tokens
            .iter()
            .map(|&t| u8::try_from(t).unwrap_or(0xFF))
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn count_tokens(&self, text: &str) -> usize {
        text.len()
    }
}
