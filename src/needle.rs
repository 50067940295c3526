//! Needle-in-haystack retrieval.
//!
//! Finds the region of a long document most relevant to a short query.
//!
//! ```text
//! haystack ──► blocks of `block_size` tokens (no overlap)
//!
//!   [B0] [B1] [B2] [B3] [B4]
//!              ▲
//!   score = 0.3·semantic + 0.7·textual     (best: B2)
//!
//! result = B1 B2 B3   (best block plus one neighbour per side)
//! ```
//!
//! Textual similarity dominates by default: a literal needle shares its
//! character n-grams with the block containing it, while semantic
//! similarity alone happily matches a paraphrase elsewhere.
//!
//! The region is decoded from one contiguous token span, so even with a
//! byte tokenizer a character straddling a block boundary comes back intact.

use tracing::{debug, warn};

use crate::{
    cosine_similarity, Compressor, Error, HashedNgramEmbedder, NeedleOptions, Outcome, Result,
    TokenChunker,
};

/// Result of [`Compressor::find_needle_in_haystack`].
#[derive(Debug, Clone, PartialEq)]
pub struct NeedleMatch {
    /// The matched region, or the full haystack on fallback.
    pub text: String,
    /// Index of the best block, if the search ran.
    pub block: Option<usize>,
    /// Weighted similarity of the best block.
    pub score: Option<f32>,
    /// How `text` was produced.
    pub outcome: Outcome,
}

impl Compressor {
    /// Find the region of `haystack` most similar to `needle`.
    ///
    /// Never fails: on error the full haystack comes back with
    /// [`Outcome::Fallback`].
    pub fn find_needle_in_haystack(&self, haystack: &str, needle: &str, options: &NeedleOptions) -> NeedleMatch {
        match self.try_find_needle(haystack, needle, options) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "needle search failed, returning full haystack");
                NeedleMatch {
                    text: haystack.to_string(),
                    block: None,
                    score: None,
                    outcome: Outcome::Fallback(e),
                }
            }
        }
    }

    fn try_find_needle(&self, haystack: &str, needle: &str, options: &NeedleOptions) -> Result<NeedleMatch> {
        options.validate()?;
        let chunker = TokenChunker::no_overlap(options.block_size)?;
        let tokens = self.tokenizer.encode(haystack);
        let blocks = chunker.chunk_tokens(&*self.tokenizer, &tokens);

        let textual = HashedNgramEmbedder::new();
        let needle_semantic = self.embedder.embed(needle)?;
        let needle_textual = textual.extract(&needle.to_lowercase());

        let block_texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        let block_semantic = self.embedder.embed_batch(&block_texts)?;
        if block_semantic.len() != blocks.len() {
            return Err(Error::Embedding(format!(
                "expected {} block embeddings, got {}",
                blocks.len(),
                block_semantic.len()
            )));
        }

        let mut best: Option<(usize, f32)> = None;
        for (i, (block, semantic)) in blocks.iter().zip(&block_semantic).enumerate() {
            let semantic_sim = cosine_similarity(&needle_semantic, semantic)?;
            let textual_sim = cosine_similarity(&needle_textual, &textual.extract(&block.text.to_lowercase()))?;
            let score = options.semantic_weight * semantic_sim + options.textual_weight * textual_sim;
            // Strict comparison: the first block wins ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((i, score));
            }
        }
        let (index, score) = best.ok_or(Error::EmptyDocument)?;

        let first = &blocks[index.saturating_sub(1)];
        let last = &blocks[(index + 1).min(blocks.len() - 1)];
        let text = self.tokenizer.decode(&tokens[first.start..last.end]).trim().to_string();

        debug!(blocks = blocks.len(), best = index, score, "located needle");

        Ok(NeedleMatch {
            text,
            block: Some(index),
            score: Some(score),
            outcome: Outcome::Computed,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn compressor() -> Compressor {
        Compressor::new(Arc::new(HashedNgramEmbedder::new()))
    }

    #[test]
    fn test_region_includes_neighbours() {
        let haystack = "aaaa bbbb cccc dddd eeee ";
        let opts = NeedleOptions::default().with_block_size(5);
        let found = compressor().find_needle_in_haystack(haystack, "cccc", &opts);

        assert_eq!(found.block, Some(2));
        assert_eq!(found.text, "bbbb cccc dddd");
        assert_eq!(found.outcome, Outcome::Computed);
    }

    #[test]
    fn test_first_block_has_no_left_neighbour() {
        let haystack = "aaaa bbbb cccc dddd ";
        let opts = NeedleOptions::default().with_block_size(5);
        let found = compressor().find_needle_in_haystack(haystack, "aaaa", &opts);

        assert_eq!(found.block, Some(0));
        assert_eq!(found.text, "aaaa bbbb");
    }

    #[test]
    fn test_last_block_has_no_right_neighbour() {
        let haystack = "aaaa bbbb cccc dddd";
        let opts = NeedleOptions::default().with_block_size(5);
        let found = compressor().find_needle_in_haystack(haystack, "dddd", &opts);

        assert_eq!(found.block, Some(3));
        assert_eq!(found.text, "cccc dddd");
    }

    #[test]
    fn test_single_block_returns_whole_haystack() {
        let found = compressor().find_needle_in_haystack("  short text  ", "text", &NeedleOptions::default());
        assert_eq!(found.text, "short text");
        assert_eq!(found.block, Some(0));
    }

    #[test]
    fn test_invalid_block_size_falls_back() {
        let opts = NeedleOptions::default().with_block_size(0);
        let found = compressor().find_needle_in_haystack("haystack", "needle", &opts);

        assert_eq!(found.text, "haystack");
        assert_eq!(found.outcome, Outcome::Fallback(Error::InvalidChunkSize(0)));
    }

    #[test]
    fn test_blocks_keep_accented_characters() {
        let haystack = "ação café pães luz";
        let opts = NeedleOptions::default().with_block_size(5);
        let found = compressor().find_needle_in_haystack(haystack, "café", &opts);

        assert_eq!(found.block, Some(1));
        assert_eq!(found.text, "ação café pães");
        assert!(!found.text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_byte_blocks_decode_region_from_one_span() {
        // 'é' is two bytes and straddles the first block boundary
        let compressor = compressor().with_tokenizer(Arc::new(crate::ByteTokenizer));
        let opts = NeedleOptions::default().with_block_size(4);
        let found = compressor.find_needle_in_haystack("abcé zzzz", "abcé", &opts);
        assert!(found.text.starts_with("abcé"));
    }
}
