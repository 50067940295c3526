//! Behaviour tests for compression and haystack search.
//!
//! These run without a model: the semantic embedder is either the hashed
//! n-gram embedder or a small keyword-count embedder whose similarities can
//! be worked out by hand.

use std::sync::Arc;

use sift::{
    CompressOptions, Compressor, CompressorConfig, Embedder, Error, HashedNgramEmbedder, Language,
    NeedleOptions, Outcome, Result,
};

// =============================================================================
// Test Embedders
// =============================================================================

/// Counts keyword occurrences; one dimension per keyword.
struct KeywordEmbedder(&'static [&'static str]);

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(self.0.iter().map(|k| lower.matches(k).count() as f32).collect())
    }
}

/// Always fails, like a model whose runtime went away.
struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::Embedding("model offline".into()))
    }
}

fn hashed() -> Compressor {
    Compressor::new(Arc::new(HashedNgramEmbedder::new()))
}

const ARTICLE: &str = "The city council approved a new budget on Tuesday. \
    Funding for public libraries will increase by ten percent. \
    Several residents spoke about road repairs during the meeting. \
    The mayor said the library expansion would open next spring. \
    A local bakery donated pastries to everyone who attended. \
    Council members will review transportation spending in March. \
    Parking fees downtown remain unchanged this year.";

fn words(text: &str) -> usize {
    text.split_whitespace().count()
}

// =============================================================================
// Compression
// =============================================================================

#[test]
fn compression_shortens_text() {
    let result = hashed().compress_text(ARTICLE, &CompressOptions::default());

    assert_eq!(result.outcome, Outcome::Computed);
    assert!(!result.text.is_empty());
    assert!(words(&result.text) < words(ARTICLE));
}

#[test]
fn compression_respects_word_budget() {
    for rate in [0.1, 0.3, 0.5, 0.7, 0.9] {
        let result = hashed().compress_text(ARTICLE, &CompressOptions::default().with_rate(rate));
        let budget = (words(ARTICLE) as f64 * (1.0 - rate)).floor() as usize;
        let first_sentence = words("The city council approved a new budget on Tuesday.");

        assert!(
            words(&result.text) <= budget.max(first_sentence),
            "rate {rate}: {} words > budget {budget}",
            words(&result.text)
        );
    }
}

#[test]
fn compression_preserves_sentence_order() {
    let result = hashed().compress_text(ARTICLE, &CompressOptions::default().with_rate(0.5));

    let mut last = 0;
    for sentence in sift::split_sentences(&result.text) {
        let pos = ARTICLE
            .find(&sentence.text)
            .unwrap_or_else(|| panic!("{:?} not in source", sentence.text));
        assert!(pos >= last, "sentence out of order: {:?}", sentence.text);
        last = pos;
    }
}

#[test]
fn zero_rate_keeps_everything_including_duplicates() {
    let text = "Alpha beta. Gamma delta. Alpha beta.";
    let result = hashed().compress_text(text, &CompressOptions::default().with_rate(0.0));
    assert_eq!(result.text, text);
}

#[test]
fn full_rate_keeps_first_sentence() {
    let text = "First sentence here. Second sentence there. Third sentence everywhere.";
    let result = hashed().compress_text(text, &CompressOptions::default().with_rate(1.0));
    assert_eq!(result.text, "First sentence here.");
}

#[test]
fn selected_sentences_are_capitalized() {
    let text = "lowercase opening words appear here.\nanother lowercase sentence follows.";
    let result = hashed().compress_text(text, &CompressOptions::default().with_rate(0.0));
    assert_eq!(
        result.text,
        "Lowercase opening words appear here. Another lowercase sentence follows."
    );
}

#[test]
fn reference_text_steers_selection() {
    const KEYWORDS: &[&str] = &["solar", "energy", "pancake", "syrup"];
    // One topic and stopword-free sentences: only semantic similarity differs
    let compressor = Compressor::new(Arc::new(KeywordEmbedder(KEYWORDS)))
        .with_config(CompressorConfig::default().with_num_topics(1).unwrap());
    let text = "Solar panels harvest energy. Pancake syrup tastes sweet. \
                Solar turbines spin. Solar energy grids expand.";

    // 15 words, keep 4: exactly one sentence
    let plain = compressor.semantic_compress_text(text, 0.27, None).unwrap();
    assert_eq!(plain, "Solar panels harvest energy.");

    let steered = compressor
        .semantic_compress_text(text, 0.27, Some("pancake syrup pancake syrup pancake syrup"))
        .unwrap();
    assert_eq!(steered, "Pancake syrup tastes sweet.");
}

#[test]
fn repeated_phrases_are_cleaned() {
    let text = "Buy it now. Buy it now. Buy it now. Buy it now. Buy it now. Last chance.";
    let result = hashed().compress_text(text, &CompressOptions::default().with_rate(0.0));
    assert_eq!(result.text, "Buy it now. Last chance.");
}

#[test]
fn portuguese_text_compresses() {
    let text = "O conselho aprovou o novo orçamento na terça-feira. \
                As bibliotecas públicas vão receber mais recursos. \
                Vários moradores falaram sobre a reforma das estradas. \
                A padaria local doou pães para todos os presentes.";
    let compressor = hashed();

    assert_eq!(compressor.detect_language(text), Language::Portuguese);
    let result = compressor.compress_text(text, &CompressOptions::default());
    assert_eq!(result.outcome, Outcome::Computed);
    assert!(words(&result.text) < words(text));
}

// =============================================================================
// Token Budgets
// =============================================================================

#[test]
fn target_token_count_short_circuits() {
    let compressor = hashed();
    let tokens = compressor.count_tokens(ARTICLE);

    for target in [tokens, tokens + 1, tokens * 2] {
        let result = compressor.compress_text(ARTICLE, &CompressOptions::default().with_target_token_count(target));
        assert_eq!(result.text, ARTICLE);
        assert_eq!(result.outcome, Outcome::Unchanged);
    }
}

#[test]
fn target_token_count_overrides_rate() {
    let compressor = hashed();
    let target = compressor.count_tokens(ARTICLE) / 2;

    // A rate of 0.0 alone would keep everything
    let options = CompressOptions::default().with_rate(0.0).with_target_token_count(target);
    let result = compressor.compress_text(ARTICLE, &options);

    assert_eq!(result.outcome, Outcome::Computed);
    assert!(compressor.count_tokens(&result.text) < compressor.count_tokens(ARTICLE));
}

// =============================================================================
// Fallbacks
// =============================================================================

#[test]
fn failing_embedder_returns_original_text() {
    let compressor = Compressor::new(Arc::new(FailingEmbedder));
    let result = compressor.compress_text(ARTICLE, &CompressOptions::default());

    assert_eq!(result.text, ARTICLE);
    assert_eq!(
        result.outcome,
        Outcome::Fallback(Error::Embedding("model offline".into()))
    );
}

#[test]
fn failing_embedder_returns_full_haystack() {
    let compressor = Compressor::new(Arc::new(FailingEmbedder));
    let found = compressor.find_needle_in_haystack(ARTICLE, "bakery", &NeedleOptions::default());

    assert_eq!(found.text, ARTICLE);
    assert!(found.outcome.is_fallback());
    assert_eq!(found.block, None);
}

#[test]
fn invalid_rate_falls_back() {
    let result = hashed().compress_text(ARTICLE, &CompressOptions::default().with_rate(1.5));
    assert_eq!(result.text, ARTICLE);
    assert_eq!(result.outcome, Outcome::Fallback(Error::InvalidCompressionRate(1.5)));
}

#[test]
fn stopword_only_text_falls_back() {
    let text = "It is what it is. And so it was.";
    let result = hashed().compress_text(text, &CompressOptions::default());
    assert_eq!(result.text, text);
    assert_eq!(result.outcome, Outcome::Fallback(Error::EmptyVocabulary));
}

#[test]
fn empty_text_falls_back() {
    for text in ["", "   \n  "] {
        let result = hashed().compress_text(text, &CompressOptions::default());
        assert_eq!(result.text, text);
        assert_eq!(result.outcome, Outcome::Fallback(Error::EmptyDocument));
    }
}

#[test]
fn dimension_mismatch_falls_back() {
    struct Ragged;
    impl Embedder for Ragged {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; 1 + text.len() % 3])
        }
    }

    let result = Compressor::new(Arc::new(Ragged)).compress_text(ARTICLE, &CompressOptions::default());
    assert_eq!(result.text, ARTICLE);
    assert!(matches!(
        result.outcome,
        Outcome::Fallback(Error::DimensionMismatch { .. })
    ));
}

// =============================================================================
// Needle in a Haystack
// =============================================================================

const PARAGRAPHS: [&str; 6] = [
    "Glaciers carve valleys over thousands of years, grinding rock into fine silt that rivers carry far away. ",
    "The orchestra tuned their instruments while the conductor studied the score of the new symphony. ",
    "Volunteers planted two hundred oak saplings along the riverbank to slow erosion after the floods. ",
    "The password for the archive room is written on a yellow card taped under the third drawer. ",
    "Migrating geese follow the same flyways each autumn, resting on lakes where food is plentiful. ",
    "A small bakery on the corner sells cinnamon rolls that sell out before eight every morning. ",
];

#[test]
fn needle_is_found_in_its_paragraph() {
    let haystack: String = PARAGRAPHS.concat();
    let compressor = hashed();
    let opts = NeedleOptions::default().with_block_size(100);

    for (needle, paragraph) in [
        ("yellow card taped under the third drawer", 3),
        ("planted two hundred oak saplings", 2),
        ("cinnamon rolls that sell out", 5),
    ] {
        let found = compressor.find_needle_in_haystack(&haystack, needle, &opts);
        assert_eq!(found.outcome, Outcome::Computed);
        assert!(
            found.text.contains(needle),
            "paragraph {paragraph}: {:?} not in {:?}",
            needle,
            found.text
        );
        assert!(found.text.len() < haystack.len());
    }
}

#[test]
fn textual_weight_alone_finds_literal_needle() {
    let haystack: String = PARAGRAPHS.concat();
    let opts = NeedleOptions::default().with_block_size(100).with_weights(0.0, 1.0);
    let found = Compressor::new(Arc::new(KeywordEmbedder(&["zzz"])))
        .find_needle_in_haystack(&haystack, "Migrating geese follow the same flyways", &opts);

    assert!(found.text.contains("Migrating geese follow the same flyways"));
}

#[test]
fn negative_weight_falls_back() {
    let opts = NeedleOptions::default().with_weights(-1.0, 0.7);
    let found = hashed().find_needle_in_haystack(ARTICLE, "bakery", &opts);
    assert_eq!(found.text, ARTICLE);
    assert!(matches!(
        found.outcome,
        Outcome::Fallback(Error::InvalidWeight { name: "semantic_weight", .. })
    ));
}
