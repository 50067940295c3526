//! Integration tests against a real sentence encoder.
//!
//! These tests verify that compression and haystack search behave sensibly
//! with fastembed's default model behind them.

#![cfg(feature = "semantic")]

// Note: These tests require the `semantic` feature and a model download.

use sift::{CompressOptions, Compressor, Embedder, FastEmbedder, NeedleOptions, Outcome};

#[test]
#[ignore] // Requires fastembed model download
fn embeddings_have_model_dimension() {
    let embedder = FastEmbedder::new().expect("Failed to load embedding model");
    let batch = embedder
        .embed_batch(&["First sentence.", "Second sentence."])
        .expect("Embedding failed");

    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].len(), batch[1].len());
    assert!(!batch[0].is_empty());
}

#[test]
#[ignore] // Requires fastembed model download
fn compression_prefers_on_topic_sentences() {
    let text = "Quantum computers use qubits instead of classical bits. \
                Superposition lets a qubit hold several states at once. \
                My neighbour painted their fence green last weekend. \
                Entanglement links the states of separate qubits. \
                Quantum error correction protects fragile qubit states.";

    let compressor = Compressor::with_default_model().expect("Failed to load embedding model");
    let result = compressor.compress_text(text, &CompressOptions::default().with_rate(0.5));

    assert_eq!(result.outcome, Outcome::Computed);
    assert!(
        !result.text.contains("fence"),
        "Off-topic sentence should be dropped: {}",
        result.text
    );
}

#[test]
#[ignore] // Requires fastembed model download
fn needle_search_finds_paraphrase_region() {
    let mut haystack = String::new();
    for i in 0..20 {
        haystack.push_str(&format!("Filler paragraph {i} talks about weather and tides. "));
    }
    haystack.push_str("The vault combination is four seven one nine. ");
    for i in 20..40 {
        haystack.push_str(&format!("Filler paragraph {i} talks about weather and tides. "));
    }

    let compressor = Compressor::with_default_model().expect("Failed to load embedding model");
    let found = compressor.find_needle_in_haystack(
        &haystack,
        "vault combination",
        &NeedleOptions::default().with_block_size(200),
    );

    assert_eq!(found.outcome, Outcome::Computed);
    assert!(found.text.contains("vault combination"));
}
