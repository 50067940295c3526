//! Semantic Compression
//!
//! Compress a document by rate, by token budget and towards a reference,
//! then search it for a needle.
//!
//! ```bash
//! cargo run --example compress
//! cargo run --example compress -- path/to/document.txt
//! RUST_LOG=sift=debug cargo run --example compress --features semantic
//! ```

use std::sync::Arc;

use sift::{CompressOptions, Compressor, HashedNgramEmbedder, NeedleOptions, Outcome};
use tracing_subscriber::EnvFilter;

const DOCUMENT: &str = "Machine learning models learn patterns from data. \
    They generalize these patterns to make predictions on new, unseen examples. \
    This is fundamentally different from traditional programming, where humans write explicit rules. \
    The training process involves a forward pass, a loss computation and backpropagation. \
    Deep learning extends this with multiple hidden layers. \
    Each layer learns increasingly abstract representations. \
    Early layers detect edges while later layers recognize objects. \
    The lab cafeteria serves excellent soup on Fridays. \
    Geoffrey Hinton pioneered backpropagation in the 1980s. \
    His work laid the foundation for modern deep learning.";

fn compressor() -> Compressor {
    #[cfg(feature = "semantic")]
    {
        match Compressor::with_default_model() {
            Ok(compressor) => return compressor,
            Err(e) => eprintln!("model unavailable ({e}), using textual embeddings"),
        }
    }
    // Without a model the textual embedder stands in for semantic similarity
    Compressor::new(Arc::new(HashedNgramEmbedder::new()))
}

fn report(label: &str, original: &str, text: &str, outcome: &Outcome) {
    println!(
        "{label}: {} -> {} words ({outcome:?})",
        original.split_whitespace().count(),
        text.split_whitespace().count()
    );
    println!("  {text}\n");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("cannot read {path}: {e}");
                std::process::exit(1);
            }
        },
        None => DOCUMENT.to_string(),
    };

    let compressor = compressor();
    println!("Language: {}", compressor.detect_language(&document));
    println!("Tokens: {}\n", compressor.count_tokens(&document));

    // Remove 70% of the words
    let result = compressor.compress_text(&document, &CompressOptions::default());
    report("rate 0.7", &document, &result.text, &result.outcome);

    // Fit a token budget instead
    let budget = compressor.count_tokens(&document) / 2;
    let result = compressor.compress_text(&document, &CompressOptions::default().with_target_token_count(budget));
    report(&format!("{budget} tokens"), &document, &result.text, &result.outcome);

    // Steer the selection towards a reference text
    let options = CompressOptions::default()
        .with_rate(0.6)
        .with_reference_text("history of neural network research");
    let result = compressor.compress_text(&document, &options);
    report("steered", &document, &result.text, &result.outcome);

    let found = compressor.find_needle_in_haystack(
        &document,
        "what does the cafeteria serve",
        &NeedleOptions::default().with_block_size(120),
    );
    println!("needle: block {:?}, score {:?}", found.block, found.score);
    println!("  {}", found.text);
}
