//! Repeated word n-gram removal.
//!
//! Sentence selection works on whole sentences, so near-duplicate sentences
//! or looping boilerplate can survive it. The last cleanup step removes word
//! n-grams that repeat more than `threshold` times, keeping the first copy.
//!
//! ## How It Works
//!
//! ```text
//! ngram_size = 3, threshold = 3
//!
//! "buy now today buy now today buy now today buy now today ok"
//!  └─────┬─────┘
//!   "buy now today" occurs 4 times (> 3)
//!
//! scan: keep the first copy, skip past it,
//!       delete every later copy in place, rescan from the same index
//!
//! "buy now today ok"
//! ```
//!
//! Repeated n-grams are processed in the order they first appear. Deleting
//! words shifts every later position, so when repeats of different
//! n-grams overlap the result depends on that order. The cleanup is greedy,
//! not minimal.

use rustc_hash::FxHashMap;

/// Remove word n-grams of `ngram_size` words that occur more than
/// `threshold` times, keeping only their first occurrence.
///
/// Words are whitespace separated and rejoined with single spaces.
///
/// ```rust
/// use sift::compute_and_remove_repeated_ngrams;
///
/// let text = "the end is near the end is near the end is near the end is near";
/// assert_eq!(compute_and_remove_repeated_ngrams(text, 4, 3), "the end is near");
///
/// // Below the threshold nothing changes
/// assert_eq!(compute_and_remove_repeated_ngrams("a b c a b c", 3, 3), "a b c a b c");
/// ```
pub fn compute_and_remove_repeated_ngrams(text: &str, ngram_size: usize, threshold: usize) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    if ngram_size == 0 || words.len() < ngram_size {
        return words.join(" ");
    }

    for ngram in repeated_ngrams(&words, ngram_size, threshold) {
        let mut first_occurrence = true;
        let mut i = 0;

        while i + ngram_size <= words.len() {
            if words[i..i + ngram_size] == ngram[..] {
                if first_occurrence {
                    first_occurrence = false;
                    i += ngram_size;
                } else {
                    // Later words shift left; rescan from the same index
                    words.drain(i..i + ngram_size);
                }
            } else {
                i += 1;
            }
        }
    }

    words.join(" ")
}

/// N-grams occurring more than `threshold` times, in first-seen order.
fn repeated_ngrams<'a>(words: &[&'a str], ngram_size: usize, threshold: usize) -> Vec<Vec<&'a str>> {
    let mut counts: FxHashMap<&[&'a str], usize> = FxHashMap::default();
    let mut order: Vec<&[&'a str]> = Vec::new();

    for window in words.windows(ngram_size) {
        let count = counts.entry(window).or_insert(0);
        if *count == 0 {
            order.push(window);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|ngram| counts[ngram] > threshold)
        .map(<[&str]>::to_vec)
        .collect()
}
