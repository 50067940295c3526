//! Sentence importance scoring.
//!
//! Each sentence gets one scalar combining three signals:
//!
//! | Signal | Measures | Weight |
//! |--------|----------|--------|
//! | Semantic similarity | cosine(document, sentence) embeddings | 0.6 |
//! | Topic importance | max of the sentence's topic distribution | 0.3 |
//! | Lexical diversity | unique non-stopwords / words | 0.2 |
//!
//! The weights are fixed. Only the relative order of scores matters; the
//! absolute scale is not meaningful.
//!
//! ## Steering
//!
//! The "document" embedding the sentences are compared against can be a
//! blend of the document and a reference text (see
//! [`REFERENCE_WEIGHT`]). Sentences close to the reference then outrank
//! equally central sentences that are not.

use crate::topic::{TermVectorizer, TopicModel, TopicModelConfig};
use crate::{cosine_similarity, Result, Sentence, StopwordFilter};

/// Weight of semantic similarity in the importance score.
pub const SEMANTIC_WEIGHT: f32 = 0.6;
/// Weight of topic importance in the importance score.
pub const TOPIC_WEIGHT: f32 = 0.3;
/// Weight of lexical diversity in the importance score.
pub const LEXICAL_WEIGHT: f32 = 0.2;
/// Share of a reference text in a steered document embedding.
pub const REFERENCE_WEIGHT: f32 = 0.4;

/// The score of one sentence, with its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceScore {
    /// Position of the sentence in the document.
    pub index: usize,
    /// Cosine similarity to the document embedding.
    pub semantic_similarity: f32,
    /// Largest component of the sentence's topic distribution.
    pub topic_importance: f32,
    /// Unique non-stopwords over total words.
    pub lexical_diversity: f32,
    /// Weighted combination of the three.
    pub importance: f32,
}

/// Scores sentences of one document.
///
/// Owns the topic model fit over that document's sentences; build a new one
/// per document.
#[derive(Debug)]
pub struct SentenceScorer {
    doc_embedding: Vec<f32>,
    vectorizer: TermVectorizer,
    topics: TopicModel,
    stopwords: StopwordFilter,
}

impl SentenceScorer {
    /// Fit the topic model over `sentences` and prepare to score them
    /// against `doc_embedding`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sentences have no vocabulary left after
    /// stopword removal, or the topic configuration is invalid.
    pub fn new(
        sentences: &[Sentence],
        doc_embedding: Vec<f32>,
        stopwords: StopwordFilter,
        topic_config: TopicModelConfig,
    ) -> Result<Self> {
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        let vectorizer = TermVectorizer::fit(&texts, stopwords.clone())?;
        let docs: Vec<_> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let topics = TopicModel::fit(&docs, vectorizer.vocabulary_len(), topic_config)?;

        Ok(Self {
            doc_embedding,
            vectorizer,
            topics,
            stopwords,
        })
    }

    /// Score one sentence given its semantic embedding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `embedding` does not match the document embedding.
    pub fn score(&self, sentence: &Sentence, embedding: &[f32]) -> Result<SentenceScore> {
        let semantic_similarity = cosine_similarity(&self.doc_embedding, embedding)?;

        let distribution = self
            .topics
            .topic_distribution(&self.vectorizer.transform(&sentence.text));
        let topic_importance = distribution.into_iter().fold(0.0f64, f64::max) as f32;

        let lexical_diversity = lexical_diversity(&sentence.text, &self.stopwords);

        Ok(SentenceScore {
            index: sentence.index,
            semantic_similarity,
            topic_importance,
            lexical_diversity,
            importance: SEMANTIC_WEIGHT * semantic_similarity
                + TOPIC_WEIGHT * topic_importance
                + LEXICAL_WEIGHT * lexical_diversity,
        })
    }

    /// Score every sentence; `embeddings[i]` belongs to `sentences[i]`.
    ///
    /// # Errors
    ///
    /// Returns the first scoring error.
    pub fn score_all(&self, sentences: &[Sentence], embeddings: &[Vec<f32>]) -> Result<Vec<SentenceScore>> {
        sentences
            .iter()
            .zip(embeddings)
            .map(|(sentence, embedding)| self.score(sentence, embedding))
            .collect()
    }
}

/// Unique lowercased non-stopwords over all whitespace-separated words.
///
/// Returns 0.0 for a sentence without words.
///
/// ```rust
/// use sift::{lexical_diversity, Language, StopwordFilter};
///
/// let stopwords = StopwordFilter::new(Language::English);
/// // "data" twice, "the" is a stopword: 1 unique / 4 words
/// assert_eq!(lexical_diversity("the data the data", &stopwords), 0.25);
/// ```
pub fn lexical_diversity(sentence: &str, stopwords: &StopwordFilter) -> f32 {
    let words: Vec<String> = sentence.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return 0.0;
    }
    let unique: rustc_hash::FxHashSet<&str> = words
        .iter()
        .map(String::as_str)
        .filter(|w| !stopwords.contains_lowercase(w))
        .collect();
    unique.len() as f32 / words.len() as f32
}
