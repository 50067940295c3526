//! Per-document topic model.
//!
//! A sentence that sits squarely inside one of the document's topics is more
//! likely to carry its content than one spread thinly across all of them. To
//! measure that, each compression call fits a small Latent Dirichlet
//! Allocation model over the document's own sentences and reads off how
//! dominant each sentence's strongest topic is.
//!
//! ## Pipeline
//!
//! ```text
//! sentences ──► TermVectorizer ──► document-term counts ──► TopicModel::fit
//!                 (words ≥ 2 chars,                            (batch variational
//!                  lowercase, no stopwords)                     Bayes, seeded)
//!
//! sentence ──► transform ──► topic_distribution ──► [0.1, 0.7, 0.05, ...]
//!                                                         max = 0.7
//! ```
//!
//! ## Lifetime
//!
//! Both the vectorizer and the model are plain values built inside one call
//! and dropped when it returns. Nothing is cached, so concurrent calls never
//! share mutable state.
//!
//! ## The Math
//!
//! With `K` topics, priors `α = η = 1/K`, and topic-word parameters `λ`:
//!
//! ```text
//! E[log β_kw] = ψ(λ_kw) - ψ(Σ_w λ_kw)
//!
//! E-step, per document d with word counts n_dw:
//!   φ_dw  ∝ exp(E[log θ_dk]) · exp(E[log β_kw])
//!   γ_dk  = α + Σ_w n_dw φ_dwk            (until mean |Δγ| < tol)
//!
//! M-step:
//!   λ_kw  = η + Σ_d n_dw φ_dwk
//! ```
//!
//! `λ` starts from Gamma(100, 1/100) draws of a seeded generator, so the
//! same document always yields the same model.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};
use rustc_hash::FxHashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, Result, StopwordFilter};

const EPS: f64 = f64::EPSILON;

/// Word counts of one text over the fitted vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermCounts {
    /// Vocabulary ids, ascending.
    pub ids: Vec<usize>,
    /// Count of each id.
    pub counts: Vec<f64>,
}

impl TermCounts {
    /// Whether no vocabulary word occurs.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Bag-of-words vectorizer with stopword removal.
///
/// Terms are lowercased Unicode words of at least two characters.
#[derive(Debug, Clone)]
pub struct TermVectorizer {
    vocabulary: FxHashMap<String, usize>,
    stopwords: StopwordFilter,
}

impl TermVectorizer {
    /// Learn the vocabulary of `texts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVocabulary`] if no term survives filtering.
    pub fn fit<S: AsRef<str>>(texts: &[S], stopwords: StopwordFilter) -> Result<Self> {
        let terms: BTreeSet<String> = texts
            .iter()
            .flat_map(|text| analyze(text.as_ref(), &stopwords))
            .collect();
        if terms.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(id, term)| (term, id))
            .collect();
        Ok(Self {
            vocabulary,
            stopwords,
        })
    }

    /// Vocabulary size.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Count known terms in `text`. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> TermCounts {
        let mut counts: FxHashMap<usize, f64> = FxHashMap::default();
        for term in analyze(text, &self.stopwords) {
            if let Some(&id) = self.vocabulary.get(&term) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let mut pairs: Vec<(usize, f64)> = counts.into_iter().collect();
        pairs.sort_unstable_by_key(|&(id, _)| id);
        let (ids, counts) = pairs.into_iter().unzip();
        TermCounts { ids, counts }
    }
}

fn analyze<'a>(text: &'a str, stopwords: &'a StopwordFilter) -> impl Iterator<Item = String> + 'a {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(move |w| w.chars().count() >= 2 && !stopwords.contains_lowercase(w))
}

/// Settings for [`TopicModel::fit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicModelConfig {
    /// Number of latent topics.
    pub num_topics: usize,
    /// Seed for the initial topic-word draws.
    pub seed: u64,
    /// Passes over the corpus.
    pub max_iter: usize,
    /// Inner iterations per document in the E-step.
    pub max_doc_update_iter: usize,
    /// E-step stops when the mean absolute change of γ drops below this.
    pub mean_change_tol: f64,
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        Self {
            num_topics: 5,
            seed: 42,
            max_iter: 10,
            max_doc_update_iter: 100,
            mean_change_tol: 1e-3,
        }
    }
}

/// A fitted LDA model.
#[derive(Debug, Clone)]
pub struct TopicModel {
    config: TopicModelConfig,
    alpha: f64,
    /// `exp(E[log β])`, `num_topics × vocabulary`.
    exp_topic_word: Vec<Vec<f64>>,
}

impl TopicModel {
    /// Fit a model over a document-term matrix with `n_terms` columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTopicCount`] for zero topics and
    /// [`Error::EmptyVocabulary`] when `n_terms == 0`.
    pub fn fit(docs: &[TermCounts], n_terms: usize, config: TopicModelConfig) -> Result<Self> {
        if config.num_topics == 0 {
            return Err(Error::InvalidTopicCount);
        }
        if n_terms == 0 {
            return Err(Error::EmptyVocabulary);
        }

        let k = config.num_topics;
        let prior = 1.0 / k as f64;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let init = Gamma::new(100.0, 0.01).map_err(|e| Error::TopicModel(e.to_string()))?;

        let lambda: Vec<Vec<f64>> = (0..k)
            .map(|_| (0..n_terms).map(|_| init.sample(&mut rng)).collect())
            .collect();

        let mut model = Self {
            config,
            alpha: prior,
            exp_topic_word: exp_dirichlet_expectation(&lambda),
        };

        for _ in 0..config.max_iter {
            let mut sstats = vec![vec![0.0; n_terms]; k];
            for doc in docs {
                let start: Vec<f64> = (0..k).map(|_| init.sample(&mut rng)).collect();
                let exp_doc_topic = model.infer(doc, start).1;
                model.accumulate(doc, &exp_doc_topic, &mut sstats);
            }

            // M-step: λ = η + sstats ⊙ exp(E[log β])
            let lambda: Vec<Vec<f64>> = sstats
                .iter()
                .zip(&model.exp_topic_word)
                .map(|(row, beta)| row.iter().zip(beta).map(|(s, b)| prior + s * b).collect())
                .collect();
            model.exp_topic_word = exp_dirichlet_expectation(&lambda);
        }

        Ok(model)
    }

    /// Number of topics.
    pub fn num_topics(&self) -> usize {
        self.config.num_topics
    }

    /// Normalized topic distribution of one document.
    ///
    /// A document with no known terms gets the uniform distribution.
    pub fn topic_distribution(&self, doc: &TermCounts) -> Vec<f64> {
        let gamma = self.infer(doc, vec![1.0; self.num_topics()]).0;
        let total: f64 = gamma.iter().sum();
        gamma.into_iter().map(|g| g / total).collect()
    }

    /// Variational E-step for one document. Returns `(γ, exp(E[log θ]))`.
    fn infer(&self, doc: &TermCounts, mut gamma: Vec<f64>) -> (Vec<f64>, Vec<f64>) {
        let mut exp_doc_topic = exp_dirichlet_expectation_1d(&gamma);

        for _ in 0..self.config.max_doc_update_iter {
            let last = gamma.clone();
            let norm_phi = self.norm_phi(doc, &exp_doc_topic);

            for (t, g) in gamma.iter_mut().enumerate() {
                let beta = &self.exp_topic_word[t];
                let weighted: f64 = doc
                    .ids
                    .iter()
                    .zip(&doc.counts)
                    .zip(&norm_phi)
                    .map(|((&w, &c), &n)| c / n * beta[w])
                    .sum();
                *g = exp_doc_topic[t] * weighted + self.alpha;
            }
            exp_doc_topic = exp_dirichlet_expectation_1d(&gamma);

            let change = mean_abs_change(&last, &gamma);
            if change < self.config.mean_change_tol {
                break;
            }
        }

        (gamma, exp_doc_topic)
    }

    /// Add one document's contribution to the sufficient statistics.
    fn accumulate(&self, doc: &TermCounts, exp_doc_topic: &[f64], sstats: &mut [Vec<f64>]) {
        let norm_phi = self.norm_phi(doc, exp_doc_topic);
        for (t, row) in sstats.iter_mut().enumerate() {
            for ((&w, &c), &n) in doc.ids.iter().zip(&doc.counts).zip(&norm_phi) {
                row[w] += exp_doc_topic[t] * c / n;
            }
        }
    }

    fn norm_phi(&self, doc: &TermCounts, exp_doc_topic: &[f64]) -> Vec<f64> {
        doc.ids
            .iter()
            .map(|&w| {
                exp_doc_topic
                    .iter()
                    .zip(&self.exp_topic_word)
                    .map(|(theta, beta)| theta * beta[w])
                    .sum::<f64>()
                    + EPS
            })
            .collect()
    }
}

fn mean_abs_change(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f64>() / a.len() as f64
}

fn exp_dirichlet_expectation_1d(alpha: &[f64]) -> Vec<f64> {
    let psi_total = digamma(alpha.iter().sum());
    alpha.iter().map(|&a| (digamma(a) - psi_total).exp()).collect()
}

fn exp_dirichlet_expectation(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter().map(|row| exp_dirichlet_expectation_1d(row)).collect()
}

/// Digamma function ψ(x) for x > 0.
fn digamma(mut x: f64) -> f64 {
    let mut result = 0.0;
    // Recurrence ψ(x) = ψ(x + 1) - 1/x until the asymptotic series is accurate
    while x < 6.0 {
        result -= 1.0 / x;
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln() - 0.5 * inv
        - inv2 * (1.0 / 12.0 - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Language;

    fn corpus() -> Vec<&'static str> {
        vec![
            "Rust compilers check ownership and borrowing rules.",
            "The borrow checker rejects dangling references in Rust code.",
            "Ownership rules make Rust memory safe without garbage collection.",
            "Tomatoes and basil grow well in sunny gardens.",
            "Gardeners water basil plants every morning in summer.",
            "Sunny weather helps tomatoes ripen in the garden.",
        ]
    }

    fn fit(texts: &[&str], config: TopicModelConfig) -> (TermVectorizer, TopicModel) {
        let vectorizer =
            TermVectorizer::fit(texts, StopwordFilter::new(Language::English)).unwrap();
        let docs: Vec<TermCounts> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let model = TopicModel::fit(&docs, vectorizer.vocabulary_len(), config).unwrap();
        (vectorizer, model)
    }

    #[test]
    fn test_digamma_known_values() {
        // ψ(1) = -γ (Euler–Mascheroni)
        assert!((digamma(1.0) + 0.577_215_664_9).abs() < 1e-8);
        // ψ(0.5) = -γ - 2 ln 2
        assert!((digamma(0.5) + 1.963_510_026_0).abs() < 1e-8);
        assert!((digamma(10.0) - 2.251_752_589_1).abs() < 1e-8);
    }

    #[test]
    fn test_vectorizer_filters_stopwords_and_short_words() {
        let vectorizer = TermVectorizer::fit(
            &["The cat and a dog", "The bird chased the cat"],
            StopwordFilter::new(Language::English),
        )
        .unwrap();
        assert_eq!(vectorizer.vocabulary_len(), 4); // bird, cat, chased, dog

        let counts = vectorizer.transform("Cat cat DOG unknown");
        assert_eq!(counts.counts.iter().sum::<f64>(), 3.0);
        assert_eq!(counts.ids.len(), 2);
    }

    #[test]
    fn test_vectorizer_empty_vocabulary() {
        let result = TermVectorizer::fit(&["the and of", "a"], StopwordFilter::new(Language::English));
        assert!(matches!(result, Err(Error::EmptyVocabulary)));
    }

    #[test]
    fn test_distribution_is_normalized() {
        let texts = corpus();
        let (vectorizer, model) = fit(&texts, TopicModelConfig::default());

        for text in &texts {
            let dist = model.topic_distribution(&vectorizer.transform(text));
            assert_eq!(dist.len(), 5);
            assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            assert!(dist.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn test_unknown_text_is_uniform() {
        let texts = corpus();
        let (vectorizer, model) = fit(&texts, TopicModelConfig::default());
        let dist = model.topic_distribution(&vectorizer.transform("zzz qqq"));
        for p in dist {
            assert!((p - 0.2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let texts = corpus();
        let (v1, m1) = fit(&texts, TopicModelConfig::default());
        let (v2, m2) = fit(&texts, TopicModelConfig::default());
        for text in &texts {
            assert_eq!(
                m1.topic_distribution(&v1.transform(text)),
                m2.topic_distribution(&v2.transform(text))
            );
        }
    }

    #[test]
    fn test_zero_topics_rejected() {
        let config = TopicModelConfig {
            num_topics: 0,
            ..TopicModelConfig::default()
        };
        let result = TopicModel::fit(&[TermCounts::default()], 3, config);
        assert!(matches!(result, Err(Error::InvalidTopicCount)));
    }
}
