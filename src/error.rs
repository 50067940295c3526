//! Error types for sift.

/// Errors that can occur while chunking, scoring, or compressing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap is not smaller than the chunk size.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that exceeded the size.
        overlap: usize,
    },

    /// Compression rate outside `[0, 1]`.
    #[error("compression rate {0} is outside [0, 1]")]
    InvalidCompressionRate(f64),

    /// Topic model needs at least one topic.
    #[error("topic count must be > 0")]
    InvalidTopicCount,

    /// A blending or similarity weight was negative or not finite.
    #[error("invalid weight {name}: {value}")]
    InvalidWeight {
        /// Which weight.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// An environment variable could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv {
        /// The variable name.
        key: &'static str,
        /// The raw value.
        value: String,
    },

    /// The document produced no sentences.
    #[error("document contains no sentences")]
    EmptyDocument,

    /// Every term was filtered out before topic modelling.
    #[error("empty vocabulary; the document may only contain stopwords")]
    EmptyVocabulary,

    /// Topic model could not be initialized.
    #[error("topic model error: {0}")]
    TopicModel(String),

    /// Two vectors of different lengths were compared.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },

    /// Semantic compression requires the `semantic` feature.
    #[error("semantic embeddings require the 'semantic' feature")]
    SemanticFeatureRequired,

    /// Embedding model error.
    #[error("embedding error: {0}")]
    Embedding(String),
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, Error>;
