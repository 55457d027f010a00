use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Length mismatch: {vectors} vectors, {texts} texts, {sources} sources")]
    LengthMismatch { vectors: usize, texts: usize, sources: usize },

    #[error("Invalid chunking: size={size}, overlap={overlap} (overlap must be smaller than a non-zero size)")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Embedding provider failed: {0}")]
    EmbeddingProvider(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

impl Error {
    /// Wrap a provider error, keeping its context chain in the message.
    pub fn embedding(err: anyhow::Error) -> Self {
        Error::EmbeddingProvider(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
