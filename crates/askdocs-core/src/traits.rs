use anyhow::anyhow;

use crate::types::{Document, Vector};

/// Maps text to dense, L2-normalized vectors of a fixed dimensionality.
///
/// Text with no embeddable content may map to the all-zero vector, which
/// scores 0 against every entry. This is the one exception to unit norm.
///
/// Implementations may be CPU or accelerator bound; callers should treat
/// every call as blocking.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `bert:minilm:d384`).
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    /// Longest input, in tokens, the model reads before truncating.
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vector>>;

    fn embed_one(&self, text: &str) -> anyhow::Result<Vector> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow!("embedder {} returned no vector", self.id()))
    }
}

/// Supplies already-extracted plain-text documents for ingestion.
pub trait DocumentSource: Send + Sync {
    fn documents(&self) -> anyhow::Result<Vec<Document>>;
}

impl DocumentSource for Vec<Document> {
    fn documents(&self) -> anyhow::Result<Vec<Document>> { Ok(self.clone()) }
}
