//! Deterministic feature-hashing embedder.
//!
//! Each lowercase alphanumeric token is hashed into one of `dim` buckets with
//! a weight in `[0.5, 1.0]` derived from the same hash, then the vector is
//! L2-normalized. Texts sharing vocabulary get a positive cosine similarity,
//! which is enough for offline use and for tests that must not load weights.

use std::hash::Hasher;

use anyhow::Result;
use twox_hash::XxHash64;

use askdocs_core::traits::Embedder;
use askdocs_core::types::Vector;

pub const DEFAULT_HASHING_DIM: usize = 384;

pub struct HashingEmbedder {
    dim: usize,
    id: String,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self { dim, id: format!("hashing:xxh64:d{dim}") }
    }

    fn embed_text(&self, text: &str) -> Vector {
        let mut v = vec![0f32; self.dim];
        for token in tokens(text) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.as_bytes());
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let weight = 0.5 + 0.5 * (((h >> 32) as u32) as f32 / u32::MAX as f32);
            v[idx] += weight;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        // No tokens: keep the zero vector, which scores 0 against everything.
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self { Self::new(DEFAULT_HASHING_DIM) }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).map(str::to_lowercase)
}

impl Embedder for HashingEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { usize::MAX }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
