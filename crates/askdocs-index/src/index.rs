use std::cmp::Ordering;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use askdocs_core::error::{Error, Result};
use askdocs_core::types::{SearchResult, Vector};

use crate::distance::dot;
use crate::rows::Rows;

/// Brute-force inner-product index with a fixed dimensionality.
///
/// Appends take the write lock; searches share the read lock and see every
/// row appended before they started.
#[derive(Debug)]
pub struct SimilarityIndex {
    dim: usize,
    rows: RwLock<Rows>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub entries: usize,
    pub documents: usize,
    pub dimension: usize,
}

impl SimilarityIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, rows: RwLock::new(Rows::new(dim)) }
    }

    pub fn dimension(&self) -> usize { self.dim }

    pub fn len(&self) -> usize { self.read().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Append entries at the next row offsets and return the new rows.
    ///
    /// All three slices must have the same length and every vector must match
    /// the index dimensionality; otherwise nothing is added.
    pub fn add(&self, vectors: &[Vector], texts: &[String], sources: &[String]) -> Result<Range<usize>> {
        let added = self.write().append(vectors, texts, sources)?;
        tracing::debug!(rows = ?added, "appended index entries");
        Ok(added)
    }

    /// Top `top_k` entries by descending inner product with `query`.
    ///
    /// Ties go to the lower row offset. Returns fewer than `top_k` results
    /// only when the index holds fewer entries.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query.len() });
        }
        let rows = self.read();
        let k = top_k.min(rows.len());
        if k == 0 { return Ok(vec![]); }

        let mut scored: Vec<(usize, f32)> = (0..rows.len()).map(|row| (row, dot(query, rows.vector(row)))).collect();
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, rank);
            scored.truncate(k);
        }
        scored.sort_unstable_by(rank);

        Ok(scored
            .into_iter()
            .map(|(row, score)| SearchResult { text: rows.text(row).to_string(), source: rows.source(row).to_string(), score })
            .collect())
    }

    /// Distinct sources in first-inserted order.
    pub fn sources(&self) -> Vec<String> {
        let rows = self.read();
        let mut seen = HashSet::new();
        rows.sources().iter().filter(|s| seen.insert(s.as_str())).cloned().collect()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats { entries: self.len(), documents: self.sources().len(), dimension: self.dim }
    }

    // Rows are validated before any array is extended, so a poisoned lock
    // still guards synchronized arrays.
    fn read(&self) -> RwLockReadGuard<'_, Rows> { self.rows.read().unwrap_or_else(PoisonError::into_inner) }

    fn write(&self) -> RwLockWriteGuard<'_, Rows> { self.rows.write().unwrap_or_else(PoisonError::into_inner) }
}

/// Descending score, NaN last, then ascending row.
fn rank(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    key(b.1).total_cmp(&key(a.1)).then(a.0.cmp(&b.0))
}
