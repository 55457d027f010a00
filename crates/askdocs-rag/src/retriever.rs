use std::collections::HashSet;

use askdocs_core::error::{Error, Result};
use askdocs_core::traits::Embedder;
use askdocs_core::types::SearchResult;
use askdocs_index::SimilarityIndex;

/// Embed `question`, search `index` and apply the optional source filter.
///
/// Embedding failures surface as [`Error::EmbeddingProvider`].
pub fn retrieve(
    question: &str,
    embedder: &dyn Embedder,
    index: &SimilarityIndex,
    top_k: usize,
    source_filter: Option<&[String]>,
) -> Result<Vec<SearchResult>> {
    let query = embedder.embed_one(question).map_err(Error::embedding)?;
    let results = index.search(&query, top_k)?;
    tracing::debug!(hits = results.len(), top = results.first().map(|r| r.score), "retrieved");
    Ok(match source_filter {
        Some(filter) if !filter.is_empty() => apply_source_filter(results, filter),
        _ => results,
    })
}

/// Keep results whose source is in `filter`, in rank order.
///
/// If nothing matches, the unfiltered results are returned unchanged, so a
/// non-empty result set never becomes empty here.
pub fn apply_source_filter(results: Vec<SearchResult>, filter: &[String]) -> Vec<SearchResult> {
    let allowed: HashSet<&str> = filter.iter().map(String::as_str).collect();
    let filtered: Vec<SearchResult> = results.iter().filter(|r| allowed.contains(r.source.as_str())).cloned().collect();
    if filtered.is_empty() && !results.is_empty() {
        tracing::warn!(filter = ?filter, "no results from requested sources, using unfiltered results");
        return results;
    }
    filtered
}
