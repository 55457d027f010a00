use askdocs_core::types::SearchResult;

/// Accept only when the top-ranked result reaches `threshold`.
///
/// Only `results[0]` is considered; lower-ranked scores never matter.
pub fn validate(results: &[SearchResult], threshold: f32) -> bool {
    match results.first() {
        Some(top) => top.score >= threshold,
        None => false,
    }
}
