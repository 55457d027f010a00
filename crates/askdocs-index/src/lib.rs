//! Exact in-memory similarity index over chunk embeddings.
//!
//! Entries live in three parallel arrays (vectors, texts, sources) joined by
//! row offset. Rows are only ever appended, and every append extends all three
//! arrays under one write lock, so readers never see them out of step.

pub mod distance;
pub mod index;
mod rows;

pub use index::{IndexStats, SimilarityIndex};
