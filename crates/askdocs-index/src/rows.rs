use std::ops::Range;

use askdocs_core::error::{Error, Result};
use askdocs_core::types::Vector;

/// Row-major vector storage plus the text and source of each row.
///
/// `vectors.len() == texts.len() * dim == sources.len() * dim` holds after
/// every public call.
#[derive(Debug, Default)]
pub(crate) struct Rows {
    dim: usize,
    vectors: Vec<f32>,
    texts: Vec<String>,
    sources: Vec<String>,
}

impl Rows {
    pub(crate) fn new(dim: usize) -> Self {
        Self { dim, ..Self::default() }
    }

    pub(crate) fn len(&self) -> usize { self.texts.len() }

    /// Validate the whole batch first, then extend the three arrays together.
    pub(crate) fn append(&mut self, vectors: &[Vector], texts: &[String], sources: &[String]) -> Result<Range<usize>> {
        if vectors.len() != texts.len() || texts.len() != sources.len() {
            return Err(Error::LengthMismatch { vectors: vectors.len(), texts: texts.len(), sources: sources.len() });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dim) {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: bad.len() });
        }
        let start = self.len();
        self.vectors.reserve(vectors.len() * self.dim);
        for v in vectors { self.vectors.extend_from_slice(v); }
        self.texts.extend_from_slice(texts);
        self.sources.extend_from_slice(sources);
        debug_assert_eq!(self.vectors.len(), self.texts.len() * self.dim);
        Ok(start..self.len())
    }

    pub(crate) fn vector(&self, row: usize) -> &[f32] {
        &self.vectors[row * self.dim..(row + 1) * self.dim]
    }

    pub(crate) fn text(&self, row: usize) -> &str { &self.texts[row] }

    pub(crate) fn source(&self, row: usize) -> &str { &self.sources[row] }

    pub(crate) fn sources(&self) -> &[String] { &self.sources }
}
