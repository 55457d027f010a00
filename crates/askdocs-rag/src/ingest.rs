use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use askdocs_core::error::{Error, Result};
use askdocs_core::traits::DocumentSource;
use askdocs_core::types::Document;

use crate::pipeline::{Corpus, Pipeline};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub skipped: usize,
}

impl Pipeline {
    /// Chunk, embed and index `documents` into every model's index.
    ///
    /// Each document is appended as one unit per model. Safe to call while
    /// other threads are answering questions.
    pub fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        let chunked: Vec<(&Document, Vec<String>)> = documents.iter().map(|d| (d, self.chunker.chunk(&d.text))).collect();
        let total: usize = chunked.iter().map(|(_, c)| c.len()).sum::<usize>() * self.corpora.len();
        let pb = self.progress_bar(total as u64);

        let mut report = IngestReport::default();
        for (doc, chunks) in &chunked {
            if chunks.is_empty() {
                tracing::warn!(source = %doc.source, "document produced no chunks, skipping");
                report.skipped += 1;
                continue;
            }
            let sources = vec![doc.source.clone(); chunks.len()];
            // Every model embeds the document before any index changes, so the
            // per-model indexes always hold the same chunks.
            let mut embedded = Vec::with_capacity(self.corpora.len());
            for (model, corpus) in &self.corpora {
                warn_on_truncation(model, corpus.embedder.max_len(), &doc.source, chunks);
                let vectors = self.embed_chunks(corpus, chunks, &pb)?;
                if let Some(v) = vectors.iter().find(|v| v.len() != corpus.index.dimension()) {
                    return Err(Error::DimensionMismatch { expected: corpus.index.dimension(), actual: v.len() });
                }
                embedded.push((model, corpus, vectors));
            }
            for (model, corpus, vectors) in embedded {
                corpus.index.add(&vectors, chunks, &sources)?;
                tracing::debug!(model = %model, source = %doc.source, chunks = chunks.len(), "indexed document");
            }
            report.documents += 1;
            report.chunks += chunks.len();
        }
        pb.finish_and_clear();
        tracing::info!(documents = report.documents, chunks = report.chunks, skipped = report.skipped, "ingestion complete");
        Ok(report)
    }

    /// Pull every document from `source` and ingest it.
    pub fn ingest_from(&self, source: &dyn DocumentSource) -> Result<IngestReport> {
        let documents = source.documents().map_err(|e| Error::Operation(format!("loading documents: {e:#}")))?;
        self.ingest(&documents)
    }

    /// Ingest one runtime-supplied document, e.g. an upload.
    pub fn ingest_document(&self, text: impl Into<String>, source: impl Into<String>) -> Result<IngestReport> {
        self.ingest(&[Document::new(text, source)])
    }

    fn embed_chunks(&self, corpus: &Corpus, chunks: &[String], pb: &ProgressBar) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(self.settings.batch_size.max(1)) {
            let embedded = corpus.embedder.embed_batch(batch).map_err(Error::embedding)?;
            if embedded.len() != batch.len() {
                return Err(Error::EmbeddingProvider(format!("{} returned {} vectors for {} texts", corpus.embedder.id(), embedded.len(), batch.len())));
            }
            vectors.extend(embedded);
            pb.inc(batch.len() as u64);
        }
        Ok(vectors)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.settings.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)") {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

/// Encoders truncate past `max_len` tokens; a chunk with more words than that
/// is certain to lose its tail.
fn warn_on_truncation(model: &str, max_len: usize, source: &str, chunks: &[String]) {
    let long = truncated_chunks(max_len, chunks);
    if long > 0 {
        tracing::warn!(model, source, chunks = long, max_len, "chunks exceed the model input length and will be truncated");
    }
}

fn truncated_chunks(max_len: usize, chunks: &[String]) -> usize {
    chunks.iter().filter(|c| c.split_whitespace().count() > max_len).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_chunks_longer_than_model_input() {
        let chunks = vec!["one two three".to_string(), "one two".to_string(), "a b c d".to_string()];
        assert_eq!(truncated_chunks(2, &chunks), 2);
        assert_eq!(truncated_chunks(4, &chunks), 0);
        assert_eq!(truncated_chunks(usize::MAX, &chunks), 0);
    }
}
