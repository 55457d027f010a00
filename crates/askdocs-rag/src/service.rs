//! Async front for transports that run on tokio.

use std::sync::Arc;

use askdocs_core::error::{Error, Result};
use askdocs_core::types::{Answer, Document, RetrievalRequest};

use crate::ingest::IngestReport;
use crate::pipeline::Pipeline;

/// Runs pipeline calls on the blocking pool so embedding never stalls the
/// async runtime. Dropping a returned future abandons its result; the
/// blocking work itself runs to completion.
#[derive(Clone)]
pub struct AskService {
    pipeline: Arc<Pipeline>,
}

impl AskService {
    pub fn new(pipeline: Arc<Pipeline>) -> Self { Self { pipeline } }

    pub fn pipeline(&self) -> &Arc<Pipeline> { &self.pipeline }

    pub async fn ask(&self, request: RetrievalRequest) -> Result<Answer> {
        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.ask(&request))
            .await
            .map_err(|e| Error::Operation(format!("ask task failed: {e}")))?
    }

    pub async fn ingest(&self, documents: Vec<Document>) -> Result<IngestReport> {
        let pipeline = Arc::clone(&self.pipeline);
        tokio::task::spawn_blocking(move || pipeline.ingest(&documents))
            .await
            .map_err(|e| Error::Operation(format!("ingest task failed: {e}")))?
    }
}
