//! Retrieval and extractive answering over an in-memory document index.
//!
//! A question is embedded, matched against the index, optionally narrowed to
//! a set of sources, gated on the top score and finally composed into an
//! answer made only of retrieved text, with every passage attributed.
//!
//! Note on source filtering: when none of the requested sources appear in the
//! results, the unfiltered results are used instead. Callers should surface
//! `Answer::source_documents` so users can see where an answer actually came from.

pub mod guardrail;
pub mod ingest;
pub mod pipeline;
pub mod retriever;
pub mod service;
pub mod synthesizer;

pub use ingest::IngestReport;
pub use pipeline::{Pipeline, PipelineSettings};
pub use service::AskService;
pub use synthesizer::Synthesizer;
