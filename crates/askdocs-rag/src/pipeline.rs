use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use askdocs_core::chunker::{Chunker, ChunkingConfig};
use askdocs_core::config::{Config, RetrievalSettings, Settings};
use askdocs_core::error::{Error, Result};
use askdocs_core::traits::Embedder;
use askdocs_core::types::{Answer, Confidence, RetrievalRequest, SearchResult};
use askdocs_embed::ModelRegistry;
use askdocs_index::{IndexStats, SimilarityIndex};

use crate::guardrail;
use crate::retriever::retrieve;
use crate::synthesizer::Synthesizer;

pub const NOT_FOUND_MESSAGE: &str = "Information not found in internal documents.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalSettings,
    pub batch_size: usize,
    pub progress: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { chunking: ChunkingConfig::default(), retrieval: RetrievalSettings::default(), batch_size: 32, progress: false }
    }
}

impl From<&Settings> for PipelineSettings {
    fn from(s: &Settings) -> Self {
        Self { chunking: s.chunking, retrieval: s.retrieval.clone(), batch_size: s.embedding.batch_size.max(1), progress: s.ingest.progress }
    }
}

/// One model's view of the corpus: the same chunks embedded with that model.
pub(crate) struct Corpus {
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) index: SimilarityIndex,
}

/// Per-model index sizes, keyed by model name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStats {
    pub default_model: String,
    pub indexes: BTreeMap<String, IndexStats>,
}

/// Retriever -> Guardrail -> Synthesizer over one index per registered model.
pub struct Pipeline {
    registry: ModelRegistry,
    pub(crate) corpora: BTreeMap<String, Corpus>,
    pub(crate) chunker: Chunker,
    synthesizer: Synthesizer,
    pub(crate) settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(registry: ModelRegistry, settings: PipelineSettings) -> Result<Self> {
        let chunker = Chunker::from_config(&settings.chunking)?;
        let corpora = registry
            .iter()
            .map(|(name, embedder)| {
                (name.to_string(), Corpus { embedder: Arc::clone(embedder), index: SimilarityIndex::new(embedder.dim()) })
            })
            .collect();
        let synthesizer = Synthesizer::new(settings.retrieval.fingerprint_chars);
        Ok(Self { registry, corpora, chunker, synthesizer, settings })
    }

    /// Load models and settings from `config`. Models are loaded eagerly.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let settings = config.settings()?;
        let registry = askdocs_embed::load_registry(config)?;
        Ok(Self::new(registry, PipelineSettings::from(&settings))?)
    }

    pub fn settings(&self) -> &PipelineSettings { &self.settings }

    /// A request with the configured retrieval defaults.
    pub fn request(&self, question: impl Into<String>) -> RetrievalRequest {
        let r = &self.settings.retrieval;
        RetrievalRequest::new(question)
            .with_top_k(r.top_k)
            .with_threshold(r.confidence_threshold)
            .with_guardrails(r.guardrails_enabled)
    }

    pub fn ask(&self, request: &RetrievalRequest) -> Result<Answer> {
        request.validate(self.settings.retrieval.max_top_k)?;
        let (model, corpus) = self.corpus(request.embedding_model.as_deref())?;
        tracing::debug!(model, top_k = request.top_k, question = %request.question, "answering");

        let results = retrieve(
            &request.question,
            corpus.embedder.as_ref(),
            &corpus.index,
            request.top_k,
            request.source_filter.as_deref(),
        )?;

        if request.guardrails_enabled && !guardrail::validate(&results, request.confidence_threshold) {
            tracing::info!(top = results.first().map(|r| r.score), threshold = request.confidence_threshold, "guardrail rejected answer");
            return Ok(rejected());
        }

        let top_score = results.first().map_or(0.0, |r| r.score);
        let confidence = if results.is_empty() {
            Confidence::Low
        } else {
            confidence_tier(top_score, request.confidence_threshold, self.settings.retrieval.high_confidence)
        };
        Ok(Answer {
            text: self.synthesizer.synthesize(&results),
            confidence,
            source_documents: unique_sources(&results),
            similarity_score: top_score,
        })
    }

    /// Distinct indexed sources in first-ingested order.
    pub fn documents(&self) -> Vec<String> {
        self.corpora.get(self.registry.default_name()).map(|c| c.index.sources()).unwrap_or_default()
    }

    pub fn models(&self) -> Vec<String> { self.registry.names() }

    pub fn default_model(&self) -> &str { self.registry.default_name() }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            default_model: self.registry.default_name().to_string(),
            indexes: self.corpora.iter().map(|(name, c)| (name.clone(), c.index.stats())).collect(),
        }
    }

    fn corpus(&self, model: Option<&str>) -> Result<(&str, &Corpus)> {
        let (name, _) = self.registry.get(model);
        let corpus = self.corpora.get(name).ok_or_else(|| Error::NotFound(format!("index for model '{name}'")))?;
        Ok((name, corpus))
    }
}

fn rejected() -> Answer {
    Answer { text: NOT_FOUND_MESSAGE.to_string(), confidence: Confidence::Low, source_documents: vec![], similarity_score: 0.0 }
}

/// `high` at or above `high`, else `medium` at or above `threshold`, else `low`.
pub fn confidence_tier(top_score: f32, threshold: f32, high: f32) -> Confidence {
    if top_score >= high {
        Confidence::High
    } else if top_score >= threshold {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn unique_sources(results: &[SearchResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    results.iter().filter(|r| seen.insert(r.source.as_str())).map(|r| r.source.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(confidence_tier(0.9, 0.6, 0.75), Confidence::High);
        assert_eq!(confidence_tier(0.75, 0.6, 0.75), Confidence::High);
        assert_eq!(confidence_tier(0.7, 0.6, 0.75), Confidence::Medium);
        assert_eq!(confidence_tier(0.5, 0.6, 0.75), Confidence::Low);
        // A threshold above `high` never yields medium.
        assert_eq!(confidence_tier(0.8, 0.9, 0.75), Confidence::High);
    }

    #[test]
    fn sources_deduplicated_in_first_seen_order() {
        let r = |s: &str| SearchResult { text: String::new(), source: s.into(), score: 0.0 };
        assert_eq!(unique_sources(&[r("b"), r("a"), r("b")]), vec!["b".to_string(), "a".to_string()]);
    }
}
