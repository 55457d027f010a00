//! Domain types shared by the index, the retrieval pipeline and transports.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dense embedding, L2-normalized by every provider.
pub type Vector = Vec<f32>;

/// A plain-text document as handed over by a document source.
///
/// - `text`: already-extracted plain text
/// - `source`: originating document identifier (usually the file name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub source: String,
}

impl Document {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self { text: text.into(), source: source.into() }
    }
}

/// One retrieved index entry.
///
/// `score` is the inner product of query and entry vectors, i.e. cosine
/// similarity in `[-1, 1]`. Higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    pub source: String,
    pub score: f32,
}

pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.6;

fn default_top_k() -> usize { DEFAULT_TOP_K }
fn default_confidence_threshold() -> f32 { DEFAULT_CONFIDENCE_THRESHOLD }
fn default_guardrails_enabled() -> bool { true }

/// A single question against the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub question: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Restrict results to these sources. Falls back to the unfiltered
    /// results when none of them match.
    #[serde(default)]
    pub source_filter: Option<Vec<String>>,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_guardrails_enabled")]
    pub guardrails_enabled: bool,
    /// Registered model name; unknown names resolve to the default model.
    #[serde(default)]
    pub embedding_model: Option<String>,
}

impl RetrievalRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: DEFAULT_TOP_K,
            source_filter: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            guardrails_enabled: true,
            embedding_model: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self { self.top_k = top_k; self }

    pub fn with_threshold(mut self, threshold: f32) -> Self { self.confidence_threshold = threshold; self }

    pub fn with_guardrails(mut self, enabled: bool) -> Self { self.guardrails_enabled = enabled; self }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_filter = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_model(mut self, name: impl Into<String>) -> Self { self.embedding_model = Some(name.into()); self }

    /// Check field ranges. `max_top_k` comes from retrieval settings.
    pub fn validate(&self, max_top_k: usize) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::InvalidRequest("question must not be empty".into()));
        }
        if self.top_k == 0 || self.top_k > max_top_k {
            return Err(Error::InvalidRequest(format!("top_k must be within 1..={max_top_k}, got {}", self.top_k)));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidRequest(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

/// Confidence tier reported with every answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// The response handed back to the transport layer.
///
/// `source_documents` lists the sources of the results actually used,
/// de-duplicated in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer")]
    pub text: String,
    pub confidence: Confidence,
    pub source_documents: Vec<String>,
    pub similarity_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_from_minimal_json() {
        let req: RetrievalRequest = serde_json::from_str(r#"{"question":"hi"}"#).unwrap();
        assert_eq!(req, RetrievalRequest::new("hi"));
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert!(RetrievalRequest::new("q").validate(20).is_ok());
        assert!(RetrievalRequest::new("  ").validate(20).is_err());
        assert!(RetrievalRequest::new("q").with_top_k(0).validate(20).is_err());
        assert!(RetrievalRequest::new("q").with_top_k(21).validate(20).is_err());
        assert!(RetrievalRequest::new("q").with_threshold(1.5).validate(20).is_err());
        assert!(RetrievalRequest::new("q").with_threshold(f32::NAN).validate(20).is_err());
    }

    #[test]
    fn answer_serializes_with_transport_field_names() {
        let answer = Answer { text: "x".into(), confidence: Confidence::Medium, source_documents: vec!["a.txt".into()], similarity_score: 0.5 };
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["answer"], "x");
        assert_eq!(json["confidence"], "medium");
        assert_eq!(json["source_documents"][0], "a.txt");
    }
}
