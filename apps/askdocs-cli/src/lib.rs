//! Shared startup for the askdocs binaries.

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use askdocs_core::config::Config;
use askdocs_core::documents::DirectorySource;
use askdocs_core::types::{Answer, RetrievalRequest};
use askdocs_rag::{IngestReport, Pipeline};

/// Logs go to stderr; stdout is reserved for answers.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Load every model, then ingest `data.docs_dir`. A missing directory starts an empty corpus.
pub fn bootstrap(config: &Config) -> Result<(Pipeline, IngestReport)> {
    let settings = config.settings()?;
    let pipeline = Pipeline::from_config(config).context("building pipeline")?;
    let docs_dir = config.resolve_path(&settings.data.docs_dir);
    if !docs_dir.is_dir() {
        tracing::warn!(dir = %docs_dir.display(), "document directory not found, starting with an empty index");
        return Ok((pipeline, IngestReport::default()));
    }
    let source = DirectorySource::from_settings(docs_dir, &settings.data);
    let report = pipeline.ingest_from(&source)?;
    Ok((pipeline, report))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AskArgs {
    pub request: RetrievalRequest,
    pub json: bool,
}

/// Parse `<question> [--top-k N] [--threshold T] [--source NAME]... [--no-guardrails] [--model NAME] [--json]`.
/// `base` carries the configured defaults.
pub fn parse_ask_args(args: &[String], base: RetrievalRequest) -> Result<AskArgs> {
    let mut request = base;
    let mut question: Option<String> = None;
    let mut sources: Vec<String> = Vec::new();
    let mut json = false;
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        let mut value = || it.next().cloned().with_context(|| format!("{arg} requires a value"));
        match arg.as_str() {
            "--top-k" => request.top_k = value()?.parse().context("--top-k requires a number")?,
            "--threshold" => request.confidence_threshold = value()?.parse().context("--threshold requires a number")?,
            "--source" => sources.push(value()?),
            "--model" => request.embedding_model = Some(value()?),
            "--no-guardrails" => request.guardrails_enabled = false,
            "--json" => json = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            word => {
                question = Some(match question.take() {
                    Some(q) => format!("{q} {word}"),
                    None => word.to_string(),
                })
            }
        }
    }
    request.question = question.context("missing question")?;
    if !sources.is_empty() {
        request.source_filter = Some(sources);
    }
    Ok(AskArgs { request, json })
}

/// Human-readable rendering of an answer.
pub fn render_answer(answer: &Answer) -> String {
    let mut out = format!("{}\n\nconfidence: {} (score {:.4})", answer.text, answer.confidence, answer.similarity_score);
    if !answer.source_documents.is_empty() {
        out.push_str(&format!("\nsources: {}", answer.source_documents.join(", ")));
    }
    out
}
