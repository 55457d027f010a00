//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_RETRIEVAL__TOP_K=5`). Every
//! section carries serde defaults, so a missing file yields a usable config.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current directory, selecting the overlay by `RUST_ENV`.
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            other => tracing::debug!(env = other, "no config overlay for environment"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: dir.to_path_buf() };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract::<Settings>()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    /// Directory that relative paths in the config are resolved against.
    pub fn base_dir(&self) -> &Path { &self.base_dir }

    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf { resolve_with_base(&self.base_dir, p) }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub ingest: IngestSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));
        if self.chunking.size == 0 || self.chunking.overlap >= self.chunking.size {
            return invalid(format!("chunking.overlap ({}) must be smaller than chunking.size ({})", self.chunking.overlap, self.chunking.size));
        }
        if self.retrieval.max_top_k == 0 {
            return invalid("retrieval.max_top_k must be at least 1".into());
        }
        if self.retrieval.fingerprint_chars == 0 {
            return invalid("retrieval.fingerprint_chars must be at least 1".into());
        }
        if self.embedding.models.is_empty() {
            return invalid("embedding.models must declare at least one model".into());
        }
        if !self.embedding.models.iter().any(|m| m.name == self.embedding.default_model) {
            return invalid(format!("embedding.default_model '{}' is not among embedding.models", self.embedding.default_model));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub docs_dir: String,
    pub extensions: Vec<String>,
    pub excluded_files: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            docs_dir: "data".to_string(),
            extensions: vec!["txt".to_string(), "md".to_string()],
            excluded_files: vec!["qa_input_examples.txt".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub max_top_k: usize,
    pub confidence_threshold: f32,
    pub guardrails_enabled: bool,
    /// Top score at or above which an answer is reported as `high`.
    pub high_confidence: f32,
    /// Leading characters compared when de-duplicating chunks. Tuned for the
    /// default 500/50 chunk window; revisit when changing `chunking`.
    pub fingerprint_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: crate::types::DEFAULT_TOP_K,
            max_top_k: 20,
            confidence_threshold: crate::types::DEFAULT_CONFIDENCE_THRESHOLD,
            guardrails_enabled: true,
            high_confidence: 0.75,
            fingerprint_chars: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Hashing,
    Bert,
    XlmRoberta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    pub name: String,
    pub kind: ModelKind,
    /// Model directory with `config.json`, `tokenizer.json` and weights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Output dimensionality; only read by the hashing embedder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub default_model: String,
    pub models: Vec<ModelSettings>,
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            default_model: "hashing".to_string(),
            models: vec![ModelSettings { name: "hashing".to_string(), kind: ModelKind::Hashing, path: None, dimension: Some(384), max_len: None }],
            batch_size: 32,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub progress: bool,
}

impl Default for IngestSettings {
    fn default() -> Self { Self { progress: true } }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
