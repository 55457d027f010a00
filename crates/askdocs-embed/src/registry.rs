//! Process-wide set of embedding models, loaded eagerly.
//!
//! Every configured model is loaded before the registry is returned; there is
//! no lazy loading and no unloading. Lookup by name falls back to the declared
//! default model.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};

use askdocs_core::config::{resolve_with_base, EmbeddingSettings, ModelKind, ModelSettings};
use askdocs_core::traits::Embedder;

use crate::hashing::{HashingEmbedder, DEFAULT_HASHING_DIM};
use crate::transformer::TransformerEmbedder;

#[derive(Clone)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn Embedder>>,
    default_model: String,
    default_embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry").field("models", &self.models.keys().collect::<Vec<_>>()).field("default_model", &self.default_model).finish()
    }
}

impl ModelRegistry {
    /// Build from already constructed embedders.
    pub fn new(models: Vec<(String, Arc<dyn Embedder>)>, default_model: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (name, model) in models {
            if map.insert(name.clone(), model).is_some() { bail!("embedding model '{}' registered twice", name); }
        }
        let default_embedder = map
            .get(default_model)
            .cloned()
            .ok_or_else(|| anyhow!("default embedding model '{}' is not registered", default_model))?;
        Ok(Self { models: map, default_model: default_model.to_string(), default_embedder })
    }

    /// Single-model registry, mostly for tests and embedded use.
    pub fn single(name: &str, model: Arc<dyn Embedder>) -> Self {
        let mut models = BTreeMap::new();
        models.insert(name.to_string(), model.clone());
        Self { models, default_model: name.to_string(), default_embedder: model }
    }

    /// Load every model in `settings`, resolving relative model paths against `base_dir`.
    pub fn load(settings: &EmbeddingSettings, base_dir: &Path) -> Result<Self> {
        let mut models = Vec::with_capacity(settings.models.len());
        for model in &settings.models {
            models.push((model.name.clone(), load_model(model, base_dir)?));
        }
        let registry = Self::new(models, &settings.default_model)?;
        tracing::info!(models = ?registry.names(), default = %registry.default_model, "embedding models ready");
        Ok(registry)
    }

    /// Resolve `name`, falling back to the default for `None` or unknown names.
    pub fn get(&self, name: Option<&str>) -> (&str, &Arc<dyn Embedder>) {
        if let Some((key, model)) = name.and_then(|n| self.models.get_key_value(n)) {
            return (key.as_str(), model);
        }
        if let Some(n) = name {
            tracing::debug!(requested = n, fallback = %self.default_model, "unknown embedding model, using default");
        }
        (self.default_model.as_str(), &self.default_embedder)
    }

    pub fn default_name(&self) -> &str { &self.default_model }

    pub fn names(&self) -> Vec<String> { self.models.keys().cloned().collect() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Embedder>)> {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn load_model(model: &ModelSettings, base_dir: &Path) -> Result<Arc<dyn Embedder>> {
    match model.kind {
        ModelKind::Hashing => Ok(Arc::new(HashingEmbedder::new(model.dimension.unwrap_or(DEFAULT_HASHING_DIM)))),
        kind => {
            let path = model.path.as_deref().ok_or_else(|| anyhow!("model '{}' needs a `path`", model.name))?;
            let dir = resolve_with_base(base_dir, path);
            Ok(Arc::new(TransformerEmbedder::load(&model.name, kind, &dir, model.max_len)?))
        }
    }
}
