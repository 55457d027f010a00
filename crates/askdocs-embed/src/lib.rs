//! Embedding providers for askdocs.
//!
//! - [`HashingEmbedder`]: deterministic, dependency-free, used offline and in tests
//! - [`TransformerEmbedder`]: BERT / XLM-RoBERTa encoders run with candle
//! - [`ModelRegistry`]: eager, name-keyed set of the configured models

pub mod hashing;
pub mod pool;
pub mod registry;
pub mod tokenize;
pub mod transformer;

pub use hashing::HashingEmbedder;
pub use pool::masked_mean_l2;
pub use registry::ModelRegistry;
pub use transformer::TransformerEmbedder;

use askdocs_core::config::Config;

/// Load every model declared under `[embedding]`.
pub fn load_registry(config: &Config) -> anyhow::Result<ModelRegistry> {
    let settings = config.settings()?;
    ModelRegistry::load(&settings.embedding, config.base_dir())
}
