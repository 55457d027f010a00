//! Sentence encoder backed by candle.
//!
//! Loads a local model directory (`config.json`, `tokenizer.json` and either
//! `model.safetensors` or `pytorch_model.bin`), runs the encoder over a padded
//! batch and pools token states with an attention-masked mean.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;

use askdocs_core::config::ModelKind;
use askdocs_core::traits::Embedder;
use askdocs_core::types::Vector;

use crate::pool::masked_mean_l2;
use crate::tokenize::{pad_token_id, tokenize_batch};

const DEFAULT_MAX_LEN: usize = 256;

enum Encoder {
    Bert(BertModel),
    XlmRoberta(XLMRobertaModel),
}

pub struct TransformerEmbedder {
    encoder: Encoder,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
    pad_id: u32,
    id: String,
}

impl TransformerEmbedder {
    pub fn load(name: &str, kind: ModelKind, model_dir: &Path, max_len: Option<usize>) -> Result<Self> {
        if !model_dir.is_dir() {
            bail!("model directory {} for '{}' does not exist", model_dir.display(), name);
        }
        let device = select_device();
        tracing::info!(model = name, dir = %model_dir.display(), device = ?device, "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config_text = std::fs::read_to_string(&config_path).with_context(|| format!("reading {}", config_path.display()))?;

        let vb = VarBuilder::from_tensors(load_weights(model_dir, &device)?, DType::F32, &device);
        let (encoder, dim) = match kind {
            ModelKind::Bert => {
                let config: BertConfig = serde_json::from_str(&config_text)?;
                (Encoder::Bert(BertModel::load(vb, &config)?), config.hidden_size)
            }
            ModelKind::XlmRoberta => {
                let config: XLMRobertaConfig = serde_json::from_str(&config_text)?;
                (Encoder::XlmRoberta(XLMRobertaModel::new(&config, vb)?), config.hidden_size)
            }
            ModelKind::Hashing => bail!("model '{}' is a hashing model, not a transformer", name),
        };
        let pad_id = pad_token_id(&tokenizer);
        let id = format!("{}:{}:d{}", kind_label(kind), name, dim);
        tracing::info!(model = name, dim, "embedding model loaded");
        Ok(Self { encoder, tokenizer, device, dim, max_len: max_len.unwrap_or(DEFAULT_MAX_LEN), pad_id, id })
    }

    fn forward(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, self.max_len, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = match &self.encoder {
            Encoder::Bert(model) => model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?,
            Encoder::XlmRoberta(model) => model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?,
        };
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let rows: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.to_vec2()?;
        tracing::debug!(batch = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded batch");
        Ok(rows)
    }
}

impl Embedder for TransformerEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn max_len(&self) -> usize { self.max_len }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() { return Ok(vec![]); }
        self.forward(texts)
    }
}

/// Metal when built with the `metal` feature and a GPU is present, else CPU.
fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            return dev;
        }
    }
    Device::Cpu
}

fn kind_label(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Hashing => "hashing",
        ModelKind::Bert => "bert",
        ModelKind::XlmRoberta => "xlm_roberta",
    }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        return Ok(candle_core::safetensors::load(&safetensors, device)?);
    }
    let pickle: PathBuf = model_dir.join("pytorch_model.bin");
    if pickle.exists() {
        let weights = candle_core::pickle::read_all(&pickle)?;
        return Ok(weights.into_iter().collect());
    }
    bail!("no model.safetensors or pytorch_model.bin in {}", model_dir.display())
}
