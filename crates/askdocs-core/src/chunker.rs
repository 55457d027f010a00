//! Fixed-width sliding-window chunking.
//!
//! Windows are measured in characters, start at offset 0 and advance by
//! `size - overlap` until the window start reaches the end of the text. The
//! last window may be shorter than `size`. There is no sentence or word
//! awareness: a window boundary may fall in the middle of a word.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    size: usize,
    stride: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self { size: DEFAULT_CHUNK_SIZE, stride: DEFAULT_CHUNK_SIZE - DEFAULT_CHUNK_OVERLAP }
    }
}

impl Chunker {
    /// Rejects `size == 0` and `overlap >= size`; both give a non-positive stride.
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 || overlap >= size {
            return Err(Error::InvalidChunking { size, overlap });
        }
        Ok(Self { size, stride: size - overlap })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> { Self::new(config.size, config.overlap) }

    pub fn size(&self) -> usize { self.size }

    pub fn overlap(&self) -> usize { self.size - self.stride }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        // Byte offset of every char plus the end, so windows never split a code point.
        let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let len = bounds.len() - 1;
        let mut chunks = Vec::with_capacity(len.div_ceil(self.stride));
        let mut start = 0;
        while start < len {
            let end = (start + self.size).min(len);
            chunks.push(text[bounds[start]..bounds[end]].to_string());
            start += self.stride;
        }
        chunks
    }
}

/// Chunk with the default 500/50 window.
pub fn chunk(text: &str) -> Vec<String> { Chunker::default().chunk(text) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk("Paris is the capital of France."), vec!["Paris is the capital of France.".to_string()]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk("").is_empty());
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let chunker = Chunker::new(4, 1).unwrap();
        assert_eq!(chunker.chunk("abcdefghij"), vec!["abcd", "defg", "ghij", "j"]);
    }

    #[test]
    fn multibyte_chars_are_never_split() {
        let chunker = Chunker::new(2, 0).unwrap();
        assert_eq!(chunker.chunk("éàü"), vec!["éà", "ü"]);
    }

    #[test]
    fn degenerate_stride_is_rejected() {
        assert!(matches!(Chunker::new(50, 50), Err(Error::InvalidChunking { size: 50, overlap: 50 })));
        assert!(Chunker::new(10, 20).is_err());
        assert!(Chunker::new(0, 0).is_err());
    }
}
