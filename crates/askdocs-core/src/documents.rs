//! Directory-backed document source.
//!
//! Lists the top level of a directory, keeps files whose extension is allowed
//! and whose name is not excluded, and yields their text labelled by file name.
//! Format extraction beyond plain text is not handled here.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DataSettings;
use crate::traits::DocumentSource;
use crate::types::Document;

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extensions: Vec<String>,
    excluded_files: Vec<String>,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = DataSettings::default();
        Self { root: root.into(), extensions: defaults.extensions, excluded_files: defaults.excluded_files }
    }

    pub fn from_settings(root: impl Into<PathBuf>, settings: &DataSettings) -> Self {
        Self {
            root: root.into(),
            extensions: settings.extensions.iter().map(|e| e.trim_start_matches('.').to_ascii_lowercase()).collect(),
            excluded_files: settings.excluded_files.clone(),
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root).min_depth(1).max_depth(1).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path();
            if self.accepts(path) { files.push(path.to_path_buf()); }
        }
        files.sort();
        files
    }

    fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { return false };
        if self.excluded_files.iter().any(|x| x == name) { return false; }
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    fn read_file_content(file_path: &Path) -> std::io::Result<String> {
        let bytes = fs::read(file_path)?;
        match String::from_utf8(bytes) {
            Ok(content) => Ok(content),
            Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }
}

impl DocumentSource for DirectorySource {
    fn documents(&self) -> anyhow::Result<Vec<Document>> {
        if !self.root.is_dir() {
            anyhow::bail!("document directory {} does not exist", self.root.display());
        }
        let files = self.list_files();
        if files.is_empty() {
            tracing::warn!(dir = %self.root.display(), "no supported documents found");
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for file_path in &files {
            let source = file_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            match Self::read_file_content(file_path) {
                Ok(text) if text.trim().is_empty() => tracing::warn!(file = %source, "skipped empty document"),
                Ok(text) => {
                    tracing::info!(file = %source, chars = text.chars().count(), "loaded document");
                    documents.push(Document { text, source });
                }
                Err(e) => tracing::error!(file = %source, error = %e, "failed to read document"),
            }
        }
        Ok(documents)
    }
}
