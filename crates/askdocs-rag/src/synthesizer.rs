//! Extractive answer composition.
//!
//! Every word in a synthesized answer comes from retrieved chunk text; the
//! composer only de-duplicates, groups by source, tidies whitespace and adds
//! attribution headers.

use std::collections::HashSet;

use askdocs_core::types::SearchResult;

pub const NO_INFORMATION: &str = "I could not find any relevant information in the available documents.";
pub const DEFAULT_FINGERPRINT_CHARS: usize = 120;

const GROUP_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    fingerprint_chars: usize,
}

impl Default for Synthesizer {
    fn default() -> Self { Self { fingerprint_chars: DEFAULT_FINGERPRINT_CHARS } }
}

impl Synthesizer {
    /// `fingerprint_chars` is the number of leading characters compared when
    /// dropping near-duplicate chunks. 120 suits 500-character chunks with a
    /// 50-character overlap.
    pub fn new(fingerprint_chars: usize) -> Self { Self { fingerprint_chars: fingerprint_chars.max(1) } }

    pub fn synthesize(&self, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return NO_INFORMATION.to_string();
        }
        let unique = self.dedup(results);
        if let [only] = unique.as_slice() {
            return format!("Based on **{}**:\n\n{}", only.source, clean_text(&only.text));
        }

        let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
        for r in &unique {
            let cleaned = clean_text(&r.text);
            match groups.iter_mut().find(|(source, _)| *source == r.source) {
                Some((_, chunks)) => chunks.push(cleaned),
                None => groups.push((r.source.as_str(), vec![cleaned])),
            }
        }

        let body = groups
            .iter()
            .map(|(source, chunks)| format!("**From {source}:**\n{}", chunks.join("\n\n")))
            .collect::<Vec<_>>()
            .join(GROUP_SEPARATOR);
        if groups.len() > 1 {
            let names: Vec<String> = groups.iter().map(|(source, _)| format!("*{source}*")).collect();
            format!("Information compiled from {} documents ({}):\n\n{}", groups.len(), names.join(", "), body)
        } else {
            body
        }
    }

    /// First occurrence of each fingerprint, original order kept.
    fn dedup<'a>(&self, results: &'a [SearchResult]) -> Vec<&'a SearchResult> {
        let mut seen = HashSet::new();
        results.iter().filter(|r| seen.insert(self.fingerprint(&r.text))).collect()
    }

    /// Leading window of `text`, then trimmed and lowercased. Whitespace
    /// inside the window counts toward its length.
    pub fn fingerprint(&self, text: &str) -> String {
        text.chars().take(self.fingerprint_chars).collect::<String>().trim().to_lowercase()
    }
}

/// Trim every line and collapse runs of blank lines into one.
pub fn clean_text(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) { out.pop(); }
    out.join("\n")
}
