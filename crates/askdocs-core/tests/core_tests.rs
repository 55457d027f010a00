use std::fs;
use std::io::Write;
use tempfile::TempDir;

use askdocs_core::chunker::Chunker;
use askdocs_core::config::{Config, ModelKind};
use askdocs_core::documents::DirectorySource;
use askdocs_core::error::Error;
use askdocs_core::traits::DocumentSource;

use quickcheck_macros::quickcheck;

#[test]
fn directory_source_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let mut f = fs::File::create(dir.join("a.txt")).unwrap();
    writeln!(f, "Short text").unwrap();

    let docs = DirectorySource::new(dir).documents().expect("documents");

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source, "a.txt");
    assert_eq!(docs[0].text.trim(), "Short text");
}

#[test]
fn directory_source_skips_excluded_empty_and_unsupported() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("b.txt"), "bravo").unwrap();
    fs::write(dir.join("a.md"), "alpha").unwrap();
    fs::write(dir.join("qa_input_examples.txt"), "excluded").unwrap();
    fs::write(dir.join("empty.txt"), "  \n ").unwrap();
    fs::write(dir.join("report.pdf"), "%PDF").unwrap();
    fs::create_dir(dir.join("nested")).unwrap();
    fs::write(dir.join("nested/c.txt"), "not top level").unwrap();

    let docs = DirectorySource::new(dir).documents().expect("documents");
    let sources: Vec<&str> = docs.iter().map(|d| d.source.as_str()).collect();

    assert_eq!(sources, vec!["a.md", "b.txt"], "sorted, filtered, top level only");
}

#[test]
fn directory_source_decodes_invalid_utf8_lossily() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("latin.txt"), [b'c', b'a', b'f', 0xE9]).unwrap();

    let docs = DirectorySource::new(tmp.path()).documents().expect("documents");

    assert_eq!(docs.len(), 1);
    assert!(docs[0].text.starts_with("caf"));
}

#[test]
fn directory_source_missing_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(DirectorySource::new(tmp.path().join("nope")).documents().is_err());
}

#[test]
fn config_defaults_without_files() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path(), "test").expect("config");
    let settings = config.settings().expect("settings");

    assert_eq!(settings.chunking.size, 500);
    assert_eq!(settings.chunking.overlap, 50);
    assert_eq!(settings.retrieval.top_k, 3);
    assert_eq!(settings.retrieval.fingerprint_chars, 120);
    assert_eq!(settings.embedding.default_model, "hashing");
    assert_eq!(config.get::<usize>("retrieval.max_top_k").unwrap(), 20);
}

#[test]
fn config_file_and_env_file_overlay_merge() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        r#"
[chunking]
size = 200
overlap = 20

[embedding]
default_model = "mini"

[[embedding.models]]
name = "mini"
kind = "bert"
path = "models/minilm"
"#,
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[retrieval]\nconfidence_threshold = 0.3\n").unwrap();

    let config = Config::load_from(tmp.path(), "test").expect("config");
    let settings = config.settings().expect("settings");

    assert_eq!(settings.chunking.size, 200);
    assert_eq!(settings.retrieval.confidence_threshold, 0.3);
    assert_eq!(settings.retrieval.top_k, 3, "untouched keys keep defaults");
    assert_eq!(settings.embedding.models.len(), 1);
    assert_eq!(settings.embedding.models[0].kind, ModelKind::Bert);
    assert_eq!(config.resolve_path("models/minilm"), tmp.path().join("models/minilm"));
}

#[test]
fn config_rejects_degenerate_chunking() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[chunking]\nsize = 50\noverlap = 50\n").unwrap();
    let err = Config::load_from(tmp.path(), "test").err().expect("degenerate chunking rejected");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(msg)) if msg.contains("chunking.overlap")));
}

#[test]
fn config_rejects_unknown_default_model() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[embedding]\ndefault_model = \"missing\"\n").unwrap();
    let err = Config::load_from(tmp.path(), "test").err().expect("unknown default rejected");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(msg)) if msg.contains("missing")));
}

#[quickcheck]
fn chunks_reconstruct_text(text: String, size: u8, overlap: u8) -> bool {
    let size = (size as usize % 64) + 1;
    let overlap = overlap as usize % size;
    let chunker = Chunker::new(size, overlap).unwrap();
    let chunks = chunker.chunk(&text);

    let mut rebuilt = String::new();
    for (i, c) in chunks.iter().enumerate() {
        let skip = if i == 0 { 0 } else { overlap };
        rebuilt.extend(c.chars().skip(skip));
    }
    let len = text.chars().count();
    rebuilt == text && chunks.len() == len.div_ceil(size - overlap) && chunks.iter().all(|c| c.chars().count() <= size)
}
