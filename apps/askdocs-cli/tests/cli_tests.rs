use std::fs;

use askdocs_cli::{bootstrap, parse_ask_args, render_answer};
use askdocs_core::config::Config;
use askdocs_core::types::{Confidence, RetrievalRequest};

fn args(list: &[&str]) -> Vec<String> { list.iter().map(|s| s.to_string()).collect() }

#[test]
fn ask_args_override_defaults() {
    let base = RetrievalRequest::new("").with_top_k(3).with_threshold(0.6);
    let parsed = parse_ask_args(
        &args(&["what", "is", "up?", "--top-k", "5", "--threshold", "0.2", "--source", "a.txt", "--source", "b.txt", "--no-guardrails", "--model", "bert", "--json"]),
        base,
    )
    .unwrap();

    assert!(parsed.json);
    let r = parsed.request;
    assert_eq!(r.question, "what is up?");
    assert_eq!(r.top_k, 5);
    assert_eq!(r.confidence_threshold, 0.2);
    assert_eq!(r.source_filter, Some(vec!["a.txt".to_string(), "b.txt".to_string()]));
    assert!(!r.guardrails_enabled);
    assert_eq!(r.embedding_model.as_deref(), Some("bert"));
}

#[test]
fn ask_args_keep_defaults_when_no_flags() {
    let base = RetrievalRequest::new("").with_top_k(4);
    let parsed = parse_ask_args(&args(&["hello"]), base).unwrap();
    assert_eq!(parsed.request.top_k, 4);
    assert!(parsed.request.guardrails_enabled);
    assert!(parsed.request.source_filter.is_none());
    assert!(!parsed.json);
}

#[test]
fn ask_args_errors() {
    let base = || RetrievalRequest::new("");
    assert!(parse_ask_args(&args(&[]), base()).is_err());
    assert!(parse_ask_args(&args(&["q", "--top-k"]), base()).is_err());
    assert!(parse_ask_args(&args(&["q", "--top-k", "many"]), base()).is_err());
    assert!(parse_ask_args(&args(&["q", "--verbose"]), base()).is_err());
}

#[test]
fn bootstrap_ingests_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "[data]\ndocs_dir = \"docs\"\n\n[ingest]\nprogress = false\n").unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("france.txt"), "Paris is the capital of France.").unwrap();
    fs::write(docs.join("notes.md"), "Invoices are processed every Monday.").unwrap();
    fs::write(docs.join("image.png"), "not text").unwrap();

    let config = Config::load_from(dir.path(), "test").unwrap();
    let (pipeline, report) = bootstrap(&config).unwrap();

    assert_eq!(report.documents, 2);
    assert_eq!(pipeline.documents(), vec!["france.txt".to_string(), "notes.md".to_string()]);

    let answer = pipeline.ask(&pipeline.request("What is the capital of France?").with_top_k(1).with_threshold(0.3)).unwrap();
    assert_eq!(answer.source_documents, vec!["france.txt".to_string()]);
    assert!(render_answer(&answer).contains("sources: france.txt"));
}

#[test]
fn bootstrap_without_docs_dir_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "[data]\ndocs_dir = \"missing\"\n").unwrap();

    let config = Config::load_from(dir.path(), "test").unwrap();
    let (pipeline, report) = bootstrap(&config).unwrap();

    assert_eq!(report.documents, 0);
    let answer = pipeline.ask(&pipeline.request("Anything?")).unwrap();
    assert_eq!(answer.confidence, Confidence::Low);
    assert!(answer.source_documents.is_empty());
}
