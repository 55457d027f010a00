use std::env;
use std::path::PathBuf;

use askdocs_cli::{bootstrap, init_tracing, parse_ask_args, render_answer};
use askdocs_core::chunker::Chunker;
use askdocs_core::config::Config;
use askdocs_rag::Pipeline;

const USAGE: &str = "Usage: askdocs <ask|documents|models|chunks> [args...]
  ask \"<question>\" [--top-k N] [--threshold T] [--source NAME]... [--no-guardrails] [--model NAME] [--json]
  documents            list indexed documents
  models               list embedding models
  chunks <file>        show how a file would be chunked";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ask" => {
            let (pipeline, report) = bootstrap(&config)?;
            tracing::info!(documents = report.documents, chunks = report.chunks, "corpus ready");
            let parsed = parse_ask_args(&args, pipeline.request(""))?;
            let answer = pipeline.ask(&parsed.request)?;
            if parsed.json { println!("{}", serde_json::to_string_pretty(&answer)?); } else { println!("{}", render_answer(&answer)); }
        }
        "documents" => {
            let (pipeline, _) = bootstrap(&config)?;
            let docs = pipeline.documents();
            if docs.is_empty() { println!("No documents indexed."); }
            for doc in docs { println!("{doc}"); }
            println!("{}", serde_json::to_string_pretty(&pipeline.stats())?);
        }
        "models" => {
            let pipeline = Pipeline::from_config(&config)?;
            for name in pipeline.models() {
                let marker = if name == pipeline.default_model() { " (default)" } else { "" };
                println!("{name}{marker}");
            }
        }
        "chunks" => {
            let Some(path) = args.first().map(PathBuf::from) else { eprintln!("Usage: askdocs chunks <file>"); std::process::exit(1) };
            let settings = config.settings()?;
            let chunker = Chunker::from_config(&settings.chunking)?;
            let text = std::fs::read_to_string(&path)?;
            let chunks = chunker.chunk(&text);
            println!("{} chunks (size={}, overlap={})", chunks.len(), chunker.size(), chunker.overlap());
            for (i, c) in chunks.iter().enumerate() { println!("--- [{i}] {} chars\n{c}", c.chars().count()); }
        }
        _ => { eprintln!("Unknown command: {}\n{USAGE}", cmd); std::process::exit(1); }
    }
    Ok(())
}
