//! JSON-lines transport: one `RetrievalRequest` per stdin line, one `Answer`
//! (or `{"error": ...}`) per stdout line, in request order.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use askdocs_cli::{bootstrap, init_tracing};
use askdocs_core::config::Config;
use askdocs_core::types::RetrievalRequest;
use askdocs_rag::AskService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load()?;
    let (pipeline, report) = tokio::task::spawn_blocking(move || bootstrap(&config)).await??;
    tracing::info!(documents = report.documents, chunks = report.chunks, "serving on stdio");
    let service = AskService::new(Arc::new(pipeline));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() { continue; }
        let reply = match serde_json::from_str::<RetrievalRequest>(&line) {
            Ok(request) => match service.ask(request).await {
                Ok(answer) => serde_json::to_value(&answer)?,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
            Err(e) => serde_json::json!({ "error": format!("invalid request: {e}") }),
        };
        stdout.write_all(serde_json::to_string(&reply)?.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}
