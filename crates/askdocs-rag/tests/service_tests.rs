use std::sync::Arc;

use askdocs_core::types::{Confidence, Document, RetrievalRequest};
use askdocs_embed::{HashingEmbedder, ModelRegistry};
use askdocs_rag::{AskService, Pipeline, PipelineSettings};

fn service() -> AskService {
    let registry = ModelRegistry::single("hashing", Arc::new(HashingEmbedder::default()));
    AskService::new(Arc::new(Pipeline::new(registry, PipelineSettings::default()).expect("pipeline")))
}

#[tokio::test]
async fn ask_runs_on_blocking_pool() {
    let svc = service();
    let report = svc.ingest(vec![Document::new("Paris is the capital of France.", "a.txt")]).await.unwrap();
    assert_eq!(report.chunks, 1);

    let answer = svc.ask(RetrievalRequest::new("What is the capital of France?").with_threshold(0.3)).await.unwrap();
    assert_eq!(answer.source_documents, vec!["a.txt".to_string()]);
    assert_ne!(answer.confidence, Confidence::Low);
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let svc = service();
    svc.ingest(vec![
        Document::new("Paris is the capital of France.", "a.txt"),
        Document::new("Invoices are processed every Monday by the finance team.", "c.txt"),
    ])
    .await
    .unwrap();

    let france = svc.ask(RetrievalRequest::new("What is the capital of France?").with_top_k(1).with_threshold(0.0));
    let invoices = svc.ask(RetrievalRequest::new("When are invoices processed?").with_top_k(1).with_threshold(0.0));
    let (france, invoices) = tokio::join!(france, invoices);

    assert_eq!(france.unwrap().source_documents, vec!["a.txt".to_string()]);
    assert_eq!(invoices.unwrap().source_documents, vec!["c.txt".to_string()]);
}

#[tokio::test]
async fn request_errors_come_back_as_errors() {
    let svc = service();
    assert!(svc.ask(RetrievalRequest::new("q").with_top_k(0)).await.is_err());
}

#[test]
fn request_json_round_trips_through_pipeline() {
    let svc = service();
    svc.pipeline().ingest(&[Document::new("Paris is the capital of France.", "a.txt")]).unwrap();
    let request: RetrievalRequest = serde_json::from_str(r#"{"question":"What is the capital of France?","confidence_threshold":0.3,"source_filter":["a.txt"]}"#).unwrap();

    let answer = svc.pipeline().ask(&request).unwrap();
    let json = serde_json::to_value(&answer).unwrap();
    assert_eq!(json["source_documents"], serde_json::json!(["a.txt"]));
    assert!(json["answer"].as_str().unwrap().contains("Paris"));
}
