//! Document-analysis client tests against a local stand-in service.
//!
//! Spins up a small axum server that mimics the begin-analyze +
//! operation-poll wire protocol, so the REST client is exercised end to end
//! without reaching a real analysis endpoint.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use formrelay::{AnalysisError, DocIntelClient, DocIntelConfig, DocumentAnalyzer};

/// Start a stand-in analysis service whose operation endpoint always returns
/// `operation_body`. Returns the service base URL.
async fn spawn_service(operation_body: serde_json::Value) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let operation_url = format!("{}/operations/op-1", base);

    let app = Router::new()
        .route(
            "/documentintelligence/documentModels/:model",
            post(move || {
                let location = operation_url.clone();
                async move { (StatusCode::ACCEPTED, [("Operation-Location", location)], ()) }
            }),
        )
        .route(
            "/operations/op-1",
            get(move || {
                let body = operation_body.clone();
                async move { Json(body) }
            }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

fn client_for(endpoint: String) -> DocIntelClient {
    DocIntelClient::new(DocIntelConfig {
        endpoint,
        key: "test-key".to_string(),
        model: "prebuilt-layout".to_string(),
        poll_interval_ms: 1,
        max_polls: 3,
    })
}

#[tokio::test]
async fn test_analyze_returns_result_on_success() {
    let base = spawn_service(serde_json::json!({
        "status": "succeeded",
        "analyzeResult": {
            "keyValuePairs": [
                {"key": {"content": "Approved"}, "value": {"content": ":selected:"}}
            ],
            "paragraphs": [
                {"content": "Comments Message: everything looks fine over here today."}
            ]
        }
    }))
    .await;

    let result = client_for(base).analyze(b"%PDF-1.7").await.unwrap();

    assert_eq!(result.key_value_pairs.len(), 1);
    assert_eq!(
        result.key_value_pairs[0].key.as_ref().unwrap().content,
        "Approved"
    );
    assert_eq!(result.paragraphs.len(), 1);
}

#[tokio::test]
async fn test_analyze_surfaces_service_failure() {
    let base = spawn_service(serde_json::json!({
        "status": "failed",
        "error": {"code": "InvalidContent", "message": "unreadable document"}
    }))
    .await;

    let err = client_for(base).analyze(b"not a pdf").await.unwrap_err();

    assert!(matches!(err, AnalysisError::Failed { .. }));
    assert!(err.to_string().contains("InvalidContent"));
}

#[tokio::test]
async fn test_analyze_gives_up_when_operation_never_completes() {
    // Service stays on "running" forever; the client must stop at its poll
    // budget instead of spinning
    let base = spawn_service(serde_json::json!({"status": "running"})).await;

    let err = client_for(base).analyze(b"%PDF-1.7").await.unwrap_err();

    assert!(matches!(err, AnalysisError::Timeout { polls: 3 }));
    assert!(err.to_string().contains("did not complete"));
}
