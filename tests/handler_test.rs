//! End-to-end handler tests using in-memory analyzer and publisher doubles.

use std::sync::Mutex;

use formrelay::{
    handle_document, AnalysisError, AnalyzeResult, DocumentAnalyzer, HandlerError, KeyValuePair,
    Paragraph, PublishError, RecordPublisher,
};

/// Analyzer double returning a fixed result
struct StaticAnalyzer {
    result: AnalyzeResult,
}

impl DocumentAnalyzer for StaticAnalyzer {
    async fn analyze(&self, _content: &[u8]) -> Result<AnalyzeResult, AnalysisError> {
        Ok(self.result.clone())
    }
}

/// Analyzer double simulating a service-side failure
struct FailingAnalyzer;

impl DocumentAnalyzer for FailingAnalyzer {
    async fn analyze(&self, _content: &[u8]) -> Result<AnalyzeResult, AnalysisError> {
        Err(AnalysisError::Failed {
            code: "InvalidContent".to_string(),
            message: "unreadable document".to_string(),
        })
    }
}

/// Publisher double capturing published messages
#[derive(Default)]
struct CapturingPublisher {
    messages: Mutex<Vec<String>>,
}

impl CapturingPublisher {
    fn published(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl RecordPublisher for CapturingPublisher {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Publisher double simulating an unreachable queue
struct FailingPublisher;

impl RecordPublisher for FailingPublisher {
    async fn publish(&self, _message: &str) -> Result<(), PublishError> {
        Err(PublishError::Publish("queue unavailable".into()))
    }
}

fn survey_result() -> AnalyzeResult {
    AnalyzeResult {
        key_value_pairs: vec![KeyValuePair::new("Approved", ":selected:")],
        paragraphs: vec![Paragraph::new(
            "Comments Message: Please review the attached form before Friday.",
        )],
    }
}

#[tokio::test]
async fn test_end_to_end_record_published() {
    let analyzer = StaticAnalyzer {
        result: survey_result(),
    };
    let publisher = CapturingPublisher::default();

    let published = handle_document("survey-001.pdf", b"%PDF-1.7", &analyzer, &publisher)
        .await
        .unwrap();

    let messages = publisher.published();
    assert_eq!(messages.len(), 1);
    assert_eq!(published.as_deref(), Some(messages[0].as_str()));

    let record: serde_json::Value = serde_json::from_str(&messages[0]).unwrap();
    assert_eq!(
        record,
        serde_json::json!({
            "Approved": true,
            "Message": "Please review the attached form before Friday."
        })
    );
}

#[tokio::test]
async fn test_empty_analysis_publishes_empty_record() {
    let analyzer = StaticAnalyzer {
        result: AnalyzeResult::default(),
    };
    let publisher = CapturingPublisher::default();

    handle_document("blank.png", b"\x89PNG", &analyzer, &publisher)
        .await
        .unwrap();

    assert_eq!(publisher.published(), vec!["{}".to_string()]);
}

#[tokio::test]
async fn test_analysis_failure_propagates_and_publishes_nothing() {
    let publisher = CapturingPublisher::default();

    let err = handle_document("corrupt.pdf", b"not a pdf", &FailingAnalyzer, &publisher)
        .await
        .unwrap_err();

    assert!(matches!(err, HandlerError::Analysis(_)));
    assert!(err.to_string().contains("InvalidContent"));
    assert!(publisher.published().is_empty());
}

#[tokio::test]
async fn test_publish_failure_propagates() {
    let analyzer = StaticAnalyzer {
        result: survey_result(),
    };

    let err = handle_document("survey-002.pdf", b"%PDF-1.7", &analyzer, &FailingPublisher)
        .await
        .unwrap_err();

    assert!(matches!(err, HandlerError::Publish(PublishError::Publish(_))));
    assert!(err.to_string().contains("queue unavailable"));
}
