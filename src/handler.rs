//! Per-document invocation: analyze, extract, serialize, publish.
//!
//! One call per storage-change notification. The handler is generic over the
//! analyzer and publisher interfaces so it can run against in-memory doubles
//! in tests.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::docintel::{AnalysisError, DocumentAnalyzer};
use crate::extract::extract_record;
use crate::queue::{PublishError, RecordPublisher};

/// Error type for a failed invocation
#[derive(Debug)]
pub enum HandlerError {
    Analysis(AnalysisError),
    Publish(PublishError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Analysis(e) => write!(f, "Analysis error: {}", e),
            HandlerError::Publish(e) => write!(f, "Publish error: {}", e),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<AnalysisError> for HandlerError {
    fn from(err: AnalysisError) -> Self {
        HandlerError::Analysis(err)
    }
}

impl From<PublishError> for HandlerError {
    fn from(err: PublishError) -> Self {
        HandlerError::Publish(err)
    }
}

/// Process one document delivered by the storage trigger.
///
/// Analyzes the bytes, folds the result into a flat record, serializes it to
/// JSON and publishes it to the queue. A serialization failure is logged and
/// the record dropped (returns `Ok(None)`); analysis and publish failures
/// propagate. Returns the published JSON on success.
pub async fn handle_document<A, P>(
    filename: &str,
    content: &[u8],
    analyzer: &A,
    publisher: &P,
) -> Result<Option<String>, HandlerError>
where
    A: DocumentAnalyzer,
    P: RecordPublisher,
{
    let invocation_id = Uuid::new_v4();
    tracing::info!(
        "[{}] Processing document '{}' ({} bytes)",
        invocation_id,
        filename,
        content.len()
    );

    let result = analyzer.analyze(content).await?;
    let record = extract_record(&result);

    serialize_and_publish(invocation_id, filename, &record, publisher).await
}

/// Serialize a record and send it to the queue.
///
/// A record that fails to serialize is logged at error level and dropped:
/// the invocation ends cleanly with `Ok(None)` and nothing is published.
async fn serialize_and_publish<T, P>(
    invocation_id: Uuid,
    filename: &str,
    record: &T,
    publisher: &P,
) -> Result<Option<String>, HandlerError>
where
    T: Serialize,
    P: RecordPublisher,
{
    let json = match serde_json::to_string(record) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(
                "[{}] Failed to serialize record for '{}', dropping: {}",
                invocation_id,
                filename,
                e
            );
            return Ok(None);
        }
    };

    publisher.publish(&json).await?;

    tracing::info!("[{}] Record for '{}' sent to queue: {}", invocation_id, filename, json);

    Ok(Some(json))
}
