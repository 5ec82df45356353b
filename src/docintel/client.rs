/// REST client for the document-analysis service
///
/// Begins a layout analysis with key-value-pair detection, then polls the
/// returned operation URL until the service reports success or failure.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::analysis::{AnalyzeResult, AnalyzeOperation, OperationStatus};
use crate::config::DocIntelConfig;

/// REST API version pinned by this client.
pub const API_VERSION: &str = "2024-11-30";

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION: &str = "Operation-Location";

/// Error type for analysis operations
#[derive(Debug)]
pub enum AnalysisError {
    /// Transport-level failure talking to the service
    Http(reqwest::Error),
    /// The service refused the analysis request
    Rejected { status: u16, body: String },
    /// The service accepted the request but sent no operation URL to poll
    MissingOperationLocation,
    /// The service reported the analysis operation as failed
    Failed { code: String, message: String },
    /// The operation succeeded but carried no result payload
    MissingResult,
    /// The operation did not complete within the configured poll budget
    Timeout { polls: u64 },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Http(e) => write!(f, "Analysis request failed: {}", e),
            AnalysisError::Rejected { status, body } => {
                write!(f, "Analysis rejected by service (HTTP {}): {}", status, body)
            }
            AnalysisError::MissingOperationLocation => {
                write!(f, "Service accepted analysis but returned no {} header", OPERATION_LOCATION)
            }
            AnalysisError::Failed { code, message } => {
                write!(f, "Analysis failed ({}): {}", code, message)
            }
            AnalysisError::MissingResult => {
                write!(f, "Analysis succeeded but response carried no result")
            }
            AnalysisError::Timeout { polls } => {
                write!(f, "Analysis did not complete after {} polls", polls)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Http(err)
    }
}

/// Narrow interface over the analysis service, so extraction and handler
/// logic can be exercised without network access.
pub trait DocumentAnalyzer {
    /// Analyze raw document bytes and wait for the structured result.
    fn analyze(
        &self,
        content: &[u8],
    ) -> impl Future<Output = Result<AnalyzeResult, AnalysisError>> + Send;
}

/// Document-analysis REST client.
#[derive(Clone)]
pub struct DocIntelClient {
    http: reqwest::Client,
    config: DocIntelConfig,
}

impl DocIntelClient {
    pub fn new(config: DocIntelConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}&features=keyValuePairs",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model,
            API_VERSION,
        )
    }

    /// Submit the document and return the operation URL to poll.
    async fn begin_analyze(&self, content: &[u8]) -> Result<String, AnalysisError> {
        let body = serde_json::json!({
            "base64Source": BASE64.encode(content),
        });

        let response = self
            .http
            .post(self.analyze_url())
            .header(KEY_HEADER, &self.config.key)
            .json(&body)
            .send()
            .await?;

        // Grab the header before consuming the response body
        let operation_url = response
            .headers()
            .get(OPERATION_LOCATION)
            .and_then(|h| h.to_str().ok())
            .map(String::from);

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        operation_url.ok_or(AnalysisError::MissingOperationLocation)
    }

    /// Poll the operation URL until the analysis completes.
    ///
    /// Gives up with [`AnalysisError::Timeout`] once the configured poll
    /// budget is exhausted, so a service stuck on `running` cannot hold the
    /// invocation forever.
    async fn wait_for_result(&self, operation_url: &str) -> Result<AnalyzeResult, AnalysisError> {
        for _ in 0..self.config.max_polls {
            let operation: AnalyzeOperation = self
                .http
                .get(operation_url)
                .header(KEY_HEADER, &self.config.key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match operation.status {
                OperationStatus::Succeeded => {
                    return operation.analyze_result.ok_or(AnalysisError::MissingResult);
                }
                OperationStatus::Failed => {
                    let (code, message) = operation
                        .error
                        .map(|e| (e.code, e.message))
                        .unwrap_or_else(|| ("Unknown".to_string(), "no error detail".to_string()));
                    return Err(AnalysisError::Failed { code, message });
                }
                OperationStatus::NotStarted | OperationStatus::Running => {
                    tracing::debug!("Analysis still {:?}, polling again", operation.status);
                    tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms)).await;
                }
            }
        }

        Err(AnalysisError::Timeout {
            polls: self.config.max_polls,
        })
    }
}

impl DocumentAnalyzer for DocIntelClient {
    async fn analyze(&self, content: &[u8]) -> Result<AnalyzeResult, AnalysisError> {
        tracing::debug!(
            "Submitting {} bytes to model '{}'",
            content.len(),
            self.config.model
        );

        let operation_url = self.begin_analyze(content).await?;
        let result = self.wait_for_result(&operation_url).await?;

        tracing::debug!(
            "Analysis complete: {} key-value pairs, {} paragraphs",
            result.key_value_pairs.len(),
            result.paragraphs.len()
        );

        Ok(result)
    }
}
