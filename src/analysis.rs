//! Data model for document-analysis service results.
//!
//! Mirrors the wire shape of the analysis REST API: a completed analysis
//! carries detected key-value pairs (form labels and their values) and
//! paragraphs (body text blocks in reading order).

use serde::{Deserialize, Serialize};

/// A recognized text span. Only the content matters to extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldElement {
    pub content: String,
}

impl FieldElement {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A detected label/value association on a form.
///
/// Either side may be absent when the service detects a dangling label or an
/// orphaned value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyValuePair {
    #[serde(default)]
    pub key: Option<FieldElement>,
    #[serde(default)]
    pub value: Option<FieldElement>,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(FieldElement::new(key)),
            value: Some(FieldElement::new(value)),
        }
    }
}

/// A contiguous block of recognized body text, distinct from labeled fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: String,
}

impl Paragraph {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// The structured output of a completed document analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub key_value_pairs: Vec<KeyValuePair>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

/// Status of a long-running analysis operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

/// Service-reported failure detail on a failed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationError {
    pub code: String,
    pub message: String,
}

/// Poll envelope returned by the operation-status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOperation {
    pub status: OperationStatus,
    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    pub error: Option<OperationError>,
}
