//! Record extraction from analysis results.
//!
//! Folds a structured [`AnalyzeResult`] into a flat field record ready for
//! JSON serialization: one pass over detected key-value pairs (checkbox state
//! surfaces as sentinel selection markers), one pass over paragraphs to
//! aggregate free-text comments into a single `"Message"` field.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::{AnalyzeResult, KeyValuePair, Paragraph};

/// Sentinel value content marking a selected checkbox.
pub const SELECTED_MARKER: &str = ":selected:";

/// Sentinel value content marking an unselected checkbox.
pub const UNSELECTED_MARKER: &str = ":unselected:";

/// Record key holding the aggregated free-text message.
pub const MESSAGE_KEY: &str = "Message";

/// Explicit message label scanned for inside long paragraphs.
const MESSAGE_LABEL: &str = "Message:";

/// Paragraphs at or below this byte length are never treated as comments.
const MIN_COMMENT_LEN: usize = 40;

/// A single field value in an extracted record.
///
/// Serialized untagged, so the wire JSON carries plain strings and booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Text(String),
    Flag(bool),
}

impl RecordValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(s) => Some(s),
            RecordValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RecordValue::Text(_) => None,
            RecordValue::Flag(b) => Some(*b),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Text(s) => write!(f, "{}", s),
            RecordValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        RecordValue::Text(s.to_string())
    }
}

impl From<bool> for RecordValue {
    fn from(b: bool) -> Self {
        RecordValue::Flag(b)
    }
}

/// Flat mapping from field name to value, one per analyzed document.
///
/// Keys are unique; a later insert for the same key overwrites the earlier
/// one. Iteration follows insertion order, though the wire contract places no
/// requirement on JSON key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedRecord {
    fields: IndexMap<String, RecordValue>,
}

impl ExtractedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the previous value for the key if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RecordValue>,
    ) -> Option<RecordValue> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize to a single-line JSON object.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Fold an analysis result into a flat field record.
///
/// Runs the key-value pass, then the message-aggregation pass. The message
/// pass wins when both produce a `"Message"` key. Pure: no side effects
/// beyond the returned record.
pub fn extract_record(result: &AnalyzeResult) -> ExtractedRecord {
    let mut record = ExtractedRecord::new();

    fold_key_value_pairs(&result.key_value_pairs, &mut record);

    if let Some(message) = aggregate_message(&result.paragraphs) {
        record.insert(MESSAGE_KEY, RecordValue::Text(message));
    }

    record
}

/// Pass 1: fold key-value pairs into the record.
///
/// Pairs with an absent key or value are skipped. Sentinel selection markers
/// become booleans; any other value content is stored verbatim, untrimmed.
fn fold_key_value_pairs(pairs: &[KeyValuePair], record: &mut ExtractedRecord) {
    for pair in pairs {
        let (Some(key), Some(value)) = (&pair.key, &pair.value) else {
            continue;
        };

        let folded = match value.content.as_str() {
            SELECTED_MARKER => RecordValue::Flag(true),
            UNSELECTED_MARKER => RecordValue::Flag(false),
            other => RecordValue::Text(other.to_string()),
        };

        record.insert(key.content.clone(), folded);
    }
}

/// Pass 2: aggregate free-text comments from paragraphs.
///
/// Only paragraphs longer than 40 bytes participate. A paragraph carrying a
/// `"Message:"` label past position 0 contributes the trimmed text after the
/// label, prepended to the accumulator; the newest labeled match therefore
/// ends up first when a document carries several. A long paragraph with no
/// colon at all is trimmed and appended with a leading space. Everything else
/// is ignored.
fn aggregate_message(paragraphs: &[Paragraph]) -> Option<String> {
    let mut message = String::new();

    for paragraph in paragraphs {
        let text = paragraph.content.as_str();
        if text.len() <= MIN_COMMENT_LEN {
            continue;
        }

        match text.find(MESSAGE_LABEL) {
            Some(index) if index > 0 => {
                message.insert_str(0, text[index + MESSAGE_LABEL.len()..].trim());
            }
            _ if !text.contains(':') => {
                message.push(' ');
                message.push_str(text.trim());
            }
            _ => {}
        }
    }

    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}
