//! # Formrelay: OCR Form-Field Extraction Relay
//!
//! Formrelay turns scanned survey forms into flat JSON records. A storage
//! trigger delivers `(filename, bytes)`; the relay sends the bytes to a
//! document-analysis service with key-value-pair detection enabled, folds the
//! structured result into a single field record, and publishes the record to
//! a queue for downstream consumers.
//!
//! ## Pipeline
//!
//! 1. **Analyze**: submit the document and poll the long-running operation
//!    until the service returns key-value pairs and paragraphs.
//! 2. **Extract**: fold key-value pairs into record fields (checkbox sentinel
//!    markers `:selected:`/`:unselected:` become booleans) and aggregate long
//!    free-text paragraphs into a single `"Message"` field.
//! 3. **Publish**: serialize the record as one JSON object and send it as a
//!    text message to the configured queue.
//!
//! The analyzer and publisher sit behind narrow traits
//! ([`docintel::DocumentAnalyzer`], [`queue::RecordPublisher`]) so the
//! pipeline is testable without network access.

// Core modules
pub mod analysis;
pub mod config;
pub mod extract;
pub mod handler;

// Document-analysis service integration
pub mod docintel;

// Record queue integration
pub mod queue;

// Re-export key types
pub use analysis::{AnalyzeResult, FieldElement, KeyValuePair, Paragraph};
pub use config::{AppConfig, ConfigError, DocIntelConfig, QueueConfig};
pub use extract::{extract_record, ExtractedRecord, RecordValue};
pub use handler::{handle_document, HandlerError};

// Re-export client types
pub use docintel::{AnalysisError, DocIntelClient, DocumentAnalyzer};
pub use queue::{PublishError, QueueClient, RecordPublisher};
