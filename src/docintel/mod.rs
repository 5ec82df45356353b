/// Document-analysis service integration
///
/// Provides the narrow analyzer interface plus the REST client that begins an
/// analysis and polls the long-running operation to completion

pub mod client;

pub use client::{AnalysisError, DocIntelClient, DocumentAnalyzer};
