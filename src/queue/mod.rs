/// Record queue integration module
///
/// Provides the narrow publisher interface and the NATS JetStream client that
/// delivers serialized records to downstream consumers

pub mod client;

pub use client::{PublishError, QueueClient, RecordPublisher};
