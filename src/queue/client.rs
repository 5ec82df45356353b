/// NATS JetStream client for record publishing
///
/// Provides connection management and text-message publishing to the
/// configured record stream

use async_nats::jetstream;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::config::QueueConfig;

/// Error type for queue operations
#[derive(Debug)]
pub enum PublishError {
    /// Connecting to the queue server or preparing the stream failed
    Connect(async_nats::Error),
    /// Sending the message failed
    Publish(async_nats::Error),
    /// The server did not acknowledge the message
    Ack(async_nats::Error),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Connect(e) => write!(f, "Queue connect failed: {}", e),
            PublishError::Publish(e) => write!(f, "Queue publish failed: {}", e),
            PublishError::Ack(e) => write!(f, "Queue did not acknowledge publish: {}", e),
        }
    }
}

impl std::error::Error for PublishError {}

impl From<async_nats::Error> for PublishError {
    fn from(err: async_nats::Error) -> Self {
        PublishError::Publish(err)
    }
}

/// Narrow interface over the queue, so handler logic can be exercised
/// without a running server.
pub trait RecordPublisher {
    /// Publish one text message to the configured queue.
    fn publish(&self, message: &str) -> impl Future<Output = Result<(), PublishError>> + Send;
}

#[derive(Clone)]
pub struct QueueClient {
    client: async_nats::Client,
    jetstream: jetstream::Context,
    subject: String,
}

impl QueueClient {
    /// Connect to the queue server and initialize the record stream
    pub async fn connect(config: QueueConfig) -> Result<Self, PublishError> {
        let client = match &config.token {
            Some(token) => async_nats::ConnectOptions::with_token(token.clone())
                .connect(&config.url)
                .await
                .map_err(|e| PublishError::Connect(Box::new(e)))?,
            None => async_nats::connect(&config.url)
                .await
                .map_err(|e| PublishError::Connect(Box::new(e)))?,
        };
        tracing::info!("Connected to queue server at {}", config.url);

        let jetstream = jetstream::new(client.clone());

        // Create or get stream
        let _stream = jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: config.stream_name.clone(),
                subjects: vec!["records.>".to_string()],
                max_age: Duration::from_secs(24 * 60 * 60),
                storage: jetstream::stream::StorageType::File,
                num_replicas: 1,
                ..Default::default()
            })
            .await
            .map_err(|e| PublishError::Connect(Box::new(e)))?;

        tracing::info!(
            "JetStream stream '{}' ready, publishing to queue '{}'",
            config.stream_name,
            config.queue_name
        );

        Ok(Self {
            client,
            jetstream,
            subject: format!("records.{}", config.queue_name),
        })
    }

    /// Check if the queue connection is active
    pub fn is_connected(&self) -> bool {
        self.client.connection_state() == async_nats::connection::State::Connected
    }
}

impl RecordPublisher for QueueClient {
    async fn publish(&self, message: &str) -> Result<(), PublishError> {
        // Publish with JetStream (durable, acknowledged)
        let ack = self
            .jetstream
            .publish(self.subject.clone(), message.as_bytes().to_vec().into())
            .await
            .map_err(|e| PublishError::Publish(Box::new(e)))?;

        // Wait for acknowledgment
        ack.await.map_err(|e| PublishError::Ack(Box::new(e)))?;

        tracing::debug!("Published {} bytes to subject {}", message.len(), self.subject);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts_to_publish_variant() {
        let transport: async_nats::Error = "connection reset".into();

        let err: PublishError = transport.into();

        assert!(matches!(err, PublishError::Publish(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_variants_name_the_failed_stage() {
        let connect = PublishError::Connect("refused".into());
        let ack = PublishError::Ack("timed out".into());

        assert!(connect.to_string().contains("connect"));
        assert!(ack.to_string().contains("acknowledge"));
    }
}
