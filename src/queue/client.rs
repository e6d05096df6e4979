use async_trait::async_trait;
use thiserror::Error;

/// A notification received from the queue, still invisible to other consumers until it is
/// acknowledged or its visibility timeout elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    message_id: Option<String>,
    receipt_handle: String,
    body: Option<String>,
}

impl QueueMessage {
    pub const fn new(
        message_id: Option<String>,
        receipt_handle: String,
        body: Option<String>,
    ) -> Self {
        Self {
            message_id,
            receipt_handle,
            body,
        }
    }

    pub fn get_message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn get_receipt_handle(&self) -> &str {
        &self.receipt_handle
    }

    pub fn get_body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to receive from queue {queue_url}: {message}")]
    Receive { queue_url: String, message: String },

    #[error("failed to delete message from queue {queue_url}: {message}")]
    Delete { queue_url: String, message: String },
}

/// At-least-once delivery queue of upload notifications.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Waits a bounded interval for at most one message.
    async fn receive(&self) -> Result<Option<QueueMessage>, QueueError>;

    /// Removes a message from the queue by its receipt handle.
    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError>;
}
