use async_trait::async_trait;
use aws_sdk_sqs::Client;

use super::{NotificationQueue, QueueError, QueueMessage};

/// Maximum long-polling wait accepted by SQS.
pub const MAX_WAIT_TIME_SECONDS: i32 = 20;

pub struct SqsQueue {
    client: Client,
    queue_url: String,
    wait_time_seconds: i32,
}

impl SqsQueue {
    pub fn new(client: Client, queue_url: String, wait_time_seconds: i32) -> Self {
        Self {
            client,
            queue_url,
            wait_time_seconds: wait_time_seconds.clamp(0, MAX_WAIT_TIME_SECONDS),
        }
    }

    pub fn get_queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl NotificationQueue for SqsQueue {
    async fn receive(&self) -> Result<Option<QueueMessage>, QueueError> {
        let resp = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(1)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await
            .map_err(|e| QueueError::Receive {
                queue_url: self.queue_url.clone(),
                message: format!("{e:?}"),
            })?;

        let Some(message) = resp.messages.and_then(|messages| messages.into_iter().next()) else {
            return Ok(None);
        };

        // SQS always sets a receipt handle on received messages.
        let Some(receipt_handle) = message.receipt_handle else {
            return Err(QueueError::Receive {
                queue_url: self.queue_url.clone(),
                message: "received message without a receipt handle".to_owned(),
            });
        };

        Ok(Some(QueueMessage::new(
            message.message_id,
            receipt_handle,
            message.body,
        )))
    }

    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::Delete {
                queue_url: self.queue_url.clone(),
                message: format!("{e:?}"),
            })?;
        Ok(())
    }
}
