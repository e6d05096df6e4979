mod client;
mod sqs;

pub use client::{NotificationQueue, QueueError, QueueMessage};
pub use sqs::{MAX_WAIT_TIME_SECONDS, SqsQueue};
