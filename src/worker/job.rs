use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use super::{SkipReason, parse_notification};
use crate::{
    error::ProcessError,
    queue::{NotificationQueue, QueueMessage},
    scanner::{ScannedObject, Scanner, scan_object},
    storage::ObjectStore,
};

/// Pause after a failed receive, so an unreachable queue doesn't turn the loop into a spin.
const RECEIVE_ERROR_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    scratch_dir: PathBuf,
    idle_delay: Duration,
}

impl WorkerConfig {
    pub const fn new(scratch_dir: PathBuf, idle_delay: Duration) -> Self {
        Self {
            scratch_dir,
            idle_delay,
        }
    }

    pub fn get_scratch_dir(&self) -> &std::path::Path {
        &self.scratch_dir
    }

    pub const fn get_idle_delay(&self) -> Duration {
        self.idle_delay
    }
}

/// What one poll of the queue amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Idle,
    Discarded(SkipReason),
    Scanned(ScannedObject),
}

pub struct Worker {
    queue: Arc<dyn NotificationQueue>,
    store: Arc<dyn ObjectStore>,
    scanner: Arc<dyn Scanner>,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        store: Arc<dyn ObjectStore>,
        scanner: Arc<dyn Scanner>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            queue,
            store,
            scanner,
            config,
        }
    }

    /// Polls the queue one message at a time until `shutdown` is cancelled.
    ///
    /// Cancellation interrupts a pending receive but never a message that is already being
    /// processed.
    pub async fn run(&self, shutdown: CancellationToken) {
        log::info!("Upload scanner worker is running.");
        while !shutdown.is_cancelled() {
            let delay = match self.poll_once(&shutdown).await {
                Ok(Outcome::Idle) => self.config.get_idle_delay(),
                Ok(outcome) => {
                    log::debug!("Message handled: {outcome:?}");
                    Duration::ZERO
                }
                Err(e @ ProcessError::Receive(_)) => {
                    log::error!("{e}");
                    self.config.get_idle_delay().max(RECEIVE_ERROR_DELAY)
                }
                Err(e) => {
                    log::error!("Error processing message: {e}");
                    Duration::ZERO
                }
            };

            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }
            }
        }
        log::info!("Upload scanner worker stopped.");
    }

    /// Receives at most one message and handles it.
    ///
    /// Returns [`Outcome::Idle`] when no message arrived within the queue's wait time, or when
    /// `shutdown` was cancelled while waiting for one.
    pub async fn poll_once(&self, shutdown: &CancellationToken) -> Result<Outcome, ProcessError> {
        log::debug!("Polling queue for new messages...");
        let received = tokio::select! {
            biased;
            () = shutdown.cancelled() => return Ok(Outcome::Idle),
            received = self.queue.receive() => received.map_err(ProcessError::Receive)?,
        };

        match received {
            Some(message) => self.process(message).await,
            None => {
                log::info!("No new messages in queue. Retrying...");
                Ok(Outcome::Idle)
            }
        }
    }

    /// Handles one received message end to end.
    ///
    /// Messages that aren't object-creation notifications are acknowledged and discarded. Valid
    /// ones are acknowledged only after their object has been scanned and tagged; on any stage
    /// error the message is left on the queue for redelivery.
    pub async fn process(&self, message: QueueMessage) -> Result<Outcome, ProcessError> {
        let message_id = message.get_message_id().unwrap_or("<unknown>");
        log::debug!("Received message: {message:?}");

        let notification = match parse_notification(message.get_body()) {
            Ok(notification) => notification,
            Err(reason) => {
                log::warn!("Skipping message {message_id}: {reason}.");
                self.acknowledge(&message).await?;
                return Ok(Outcome::Discarded(reason));
            }
        };

        log::info!(
            "Processing file: {} from bucket: {} (message {message_id}).",
            notification.get_raw_key(),
            notification.get_bucket()
        );
        let scanned = scan_object(
            self.store.as_ref(),
            self.scanner.as_ref(),
            self.config.get_scratch_dir(),
            notification.get_bucket(),
            notification.get_raw_key(),
        )
        .await?;

        log::info!(
            "Finished {} ({} bytes): is_clean={}.",
            scanned.get_object(),
            scanned.get_size(),
            scanned.get_verdict().tag_value()
        );

        self.acknowledge(&message).await?;
        log::info!("Deleted processed message {message_id} from queue.");
        Ok(Outcome::Scanned(scanned))
    }

    async fn acknowledge(&self, message: &QueueMessage) -> Result<(), ProcessError> {
        self.queue
            .acknowledge(message.get_receipt_handle())
            .await
            .map_err(ProcessError::Acknowledge)
    }
}
