use std::path::PathBuf;

use thiserror::Error;

use crate::{queue::QueueError, scanner::ScanError, storage::StorageError};

/// Failure of one stage of handling a notification.
///
/// None of these acknowledge the message: it stays on the queue and is redelivered once its
/// visibility timeout elapses.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("receive failed: {0}")]
    Receive(#[source] QueueError),

    #[error("object key {key:?} has no usable file name")]
    ScratchPath { key: String },

    #[error("download failed: {0}")]
    Download(#[source] StorageError),

    #[error("scan failed: {0}")]
    Scan(#[source] ScanError),

    #[error("tagging failed: {0}")]
    Tag(#[source] StorageError),

    #[error("failed to remove scratch file {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("acknowledge failed: {0}")]
    Acknowledge(#[source] QueueError),
}
