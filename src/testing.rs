//! In-memory stand-ins for the queue, the object store, and the scanner.

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    queue::{NotificationQueue, QueueError, QueueMessage},
    scanner::{ScanError, ScanReport, Scanner},
    storage::{ObjectStore, ObjectTag, StorageError},
};

pub const QUEUE_URL: &str = "https://sqs.eu-west-2.amazonaws.com/123456789012/uploads";

/// Body of an S3 event notification with a single record.
pub fn notification_body(event_name: &str, bucket: &str, key: &str) -> String {
    serde_json::json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventName": event_name,
            "s3": {
                "bucket": {"name": bucket},
                "object": {"key": key, "size": 0}
            }
        }]
    })
    .to_string()
}

pub fn message(receipt_handle: &str, body: &str) -> QueueMessage {
    QueueMessage::new(
        Some(format!("id-{receipt_handle}")),
        receipt_handle.to_owned(),
        Some(body.to_owned()),
    )
}

#[derive(Default)]
pub struct FakeQueue {
    pending: Mutex<VecDeque<Result<Option<QueueMessage>, QueueError>>>,
    acknowledged: Mutex<Vec<String>>,
    receive_calls: Mutex<usize>,
    stop_when_drained: Option<CancellationToken>,
    fail_acknowledge: bool,
}

impl FakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(self, message: QueueMessage) -> Self {
        self.push(Ok(Some(message)))
    }

    pub fn with_empty_poll(self) -> Self {
        self.push(Ok(None))
    }

    pub fn with_receive_error(self) -> Self {
        self.push(Err(QueueError::Receive {
            queue_url: QUEUE_URL.to_owned(),
            message: "connection reset".to_owned(),
        }))
    }

    /// Cancels `token` once every queued response has been handed out.
    pub fn stop_when_drained(mut self, token: CancellationToken) -> Self {
        self.stop_when_drained = Some(token);
        self
    }

    pub fn failing_acknowledge(mut self) -> Self {
        self.fail_acknowledge = true;
        self
    }

    pub fn acknowledged(&self) -> Vec<String> {
        self.acknowledged.lock().unwrap().clone()
    }

    pub fn receive_calls(&self) -> usize {
        *self.receive_calls.lock().unwrap()
    }

    fn push(self, response: Result<Option<QueueMessage>, QueueError>) -> Self {
        self.pending.lock().unwrap().push_back(response);
        self
    }
}

#[async_trait]
impl NotificationQueue for FakeQueue {
    async fn receive(&self) -> Result<Option<QueueMessage>, QueueError> {
        *self.receive_calls.lock().unwrap() += 1;
        let next = self.pending.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => {
                if let Some(token) = &self.stop_when_drained {
                    token.cancel();
                }
                Ok(None)
            }
        }
    }

    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), QueueError> {
        if self.fail_acknowledge {
            return Err(QueueError::Delete {
                queue_url: QUEUE_URL.to_owned(),
                message: "access denied".to_owned(),
            });
        }
        self.acknowledged
            .lock()
            .unwrap()
            .push(receipt_handle.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeStore {
    objects: HashMap<(String, String), Vec<u8>>,
    downloads: Mutex<Vec<(String, String)>>,
    tags: Mutex<Vec<(String, String, Vec<ObjectTag>)>>,
    fail_tags: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, key: &str, contents: &[u8]) -> Self {
        self.objects
            .insert((bucket.to_owned(), key.to_owned()), contents.to_vec());
        self
    }

    pub fn failing_tags(mut self) -> Self {
        self.fail_tags = true;
        self
    }

    pub fn downloads(&self) -> Vec<(String, String)> {
        self.downloads.lock().unwrap().clone()
    }

    pub fn tags(&self) -> Vec<(String, String, Vec<ObjectTag>)> {
        self.tags.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, StorageError> {
        self.downloads
            .lock()
            .unwrap()
            .push((bucket.to_owned(), key.to_owned()));
        let Some(contents) = self.objects.get(&(bucket.to_owned(), key.to_owned())) else {
            return Err(StorageError::Fetch {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                message: "NoSuchKey".to_owned(),
            });
        };
        tokio::fs::write(destination, contents)
            .await
            .map_err(|source| StorageError::Write {
                path: destination.to_path_buf(),
                source,
            })?;
        Ok(contents.len() as u64)
    }

    async fn put_tags(
        &self,
        bucket: &str,
        key: &str,
        tags: &[ObjectTag],
    ) -> Result<(), StorageError> {
        if self.fail_tags {
            return Err(StorageError::Tag {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                message: "AccessDenied".to_owned(),
            });
        }
        self.tags
            .lock()
            .unwrap()
            .push((bucket.to_owned(), key.to_owned(), tags.to_vec()));
        Ok(())
    }
}

/// Reports a detection for any file containing [`FakeScanner::INFECTED_BYTES`], the way
/// clamdscan prints one line per file.
#[derive(Default)]
pub struct FakeScanner {
    scanned: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl FakeScanner {
    pub const INFECTED_BYTES: &'static [u8] = b"X5O!P%@AP[4\\PZX54(P^)7CC)7}$EICAR";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn scanned(&self) -> Vec<PathBuf> {
        self.scanned.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scanner for FakeScanner {
    async fn scan(&self, path: &Path) -> Result<ScanReport, ScanError> {
        self.scanned.lock().unwrap().push(path.to_path_buf());
        if self.fail {
            return Err(ScanError::Spawn {
                program: "clamdscan".to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            });
        }
        let contents = tokio::fs::read(path).await.map_err(|source| ScanError::Spawn {
            program: "clamdscan".to_owned(),
            source,
        })?;
        let infected = contents
            .windows(Self::INFECTED_BYTES.len())
            .any(|window| window == Self::INFECTED_BYTES);
        let output = if infected {
            format!("{}: Eicar-Test-Signature FOUND\n", path.display())
        } else {
            format!("{}: OK\n", path.display())
        };
        Ok(ScanReport::new(Some(i32::from(infected)), output))
    }
}
