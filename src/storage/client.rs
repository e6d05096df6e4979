use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTag {
    key: String,
    value: String,
}

impl ObjectTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ObjectTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to fetch s3://{bucket}/{key}: {message}")]
    Fetch {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to tag s3://{bucket}/{key}: {message}")]
    Tag {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Bucket/key addressed blob storage with per-object tags.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Downloads an object to `destination`, overwriting it, and returns the number of bytes
    /// written. Nothing is created if the object can't be fetched, and a partially written file
    /// is removed.
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, StorageError>;

    /// Replaces the full tag set of an object.
    async fn put_tags(
        &self,
        bucket: &str,
        key: &str,
        tags: &[ObjectTag],
    ) -> Result<(), StorageError>;
}
