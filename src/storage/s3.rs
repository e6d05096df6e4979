use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    types::{Tag, Tagging},
};
use tokio::{fs::File, io::AsyncWriteExt};

use super::{ObjectStore, ObjectTag, StorageError};

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

fn tag_error(bucket: &str, key: &str, message: String) -> StorageError {
    StorageError::Tag {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
        message,
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<u64, StorageError> {
        let fetch_error = |message: String| StorageError::Fetch {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            message,
        };
        let write_error = |source: std::io::Error| StorageError::Write {
            path: destination.to_path_buf(),
            source,
        };

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| fetch_error(format!("{e:?}")))?;

        let mut file = File::create(destination).await.map_err(write_error)?;
        let mut body = resp.body;
        let copied = async {
            let mut written: u64 = 0;
            while let Some(chunk) = body
                .try_next()
                .await
                .map_err(|e| fetch_error(e.to_string()))?
            {
                file.write_all(&chunk).await.map_err(write_error)?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(write_error)?;
            Ok::<u64, StorageError>(written)
        }
        .await;

        if copied.is_err() {
            drop(file);
            if let Err(e) = tokio::fs::remove_file(destination).await {
                log::warn!(
                    "Failed to remove partial download {}: {e}",
                    destination.display()
                );
            }
        }
        copied
    }

    async fn put_tags(
        &self,
        bucket: &str,
        key: &str,
        tags: &[ObjectTag],
    ) -> Result<(), StorageError> {
        let tag_set = tags
            .iter()
            .map(|tag| {
                Tag::builder()
                    .key(tag.get_key())
                    .value(tag.get_value())
                    .build()
                    .map_err(|e| tag_error(bucket, key, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| tag_error(bucket, key, e.to_string()))?;

        self.client
            .put_object_tagging()
            .bucket(bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| tag_error(bucket, key, format!("{e:?}")))?;
        Ok(())
    }
}
