use crate::{scanner::decode_key, utils::S3Event};

/// Prefix shared by every `s3:ObjectCreated:*` event name.
pub const OBJECT_CREATED_PREFIX: &str = "ObjectCreated:";

/// Why a message was discarded without being scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingBody,
    MalformedBody(String),
    MissingRecords,
    NotStorageEvent,
    IgnoredEvent(String),
    MissingObjectLocation,
    FolderMarker(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingBody => write!(f, "message has no body"),
            Self::MalformedBody(e) => write!(f, "message body is not an S3 notification: {e}"),
            Self::MissingRecords => write!(f, "message does not contain 'Records'"),
            Self::NotStorageEvent => write!(f, "message is not an S3 event"),
            Self::IgnoredEvent(name) => write!(
                f,
                "ignoring event {name:?}, only ObjectCreated events are processed"
            ),
            Self::MissingObjectLocation => write!(f, "S3 event has no bucket name or object key"),
            Self::FolderMarker(key) => write!(f, "{key:?} is a folder marker"),
        }
    }
}

/// Bucket and still-encoded key named by a valid upload notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNotification {
    bucket: String,
    raw_key: String,
}

impl ObjectNotification {
    pub fn get_bucket(&self) -> &str {
        &self.bucket
    }

    pub fn get_raw_key(&self) -> &str {
        &self.raw_key
    }
}

/// Checks, in order, that the body is an S3 notification with at least one record, that the
/// first record is an S3 event, and that it reports an object creation.
pub fn parse_notification(body: Option<&str>) -> Result<ObjectNotification, SkipReason> {
    let body = body.ok_or(SkipReason::MissingBody)?;
    let event: S3Event =
        serde_json::from_str(body).map_err(|e| SkipReason::MalformedBody(e.to_string()))?;

    let record = event
        .records
        .and_then(|records| records.into_iter().next())
        .ok_or(SkipReason::MissingRecords)?;
    let entity = record.s3.ok_or(SkipReason::NotStorageEvent)?;

    let event_name = record.event_name.unwrap_or_default();
    if !event_name.starts_with(OBJECT_CREATED_PREFIX) {
        return Err(SkipReason::IgnoredEvent(event_name));
    }

    let bucket = entity
        .bucket
        .and_then(|bucket| bucket.name)
        .ok_or(SkipReason::MissingObjectLocation)?;
    let raw_key = entity
        .object
        .and_then(|object| object.key)
        .ok_or(SkipReason::MissingObjectLocation)?;
    if decode_key(&raw_key).ends_with('/') {
        return Err(SkipReason::FolderMarker(raw_key));
    }

    Ok(ObjectNotification { bucket, raw_key })
}
