use serde::Deserialize;

// Every field is optional so that a structurally valid but irrelevant notification (for example
// an `s3:TestEvent` or an SNS envelope) still deserializes and can be rejected with a precise
// reason.
#[derive(Debug, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Option<Vec<S3Record>>,
}

#[derive(Debug, Deserialize)]
pub struct S3Record {
    pub s3: Option<S3Entity>,
    #[serde(rename = "eventName")]
    pub event_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct S3Entity {
    pub bucket: Option<S3Bucket>,
    pub object: Option<S3EventObject>,
}

#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct S3EventObject {
    pub key: Option<String>,
}
