/// Location of an uploaded object, with the key already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Object {
    bucket: String,
    key: String,
}

impl S3Object {
    pub const fn new(bucket: String, key: String) -> Self {
        Self { bucket, key }
    }

    pub fn get_bucket(&self) -> &str {
        &self.bucket
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for S3Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}
