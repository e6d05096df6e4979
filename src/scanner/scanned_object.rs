use super::ScanVerdict;
use crate::utils::S3Object;

/// An object that was downloaded, scanned, and tagged with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedObject {
    object: S3Object,
    size: u64,
    verdict: ScanVerdict,
}

impl ScannedObject {
    pub const fn new(object: S3Object, size: u64, verdict: ScanVerdict) -> Self {
        Self {
            object,
            size,
            verdict,
        }
    }

    pub const fn get_object(&self) -> &S3Object {
        &self.object
    }

    pub const fn get_size(&self) -> u64 {
        self.size
    }

    pub const fn get_verdict(&self) -> ScanVerdict {
        self.verdict
    }
}
