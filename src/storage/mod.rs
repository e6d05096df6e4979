mod client;
mod s3;

pub use client::{ObjectStore, ObjectTag, StorageError};
pub use s3::S3Store;
