mod s3_client;
mod s3_object;
mod sdk_config;
mod sqs_client;
mod sqs_s3_message;

pub use s3_client::create_s3_client;
pub use s3_object::S3Object;
pub use sdk_config::load_aws_config;
pub use sqs_client::create_sqs_client;
pub use sqs_s3_message::S3Event;
