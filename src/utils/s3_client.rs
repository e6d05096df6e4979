use aws_config::SdkConfig;
use aws_sdk_s3::{Client, config::Builder};

pub fn create_s3_client(base_config: &SdkConfig) -> Client {
    // Custom endpoints (MinIO, LocalStack) generally don't serve virtual-hosted buckets.
    let force_path_style = base_config.endpoint_url().is_some();
    let config = Builder::from(base_config)
        .force_path_style(force_path_style)
        .build();
    Client::from_conf(config)
}
