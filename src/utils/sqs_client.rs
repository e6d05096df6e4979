use aws_config::SdkConfig;
use aws_sdk_sqs::Client;

pub fn create_sqs_client(base_config: &SdkConfig) -> Client {
    Client::new(base_config)
}
