use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads the shared AWS configuration used by both the SQS and the S3 clients.
///
/// Credentials come from the default provider chain (environment, profile, instance metadata).
pub async fn load_aws_config(region_id: &str, endpoint: Option<&str>) -> SdkConfig {
    let mut loader =
        aws_config::defaults(BehaviorVersion::v2025_08_07()).region(Region::new(region_id.to_owned()));
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}
