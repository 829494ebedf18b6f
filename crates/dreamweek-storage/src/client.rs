use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;

/// Build an S3 client from the default credential chain and region.
pub async fn build_client() -> Client {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    Client::new(&config)
}

/// Build an S3 client pinned to `region`.
pub async fn build_client_for_region(region: &str) -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}
