// Not every helper is used in every test, so we allow dead code
#![allow(dead_code)]

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Test configuration for LocalStack
pub const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
pub const TEST_REGION: &str = "us-east-1";

/// Sets the AWS environment variables the default provider chain resolves
/// and initializes tracing for tests
pub fn setup_test_env() {
    std::env::set_var("AWS_ACCESS_KEY_ID", "test");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "test");
    std::env::set_var("AWS_REGION", TEST_REGION);

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// S3 client for managing test buckets on LocalStack
pub async fn localstack_s3_client() -> S3Client {
    let credentials = Credentials::from_keys(
        "test", // AWS_ACCESS_KEY_ID
        "test", // AWS_SECRET_ACCESS_KEY
        None,   // no session token
    );
    let config = aws_config::defaults(BehaviorVersion::latest())
        .endpoint_url(LOCALSTACK_ENDPOINT)
        .region(Region::new(TEST_REGION))
        .credentials_provider(credentials)
        .load()
        .await;

    let s3_config: aws_sdk_s3::Config = (&config).into();
    let s3_config = s3_config.to_builder().force_path_style(true).build();

    S3Client::from_conf(s3_config)
}

/// Creates a bucket with a unique name to avoid races among tests
pub async fn create_test_bucket() -> (S3Client, String) {
    let client = localstack_s3_client().await;
    let bucket_name = format!("test-bucket-{}", Uuid::new_v4());

    client
        .create_bucket()
        .bucket(&bucket_name)
        .send()
        .await
        .expect("Failed to create test bucket");

    (client, bucket_name)
}

/// Deletes every object in the bucket, then the bucket itself
pub async fn cleanup_test_bucket(client: &S3Client, bucket_name: &str) {
    if let Ok(listing) = client.list_objects_v2().bucket(bucket_name).send().await {
        for object in listing.contents() {
            if let Some(key) = object.key() {
                let _ = client
                    .delete_object()
                    .bucket(bucket_name)
                    .key(key)
                    .send()
                    .await;
            }
        }
    }

    let _ = client.delete_bucket().bucket(bucket_name).send().await;
}

/// Generate a random payload of the given size and return data + SHA-256
pub fn generate_test_payload(size: usize) -> (Vec<u8>, String) {
    let mut buf = vec![0u8; size];
    rand::rngs::OsRng.fill_bytes(&mut buf);

    let sha256 = calculate_sha256(&buf);
    (buf, sha256)
}

/// Calculate SHA-256 checksum of data and return as lowercase hex string
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
