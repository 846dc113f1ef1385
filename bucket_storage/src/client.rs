//! S3 bucket client implementation

use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, presigning::PresigningConfig,
    primitives::ByteStream, Client,
};
use tokio::{fs::File, io};
use tracing::{debug, error};

use crate::error::{BucketError, BucketResult};

/// Default lifetime of a presigned GET URL, in seconds.
const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 3600;

/// Async client for objects in a single S3 bucket.
///
/// The client holds no connections. Every operation loads the default AWS
/// configuration, builds its own S3 client and drops it on return, so no
/// network resources outlive the call on any exit path. Concurrent calls on
/// one instance are independent of each other.
pub struct BucketClient {
    bucket_name: String,
    endpoint_url: Option<String>,
}

impl BucketClient {
    /// Creates a client for the given bucket.
    ///
    /// `endpoint_url` overrides the AWS endpoint, for S3-compatible stores
    /// such as LocalStack or MinIO. When it is set, path-style addressing is
    /// used as well.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if `bucket_name` is empty
    pub fn new(
        bucket_name: impl Into<String>,
        endpoint_url: Option<String>,
    ) -> BucketResult<Self> {
        let bucket_name = bucket_name.into();
        if bucket_name.is_empty() {
            return Err(BucketError::ConfigError(
                "bucket name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            bucket_name,
            endpoint_url,
        })
    }

    /// Creates a client from the `S3_BUCKET_NAME` and optional
    /// `S3_ENDPOINT_URL` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if `S3_BUCKET_NAME` is not set
    pub fn from_env() -> BucketResult<Self> {
        let bucket_name = std::env::var("S3_BUCKET_NAME").map_err(|_| {
            BucketError::ConfigError("S3_BUCKET_NAME environment variable not set".to_string())
        })?;
        let endpoint_url = std::env::var("S3_ENDPOINT_URL").ok();

        Self::new(bucket_name, endpoint_url)
    }

    /// The bucket this client operates on
    #[must_use]
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Builds the S3 client used by a single operation.
    ///
    /// Credentials and region come from the SDK's default provider chain.
    /// Path-style addressing is forced when an endpoint override is set,
    /// for compatibility with LocalStack and MinIO.
    /// <https://github.com/awslabs/aws-sdk-rust/discussions/874>
    async fn scoped_client(&self) -> Client {
        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder();

        if let Some(endpoint_url) = self.endpoint_url.as_deref() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        let sdk_config = config_builder.build();
        let s3_config: aws_sdk_s3::Config = (&sdk_config).into();
        let mut builder = s3_config.to_builder();

        if self.endpoint_url.is_some() {
            builder.set_force_path_style(Some(true));
        }

        Client::from_conf(builder.build())
    }

    /// Checks whether an object exists in the bucket.
    ///
    /// Issues a `HeadObject` request, so only metadata travels over the
    /// wire.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the object exists
    /// * `Ok(false)` if the service reports the object as not found
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` for any other service failure and
    /// `BucketError::AwsError` when the request never reached the service
    pub async fn object_exists(&self, object_key: &str) -> BucketResult<bool> {
        debug!("Checking if object exists: {object_key}");

        let result = self
            .scoped_client()
            .await
            .head_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                debug!("Object does not exist: {object_key}");
                Ok(false)
            }
            Err(err) => Err(BucketError::from_sdk(err)),
        }
    }

    /// Deletes an object from the bucket.
    ///
    /// No existence check is performed first; S3 treats deleting an absent
    /// key as a no-op success and this client keeps that behavior.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` for service failures and
    /// `BucketError::AwsError` when the request never reached the service
    pub async fn delete_object(&self, object_key: &str) -> BucketResult<()> {
        debug!("Deleting object: {object_key}");

        self.scoped_client()
            .await
            .delete_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .send()
            .await
            .map_err(BucketError::from_sdk)?;

        Ok(())
    }

    /// Downloads an object and writes its bytes to a local file.
    ///
    /// The destination file is created (truncating any existing file) and
    /// the object body is streamed into it; the handle is closed on every
    /// exit path. A partially written file is left in place when the
    /// transfer fails mid-stream.
    ///
    /// # Errors
    ///
    /// Returns `BucketError::S3Error` / `BucketError::AwsError` for remote
    /// failures and `BucketError::IoError` when the file cannot be created
    /// or written
    pub async fn download_object(&self, object_key: &str, destination: &str) -> BucketResult<()> {
        debug!("Downloading object {object_key} to {destination}");

        let response = self
            .scoped_client()
            .await
            .get_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .send()
            .await
            .map_err(BucketError::from_sdk)?;

        let mut file = File::create(destination).await?;
        let mut body = response.body.into_async_read();
        let bytes_written = io::copy(&mut body, &mut file).await?;

        debug!("Downloaded {bytes_written} bytes from {object_key} to {destination}");
        Ok(())
    }

    /// Uploads a local file to the bucket.
    ///
    /// When `object_key` is `None` the literal `file_path` string is used as
    /// the key, separators included; the store treats it as an opaque name.
    /// Large files are chunked by the SDK, not by this client.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the file was uploaded
    /// * `Ok(false)` if the service rejected the request; the rejection is
    ///   logged, not propagated
    ///
    /// # Errors
    ///
    /// Returns `BucketError::IoError` if the source file cannot be read and
    /// `BucketError::AwsError` when the request never reached the service.
    /// Neither is converted to `Ok(false)`.
    pub async fn upload_file(
        &self,
        file_path: &str,
        object_key: Option<&str>,
    ) -> BucketResult<bool> {
        let object_key = object_key.unwrap_or(file_path);
        debug!("Uploading {file_path} as {object_key}");

        let body = ByteStream::from_path(file_path)
            .await
            .map_err(|err| BucketError::IoError(err.to_string()))?;

        let result = self
            .scoped_client()
            .await
            .put_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .body(body)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err)) => {
                error!(
                    "Failed to upload {file_path} as {object_key}: {}",
                    service_err.err()
                );
                Ok(false)
            }
            Err(err) => Err(BucketError::from_sdk(err)),
        }
    }

    /// Generates a presigned GET URL for an object.
    ///
    /// The object's existence is not verified. `expires_in` defaults to one
    /// hour when `None`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(url))` on success
    /// * `Ok(None)` if the client reports a service-level error; the error
    ///   is logged, not propagated
    ///
    /// # Errors
    ///
    /// Returns `BucketError::ConfigError` if the expiry window is rejected
    /// (SigV4 caps it at one week) and `BucketError::AwsError` for SDK
    /// failures outside the service-error class
    pub async fn generate_presigned_get_url(
        &self,
        object_key: &str,
        expires_in: Option<u64>,
    ) -> BucketResult<Option<String>> {
        let expires_in = expires_in.unwrap_or(DEFAULT_PRESIGN_EXPIRY_SECS);
        debug!("Generating presigned GET URL for {object_key}, expires in {expires_in}s");

        let presigning_config = PresigningConfig::expires_in(Duration::from_secs(expires_in))
            .map_err(|err| {
                BucketError::ConfigError(format!("Failed to create presigning config: {err}"))
            })?;

        let result = self
            .scoped_client()
            .await
            .get_object()
            .bucket(&self.bucket_name)
            .key(object_key)
            .presigned(presigning_config)
            .await;

        match result {
            Ok(request) => Ok(Some(request.uri().to_string())),
            Err(SdkError::ServiceError(service_err)) => {
                error!(
                    "Failed to presign GET for {object_key}: {}",
                    service_err.err()
                );
                Ok(None)
            }
            Err(err) => Err(BucketError::from_sdk(err)),
        }
    }
}
