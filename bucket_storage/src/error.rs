//! Error types for bucket operations

use aws_sdk_s3::error::SdkError;
use thiserror::Error;

/// Result type for bucket operations
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur during bucket operations
#[derive(Error, Debug)]
pub enum BucketError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error that never reached the service (dispatch, timeout,
    /// response construction)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Local file I/O error
    #[error("File I/O error: {0}")]
    IoError(String),
}

impl BucketError {
    /// Splits a service-reported failure from an SDK-level one.
    pub(crate) fn from_sdk<E>(error: SdkError<E>) -> Self
    where
        E: std::error::Error,
    {
        match &error {
            SdkError::ServiceError(service_err) => Self::S3Error(service_err.err().to_string()),
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<std::io::Error> for BucketError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
