//! Async S3 bucket utilities
//!
//! A thin wrapper around the AWS S3 SDK for working with objects in a single
//! named bucket: existence check, delete, download, upload and presigned GET
//! URL generation. Every operation builds its own scoped client and releases
//! it on return, so the wrapper carries no connection state between calls.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod client;
mod error;

pub use client::BucketClient;
pub use error::{BucketError, BucketResult};
