//! Bucketwatch Core Library
//!
//! Core types, classification, and configuration for the Bucketwatch
//! object change notification handlers.

pub mod config;
pub mod error;
pub mod types;

pub use config::BucketwatchConfig;
pub use error::{Error, Result};

/// Bucketwatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default suffix every provisioned resource name derives from
pub const DEFAULT_STACK_SUFFIX: &str = "project-aws-cdk-3-3";

/// Default page fetched by the package probe
pub const DEFAULT_PROBE_URL: &str = "https://www.google.com";

/// Default package probe timeout (seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Queue visibility timeout for the SQS pipeline (seconds)
pub const QUEUE_VISIBILITY_TIMEOUT_SECS: u64 = 300;

/// Status marker attached to every emitted change entry
pub const STATUS_SUCCESS: &str = "success";
