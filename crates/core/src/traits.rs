//! Storage trait definitions
//!
//! These traits define the small slice of an S3-compatible service that
//! navigation needs. They keep the core decoupled from the AWS SDK so that
//! sessions can be driven by mocks and in-memory stores in tests.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::connection::{Credentials, Region};
use crate::error::Result;

/// Metadata for an object, common prefix or bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Full object key, common prefix or bucket name
    pub key: String,

    /// Size in bytes (None for prefixes and buckets)
    pub size_bytes: Option<i64>,

    /// Last modified timestamp, or creation date for buckets
    pub last_modified: Option<Timestamp>,

    /// Whether this is a common prefix
    pub is_dir: bool,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for an object key
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            last_modified: None,
            is_dir: false,
        }
    }

    /// Create a new ObjectInfo for a common prefix
    pub fn dir(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            last_modified: None,
            is_dir: true,
        }
    }

    /// Create a new ObjectInfo for a bucket
    pub fn bucket(name: impl Into<String>) -> Self {
        Self::dir(name)
    }
}

/// One page of a list operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    /// Common prefixes first, then keys, each in provider order
    pub items: Vec<ObjectInfo>,

    /// Whether more pages are available
    pub truncated: bool,

    /// Continuation token for the next page
    pub continuation_token: Option<String>,
}

impl ListResult {
    /// Whether the page holds neither keys nor common prefixes
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Options for list operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Prefix to filter by
    pub prefix: Option<String>,

    /// Delimiter for grouping (None lists recursively)
    pub delimiter: Option<String>,

    /// Maximum number of keys to return per request
    pub max_keys: Option<i32>,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// Trait for S3-compatible storage operations
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List buckets visible to the account
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>>;

    /// Fetch one page of keys and common prefixes in a bucket
    async fn list_objects(&self, bucket: &str, options: &ListOptions) -> Result<ListResult>;
}

/// Builds an authenticated store for a region and credential pair
///
/// Implementations construct handles in memory only. Credentials are checked
/// by the service on first use.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Build a store bound to `region` using `credentials`
    async fn connect(
        &self,
        region: &Region,
        credentials: &Credentials,
    ) -> Result<Arc<dyn ObjectStore>>;
}
