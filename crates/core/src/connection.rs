//! Connections and bound buckets
//!
//! A [`Connection`] pairs the fixed provider region with one credential pair.
//! A [`BoundBucket`] pairs a connection with a bucket name and issues the
//! delimited listings that navigation is built on.

use std::sync::Arc;

use futures::Stream;

use crate::error::{Error, Result};
use crate::prefix::{DELIMITER, Prefix};
use crate::traits::{Connector, ListOptions, ListResult, ObjectInfo, ObjectStore};

/// Name of the only supported region
pub const REGION_NAME: &str = "liquidweb";

/// Service endpoint of the only supported region
pub const S3_ENDPOINT: &str = "https://objects.liquidweb.services";

/// Region identity a connection targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Region label used for request signing
    pub name: String,
    /// Service endpoint URL
    pub s3_endpoint: String,
}

impl Region {
    /// The fixed provider region
    pub fn provider() -> Self {
        Self {
            name: REGION_NAME.to_string(),
            s3_endpoint: S3_ENDPOINT.to_string(),
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::provider()
    }
}

/// Access key pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key ID
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Authenticated handle to the provider region
///
/// Immutable after creation. Cloning shares the underlying store.
#[derive(Clone)]
pub struct Connection {
    region: Region,
    credentials: Credentials,
    store: Arc<dyn ObjectStore>,
}

impl Connection {
    /// Build a connection to the provider region
    ///
    /// Only the in-memory client is constructed here. The service sees the
    /// credentials for the first time on the first request.
    pub async fn open(connector: &dyn Connector, credentials: Credentials) -> Result<Self> {
        let region = Region::provider();
        let store = connector.connect(&region, &credentials).await?;
        tracing::debug!(
            region = %region.name,
            endpoint = %region.s3_endpoint,
            access_key = %credentials.access_key,
            "connection ready"
        );
        Ok(Self {
            region,
            credentials,
            store,
        })
    }

    /// Region this connection targets
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Credentials this connection signs with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// List every bucket visible to the account
    pub async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        self.store.list_buckets().await
    }

    /// Get a handle for `name` without checking that it exists
    pub fn bucket(&self, name: impl Into<String>) -> BoundBucket {
        BoundBucket {
            name: name.into(),
            connection: self.clone(),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("region", &self.region)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// Check whether `name` is one of the account's buckets
///
/// Bucket names are compared case-insensitively. A missing bucket is a
/// normal negative answer; only a failed listing is an error.
pub async fn valid_bucket(name: &str, connection: &Connection) -> Result<bool> {
    let wanted = name.to_lowercase();
    let buckets = connection.list_buckets().await?;
    let found = buckets.iter().any(|b| b.key.to_lowercase() == wanted);
    tracing::debug!(bucket = %name, found, checked = buckets.len(), "bucket lookup");
    Ok(found)
}

/// A connection paired with one named bucket
#[derive(Debug, Clone)]
pub struct BoundBucket {
    name: String,
    connection: Connection,
}

/// Position in a paginated listing
enum Cursor {
    Start,
    Next(String),
    Done,
}

impl BoundBucket {
    /// Bucket name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connection the bucket is bound through
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Fetch one page of keys and common prefixes under `prefix`
    pub async fn list(
        &self,
        prefix: &str,
        delimiter: Option<&str>,
        marker: Option<String>,
    ) -> Result<ListResult> {
        let options = ListOptions {
            prefix: Some(prefix.to_string()),
            delimiter: delimiter.map(str::to_string),
            continuation_token: marker,
            ..Default::default()
        };
        self.list_with(&options).await
    }

    async fn list_with(&self, options: &ListOptions) -> Result<ListResult> {
        tracing::debug!(
            bucket = %self.name,
            prefix = options.prefix.as_deref().unwrap_or_default(),
            continuation = options.continuation_token.is_some(),
            "listing objects"
        );
        self.connection
            .store
            .list_objects(&self.name, options)
            .await
    }

    /// Whether anything at all is stored beneath `prefix`
    ///
    /// Only the first page of a delimited listing is requested.
    pub async fn has_children(&self, prefix: &Prefix) -> Result<bool> {
        let options = ListOptions {
            prefix: Some(prefix.key()),
            delimiter: Some(DELIMITER.to_string()),
            max_keys: Some(1),
            continuation_token: None,
        };
        let page = self.list_with(&options).await?;
        Ok(!page.is_empty())
    }

    /// Lazily fetch every page under `prefix`, one request at a time
    ///
    /// A `None` delimiter lists every key beneath the prefix.
    pub fn pages(
        &self,
        prefix: String,
        delimiter: Option<String>,
    ) -> impl Stream<Item = Result<ListResult>> + '_ {
        futures::stream::try_unfold(Cursor::Start, move |cursor| {
            let prefix = prefix.clone();
            let delimiter = delimiter.clone();
            async move {
                let marker = match cursor {
                    Cursor::Done => return Ok(None),
                    Cursor::Start => None,
                    Cursor::Next(token) => Some(token),
                };
                let page = self.list(&prefix, delimiter.as_deref(), marker).await?;
                let next = match (page.truncated, &page.continuation_token) {
                    (true, Some(token)) => Cursor::Next(token.clone()),
                    (true, None) => {
                        tracing::warn!(
                            bucket = %self.name,
                            prefix = %prefix,
                            "truncated listing without a continuation token"
                        );
                        Cursor::Done
                    }
                    (false, _) => Cursor::Done,
                };
                Ok::<_, Error>(Some((page, next)))
            }
        })
    }
}
