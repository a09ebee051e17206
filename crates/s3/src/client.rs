//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore and Connector traits from sn-core.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use sn_core::{
    Connector, Credentials, Error, ListOptions, ListResult, ObjectInfo, ObjectStore, Region,
    Result,
};

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    region: Region,
}

impl S3Client {
    /// Create a new S3 client for a region and credential pair
    ///
    /// No request is sent; credentials are checked by the service on first use.
    pub async fn new(region: &Region, credentials: &Credentials) -> Result<Self> {
        if region.s3_endpoint.is_empty() {
            return Err(Error::Config("region has no endpoint".into()));
        }

        let provider = aws_credential_types::Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3nav-static-credentials",
        );

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(provider)
            .region(aws_config::Region::new(region.name.clone()))
            .endpoint_url(&region.s3_endpoint)
            .load()
            .await;

        // Path-style addressing works for every S3-compatible endpoint
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            region: region.clone(),
        })
    }

    /// Region this client targets
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Map a service error code onto the core error taxonomy
fn classify(code: Option<&str>, message: String, bucket: Option<&str>) -> Error {
    match code {
        Some("NoSuchBucket") => Error::BucketNotFound(bucket.unwrap_or_default().to_string()),
        Some(
            "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "InvalidToken"
            | "ExpiredToken",
        ) => Error::Auth(message),
        _ => Error::Network(message),
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>, bucket: Option<&str>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let code = err.code().map(str::to_string);
    let message = DisplayErrorContext(&err).to_string();
    tracing::debug!(code = code.as_deref().unwrap_or("none"), "storage request failed");
    classify(code.as_deref(), message, bucket)
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::from_second(dt.secs()).ok()
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| map_sdk_error(e, None))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = ObjectInfo::bucket(b.name().unwrap_or_default());
                info.last_modified = b.creation_date().and_then(to_timestamp);
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn list_objects(&self, bucket: &str, options: &ListOptions) -> Result<ListResult> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if let Some(p) = &options.prefix {
            if !p.is_empty() {
                request = request.prefix(p);
            }
        }

        if let Some(d) = &options.delimiter {
            request = request.delimiter(d);
        }

        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }

        if let Some(token) = &options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Some(bucket)))?;

        let mut items = Vec::new();

        // Add common prefixes (directories)
        for prefix in response.common_prefixes() {
            if let Some(p) = prefix.prefix() {
                items.push(ObjectInfo::dir(p));
            }
        }

        // Add objects
        for object in response.contents() {
            let key = object.key().unwrap_or_default();
            let mut info = ObjectInfo::file(key, object.size().unwrap_or(0));
            info.last_modified = object.last_modified().and_then(to_timestamp);
            items.push(info);
        }

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }
}

/// Connector producing [`S3Client`] stores
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Connector;

#[async_trait]
impl Connector for S3Connector {
    async fn connect(
        &self,
        region: &Region,
        credentials: &Credentials,
    ) -> Result<Arc<dyn ObjectStore>> {
        let client = S3Client::new(region, credentials).await?;
        Ok(Arc::new(client))
    }
}
