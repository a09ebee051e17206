//! In-memory object store
//!
//! Mirrors the listing semantics of an S3-compatible service closely enough
//! to drive sessions offline: delimiter grouping into common prefixes,
//! `max_keys` paging and opaque continuation tokens.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::connection::{Credentials, Region};
use crate::error::{Error, Result};
use crate::traits::{Connector, ListOptions, ListResult, ObjectInfo, ObjectStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

/// Object store backed by sorted maps
#[derive(Debug)]
pub struct MemoryStore {
    buckets: BTreeMap<String, BTreeMap<String, i64>>,
    page_size: usize,
    requests: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            requests: AtomicUsize::new(0),
        }
    }
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty bucket
    pub fn with_bucket(mut self, name: &str) -> Self {
        self.buckets.entry(name.to_string()).or_default();
        self
    }

    /// Add an object, creating its bucket if needed
    pub fn with_object(mut self, bucket: &str, key: &str, size: i64) -> Self {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), size);
        self
    }

    /// Cap every page at `size` entries
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Number of requests served so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.buckets.keys().map(ObjectInfo::bucket).collect())
    }

    async fn list_objects(&self, bucket: &str, options: &ListOptions) -> Result<ListResult> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let objects = self
            .buckets
            .get(bucket)
            .ok_or_else(|| Error::BucketNotFound(bucket.to_string()))?;

        let prefix = options.prefix.clone().unwrap_or_default();
        let delimiter = options.delimiter.as_deref().filter(|d| !d.is_empty());

        // Entries in key order; a common prefix sorts where its first key would
        let mut entries: Vec<ObjectInfo> = Vec::new();
        for (key, size) in objects.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            let grouped = delimiter
                .and_then(|d| rest.find(d).map(|idx| format!("{prefix}{}", &rest[..idx + d.len()])));
            match grouped {
                Some(common) => {
                    if entries.last().is_none_or(|last| last.key != common) {
                        entries.push(ObjectInfo::dir(common));
                    }
                }
                None => entries.push(ObjectInfo::file(key.as_str(), *size)),
            }
        }

        let start = match &options.continuation_token {
            Some(token) => entries.partition_point(|e| e.key.as_str() <= token.as_str()),
            None => 0,
        };
        let limit = options
            .max_keys
            .and_then(|m| usize::try_from(m).ok())
            .map_or(self.page_size, |m| m.min(self.page_size))
            .max(1);
        let end = (start + limit).min(entries.len());
        let truncated = end < entries.len();
        let continuation_token = if truncated {
            entries.get(end - 1).map(|e| e.key.clone())
        } else {
            None
        };

        // Common prefixes come back ahead of keys, as from the service
        let (mut items, files): (Vec<_>, Vec<_>) =
            entries.drain(start..end).partition(|e| e.is_dir);
        items.extend(files);

        Ok(ListResult {
            items,
            truncated,
            continuation_token,
        })
    }
}

/// Connector that hands out one shared store
#[derive(Clone)]
pub struct MemoryConnector {
    store: Arc<dyn ObjectStore>,
}

impl MemoryConnector {
    /// Serve `store` to every connection
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for MemoryConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryConnector").finish_non_exhaustive()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(
        &self,
        _region: &Region,
        _credentials: &Credentials,
    ) -> Result<Arc<dyn ObjectStore>> {
        Ok(self.store.clone())
    }
}
