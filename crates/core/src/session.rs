//! Navigation session
//!
//! A [`Session`] holds everything one invocation works with: the working
//! path, credentials, the configured bucket name, the output sink and, once
//! bound, the bucket handle. `chdir` and `lsdir` write their user-visible
//! results to the sink. A path with nothing beneath it is reported there and
//! never returned as an error.

use std::io::Write;
use std::pin::pin;

use futures::TryStreamExt;
use jiff::Timestamp;

use crate::connection::{BoundBucket, Connection, Credentials};
use crate::error::{Error, Result};
use crate::prefix::{DELIMITER, Prefix};
use crate::traits::{Connector, ObjectInfo};

/// Width of the timestamp column in long listings
const DATE_WIDTH: usize = 19;

/// Resolved invocation settings
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// Starting working path
    pub working_dir: String,
    /// Access key ID
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Bucket name, compared case-insensitively
    pub bucket: String,
}

impl SessionConfig {
    /// Reject empty credentials or bucket before anything touches the network
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        if self.bucket.trim().is_empty() {
            return Err(Error::Config("bucket name is not set".into()));
        }
        Ok(())
    }

    /// Reject an empty access key or secret key
    pub fn validate_credentials(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(Error::Config("access key is not set".into()));
        }
        if self.secret_key.is_empty() {
            return Err(Error::Config("secret key is not set".into()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("working_dir", &self.working_dir)
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Kind of a listing row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A common prefix
    Directory,
    /// An object key
    File,
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Name relative to the listed path; directories drop the trailing delimiter
    pub name: String,
    /// Directory or file
    pub kind: EntryKind,
    /// Object size (None for directories)
    pub size_bytes: Option<i64>,
    /// Last modified time, when the service reports one
    pub last_modified: Option<Timestamp>,
}

impl DirectoryEntry {
    /// Build an entry from a listed item, skipping the listed path itself
    ///
    /// Only a common prefix loses its trailing delimiter. A zero-byte marker
    /// object such as `a/c/` seen in a recursive listing keeps it.
    pub fn from_item(parent: &Prefix, item: &ObjectInfo) -> Option<Self> {
        let rest = parent.child_name(&item.key)?;
        let (name, kind) = if item.is_dir {
            (rest.strip_suffix(DELIMITER).unwrap_or(rest), EntryKind::Directory)
        } else {
            (rest, EntryKind::File)
        };
        Some(Self {
            name: name.to_string(),
            kind,
            size_bytes: item.size_bytes,
            last_modified: item.last_modified,
        })
    }

    /// Whether this entry is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Render with timestamp and size columns
    pub fn long_line(&self) -> String {
        let date = self
            .last_modified
            .map(|d| d.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| " ".repeat(DATE_WIDTH));
        let size = match self.size_bytes {
            Some(bytes) => humansize::format_size(bytes.max(0) as u64, humansize::BINARY),
            None => "0B".to_string(),
        };
        format!("[{date}] {size:>10} {self}")
    }
}

impl std::fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EntryKind::Directory => write!(f, "{}{DELIMITER}", self.name),
            EntryKind::File => write!(f, "{}", self.name),
        }
    }
}

/// How far below the listed path to descend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Immediate children, grouped by the delimiter
    #[default]
    Children,
    /// Every key beneath the path
    Recursive,
}

/// Listing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LsOptions {
    /// Children or recursive
    pub mode: ListMode,
    /// Include timestamp and size columns
    pub long: bool,
}

/// State for one invocation
pub struct Session<W: Write> {
    pwd: Prefix,
    credentials: Credentials,
    bucket_name: String,
    output: W,
    bucket: Option<BoundBucket>,
}

impl<W: Write> Session<W> {
    /// Create a session writing to `output`
    pub fn new(config: SessionConfig, output: W) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pwd: Prefix::parse(&config.working_dir),
            credentials: Credentials::new(config.access_key, config.secret_key),
            bucket_name: config.bucket,
            output,
            bucket: None,
        })
    }

    /// Current working path
    pub fn pwd(&self) -> &Prefix {
        &self.pwd
    }

    /// Bucket name as configured
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Credentials the session connects with
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The bound bucket, once `setup_bucket` or `bind` has run
    pub fn bucket(&self) -> Option<&BoundBucket> {
        self.bucket.as_ref()
    }

    /// The output sink
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Mutable access to the output sink
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Consume the session and return the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Build a connection to the provider region with the session credentials
    pub async fn setup_connection(&self, connector: &dyn Connector) -> Result<Connection> {
        Connection::open(connector, self.credentials.clone()).await
    }

    /// Connect and bind the configured bucket
    ///
    /// The bucket is not checked for existence here; see [`crate::valid_bucket`].
    pub async fn setup_bucket(&mut self, connector: &dyn Connector) -> Result<()> {
        let connection = self.setup_connection(connector).await?;
        self.bind(&connection)
    }

    /// Bind the configured bucket through an existing connection
    ///
    /// The name is lower-cased first. A session binds at most once.
    pub fn bind(&mut self, connection: &Connection) -> Result<()> {
        if let Some(bound) = &self.bucket {
            return Err(Error::General(format!(
                "bucket '{}' is already bound",
                bound.name()
            )));
        }
        let name = self.bucket_name.to_lowercase();
        tracing::debug!(bucket = %name, "binding bucket");
        self.bucket = Some(connection.bucket(name));
        Ok(())
    }

    fn bound(&self) -> Result<&BoundBucket> {
        self.bucket
            .as_ref()
            .ok_or_else(|| Error::Config("no bucket is bound to the session".into()))
    }

    /// Change the working path to `target`
    ///
    /// The root always succeeds without a query. Any other path must have at
    /// least one key or common prefix beneath it; otherwise a message is
    /// written to the sink and the working path is left alone.
    ///
    /// Returns whether the working path moved to `target`.
    pub async fn chdir(&mut self, target: &str) -> Result<bool> {
        let path = Prefix::resolve(&self.pwd, target);
        if path.is_root() {
            self.pwd = path;
            return Ok(true);
        }

        if self.bound()?.has_children(&path).await? {
            tracing::debug!(from = %self.pwd, to = %path, "changed directory");
            self.pwd = path;
            Ok(true)
        } else {
            tracing::debug!(path = %path, "directory not found");
            writeln!(self.output, "cd: {path}: No such directory")?;
            Ok(false)
        }
    }

    /// List the immediate children of `path`
    pub async fn lsdir(&mut self, path: &str) -> Result<()> {
        self.lsdir_with(path, LsOptions::default()).await
    }

    /// List `path`, one entry per line, as pages arrive
    ///
    /// Entries keep the order the service returns them in. The key equal to
    /// the listed prefix itself is never shown.
    pub async fn lsdir_with(&mut self, path: &str, options: LsOptions) -> Result<()> {
        let path = Prefix::resolve(&self.pwd, path);
        let delimiter = match options.mode {
            ListMode::Children => Some(DELIMITER.to_string()),
            ListMode::Recursive => None,
        };

        let bucket = self
            .bucket
            .as_ref()
            .ok_or_else(|| Error::Config("no bucket is bound to the session".into()))?;
        let mut pages = pin!(bucket.pages(path.key(), delimiter));

        let mut listed = 0usize;
        let mut page_count = 0usize;
        while let Some(page) = pages.try_next().await? {
            page_count += 1;
            listed += page.items.len();
            for entry in page
                .items
                .iter()
                .filter_map(|item| DirectoryEntry::from_item(&path, item))
            {
                if options.long {
                    writeln!(self.output, "{}", entry.long_line())?;
                } else {
                    writeln!(self.output, "{entry}")?;
                }
            }
        }
        tracing::debug!(path = %path, pages = page_count, items = listed, "listed directory");

        if listed == 0 && !path.is_root() {
            writeln!(self.output, "ls: {path}: No such directory")?;
        }
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for Session<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pwd", &self.pwd)
            .field("credentials", &self.credentials)
            .field("bucket_name", &self.bucket_name)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::connection::Region;
    use crate::memory::{MemoryConnector, MemoryStore};
    use crate::traits::{ListResult, MockObjectStore, ObjectStore};

    fn config() -> SessionConfig {
        SessionConfig {
            working_dir: "/".into(),
            access_key: "AccEssKey".into(),
            secret_key: "SecRetKey".into(),
            bucket: "BuKKiT".into(),
        }
    }

    fn scenario() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new()
                .with_object("bukkit", "a/b.txt", 5)
                .with_object("bukkit", "a/c/d.txt", 7),
        )
    }

    async fn bound_session(store: Arc<dyn ObjectStore>) -> Session<Vec<u8>> {
        let mut session = Session::new(config(), Vec::new()).unwrap();
        session
            .setup_bucket(&MemoryConnector::new(store))
            .await
            .unwrap();
        session
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.output().clone()).unwrap()
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut cfg = config();
        cfg.access_key.clear();
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let mut cfg = config();
        cfg.secret_key.clear();
        assert!(matches!(Session::new(cfg, Vec::new()), Err(Error::Config(_))));

        let mut cfg = config();
        cfg.bucket = "  ".into();
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_session_normalizes_working_dir() {
        let mut cfg = config();
        cfg.working_dir = String::new();
        let session = Session::new(cfg, Vec::new()).unwrap();
        assert!(session.pwd().is_root());

        let mut cfg = config();
        cfg.working_dir = "a/c/".into();
        let session = Session::new(cfg, Vec::new()).unwrap();
        assert_eq!(session.pwd().to_string(), "/a/c");
    }

    #[tokio::test]
    async fn test_setup_connection_uses_provider_region() {
        let session = Session::new(config(), Vec::new()).unwrap();
        let conn = session
            .setup_connection(&MemoryConnector::new(scenario()))
            .await
            .unwrap();
        assert_eq!(conn.region(), &Region::provider());
        assert_eq!(conn.credentials().access_key, "AccEssKey");
        assert_eq!(conn.credentials().secret_key, "SecRetKey");
    }

    #[tokio::test]
    async fn test_setup_bucket_lowercases_name() {
        let store = scenario();
        let session = bound_session(store.clone()).await;
        let bucket = session.bucket().unwrap();
        assert_eq!(bucket.name(), "bukkit");
        assert_eq!(session.bucket_name(), "BuKKiT");
        assert_eq!(
            bucket.connection().region().s3_endpoint,
            "https://objects.liquidweb.services"
        );
        assert_eq!(bucket.connection().credentials().access_key, "AccEssKey");
        assert_eq!(store.requests(), 0);
    }

    #[tokio::test]
    async fn test_setup_bucket_only_once() {
        let store = scenario();
        let mut session = bound_session(store.clone()).await;
        let err = session
            .setup_bucket(&MemoryConnector::new(store))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::General(_)));
    }

    #[tokio::test]
    async fn test_chdir_root_needs_no_query() {
        let store = scenario();
        let mut cfg = config();
        cfg.working_dir = "/a".into();
        let mut session = Session::new(cfg, Vec::new()).unwrap();
        session
            .setup_bucket(&MemoryConnector::new(store.clone()))
            .await
            .unwrap();

        session.chdir("/").await.unwrap();
        assert!(session.pwd().is_root());
        assert_eq!(store.requests(), 0);
        assert!(output(&session).is_empty());
    }

    #[tokio::test]
    async fn test_chdir_root_without_bucket() {
        let mut session = Session::new(config(), Vec::new()).unwrap();
        session.chdir("/").await.unwrap();
        assert!(session.pwd().is_root());

        let err = session.chdir("/a").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_chdir_existing_prefix() {
        let mut session = bound_session(scenario()).await;
        assert!(session.chdir("/a/c").await.unwrap());
        assert_eq!(session.pwd().to_string(), "/a/c");
        assert!(output(&session).is_empty());

        session.chdir("..").await.unwrap();
        assert_eq!(session.pwd().to_string(), "/a");
    }

    #[tokio::test]
    async fn test_chdir_missing_prefix_is_reported() {
        let mut session = bound_session(scenario()).await;
        session.chdir("/a").await.unwrap();

        assert!(!session.chdir("/z").await.unwrap());
        assert_eq!(session.pwd().to_string(), "/a");
        assert_eq!(output(&session), "cd: /z: No such directory\n");
    }

    #[tokio::test]
    async fn test_chdir_into_file_is_not_found() {
        let mut session = bound_session(scenario()).await;
        session.chdir("/a/b.txt").await.unwrap();
        assert!(session.pwd().is_root());
        assert_eq!(output(&session), "cd: /a/b.txt: No such directory\n");
    }

    #[tokio::test]
    async fn test_chdir_propagates_transport_errors() {
        let mut store = MockObjectStore::new();
        store
            .expect_list_objects()
            .returning(|_, _| Err(Error::Auth("InvalidAccessKeyId".into())));
        let mut session = bound_session(Arc::new(store)).await;

        let err = session.chdir("/a").await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(session.pwd().is_root());
        assert!(output(&session).is_empty());
    }

    #[tokio::test]
    async fn test_lsdir_lists_children() {
        let mut session = bound_session(scenario()).await;
        session.lsdir("/a").await.unwrap();
        assert_eq!(output(&session), "c/\nb.txt\n");
        assert!(session.pwd().is_root());
    }

    #[tokio::test]
    async fn test_lsdir_root() {
        let mut session = bound_session(scenario()).await;
        session.lsdir("/").await.unwrap();
        assert_eq!(output(&session), "a/\n");
    }

    #[tokio::test]
    async fn test_lsdir_after_chdir_matches_direct_listing() {
        let mut direct = bound_session(scenario()).await;
        direct.lsdir("/a").await.unwrap();

        let mut relative = bound_session(scenario()).await;
        relative.chdir("/a").await.unwrap();
        relative.lsdir(".").await.unwrap();

        assert_eq!(output(&direct), output(&relative));
    }

    #[tokio::test]
    async fn test_lsdir_walks_every_page() {
        let store = Arc::new(
            MemoryStore::new()
                .with_object("bukkit", "logs/2024/a.log", 1)
                .with_object("bukkit", "logs/2025/b.log", 1)
                .with_object("bukkit", "logs/x.txt", 1)
                .with_object("bukkit", "logs/y.txt", 1)
                .with_object("bukkit", "logs/z.txt", 1)
                .with_page_size(2),
        );
        let mut session = bound_session(store.clone()).await;
        session.lsdir("/logs").await.unwrap();

        assert_eq!(output(&session), "2024/\n2025/\nx.txt\ny.txt\nz.txt\n");
        assert_eq!(store.requests(), 3);
    }

    #[tokio::test]
    async fn test_lsdir_skips_self_key() {
        let store = Arc::new(
            MemoryStore::new()
                .with_object("bukkit", "a/", 0)
                .with_object("bukkit", "a/b.txt", 5),
        );
        let mut session = bound_session(store).await;
        session.lsdir("/a").await.unwrap();
        assert_eq!(output(&session), "b.txt\n");
    }

    #[tokio::test]
    async fn test_lsdir_keeps_empty_and_dot_segments() {
        let store = Arc::new(
            MemoryStore::new()
                .with_object("bukkit", "a//x.txt", 1)
                .with_object("bukkit", "a/../y.txt", 1)
                .with_object("bukkit", "a/b.txt", 5),
        );
        let mut session = bound_session(store).await;
        session.lsdir("/a").await.unwrap();
        assert_eq!(output(&session), "../\n/\nb.txt\n");
    }

    #[tokio::test]
    async fn test_lsdir_recursive_shows_marker_objects() {
        let store = Arc::new(
            MemoryStore::new()
                .with_object("bukkit", "a/b.txt", 5)
                .with_object("bukkit", "a/c/", 0)
                .with_object("bukkit", "a/c/d.txt", 7),
        );
        let mut session = bound_session(store).await;
        let options = LsOptions {
            mode: ListMode::Recursive,
            long: false,
        };
        session.lsdir_with("/a", options).await.unwrap();
        assert_eq!(output(&session), "b.txt\nc/\nc/d.txt\n");
    }

    #[test]
    fn test_marker_entry_is_a_file() {
        let marker = DirectoryEntry::from_item(&Prefix::parse("/a"), &ObjectInfo::file("a/c/", 0))
            .unwrap();
        assert_eq!(marker.kind, EntryKind::File);
        assert_eq!(marker.name, "c/");
        assert_eq!(marker.to_string(), "c/");
    }

    #[tokio::test]
    async fn test_lsdir_empty_marker_is_not_missing() {
        let store = Arc::new(MemoryStore::new().with_object("bukkit", "empty/", 0));
        let mut session = bound_session(store).await;

        session.chdir("/empty").await.unwrap();
        assert_eq!(session.pwd().to_string(), "/empty");

        session.lsdir("").await.unwrap();
        assert!(output(&session).is_empty());
    }

    #[tokio::test]
    async fn test_lsdir_missing_path_is_reported() {
        let mut session = bound_session(scenario()).await;
        session.lsdir("/z").await.unwrap();
        assert_eq!(output(&session), "ls: /z: No such directory\n");
    }

    #[tokio::test]
    async fn test_lsdir_recursive() {
        let mut session = bound_session(scenario()).await;
        let options = LsOptions {
            mode: ListMode::Recursive,
            long: false,
        };
        session.lsdir_with("/a", options).await.unwrap();
        assert_eq!(output(&session), "b.txt\nc/d.txt\n");
    }

    #[tokio::test]
    async fn test_lsdir_long_format() {
        let mut session = bound_session(scenario()).await;
        let options = LsOptions {
            long: true,
            ..Default::default()
        };
        session.lsdir_with("/a", options).await.unwrap();

        let text = output(&session);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" 0B c/"));
        assert!(lines[1].ends_with(" 5 B b.txt"));
    }

    #[tokio::test]
    async fn test_lsdir_preserves_provider_order() {
        let mut store = MockObjectStore::new();
        store.expect_list_objects().times(1).returning(|_, _| {
            Ok(ListResult {
                items: vec![
                    ObjectInfo::dir("zeta/"),
                    ObjectInfo::dir("alpha/"),
                    ObjectInfo::file("m.txt", 1),
                    ObjectInfo::file("b.txt", 1),
                ],
                truncated: false,
                continuation_token: None,
            })
        });
        let mut session = bound_session(Arc::new(store)).await;
        session.lsdir("/").await.unwrap();
        assert_eq!(output(&session), "zeta/\nalpha/\nm.txt\nb.txt\n");
    }

    #[tokio::test]
    async fn test_lsdir_error_mid_listing() {
        let mut store = MockObjectStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(ListResult {
                    items: vec![ObjectInfo::file("a/1.txt", 1)],
                    truncated: true,
                    continuation_token: Some("a/1.txt".into()),
                })
            });
        store
            .expect_list_objects()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(Error::Network("connection reset".into())));

        let mut session = bound_session(Arc::new(store)).await;
        let err = session.lsdir("/a").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(output(&session), "1.txt\n");
    }

    #[test]
    fn test_entry_display() {
        let dir = DirectoryEntry::from_item(&Prefix::parse("/a"), &ObjectInfo::dir("a/c/"))
            .unwrap();
        assert_eq!(dir.kind, EntryKind::Directory);
        assert_eq!(dir.to_string(), "c/");

        let file = DirectoryEntry::from_item(&Prefix::parse("/a"), &ObjectInfo::file("a/b.txt", 1))
            .unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.to_string(), "b.txt");
        assert!(!file.is_dir());
    }
}
