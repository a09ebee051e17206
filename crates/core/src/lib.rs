//! sn-core: Core library for the s3nav bucket navigator
//!
//! This crate provides the core functionality for s3nav, including:
//! - Prefix normalization over a flat key namespace
//! - Connection setup, bucket validation and binding
//! - The `cd` and `ls` operations of a navigation session
//! - Configuration and profile management
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing sessions to be driven by mocks and in-memory stores.

pub mod config;
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod prefix;
pub mod profile;
pub mod session;
pub mod traits;

pub use config::{Config, ConfigManager};
pub use connection::{BoundBucket, Connection, Credentials, Region, valid_bucket};
pub use error::{Error, Result};
pub use prefix::{DELIMITER, Prefix};
pub use profile::{Profile, ProfileManager};
pub use session::{DirectoryEntry, EntryKind, ListMode, LsOptions, Session, SessionConfig};
pub use traits::{Connector, ListOptions, ListResult, ObjectInfo, ObjectStore};
