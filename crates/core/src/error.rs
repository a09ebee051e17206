//! Error types for sn-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.
//! A path that does not exist is not an error: navigation reports it on the
//! output sink instead.

use thiserror::Error;

/// Result type alias for sn-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sn-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration, detected before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile not found in the configuration file
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Bucket is not visible to the account
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    /// IO error, including writes to the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Authentication rejected by the storage service
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport or storage query failure
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::ProfileNotFound(_) => 2, // UsageError
            Error::Network(_) => 3,                            // NetworkError
            Error::Auth(_) => 4,                               // AuthError
            Error::BucketNotFound(_) => 5,                     // BucketNotFound
            _ => 1,                                            // GeneralError
        }
    }
}
