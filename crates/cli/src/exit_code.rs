//! Process exit status for s3nav
//!
//! Scripts branch on these values, so existing codes must not change meaning.

use sn_core::Error;

/// Exit status of one s3nav invocation.
///
/// A `cd` to a missing directory is reported on stdout and still exits with
/// `Success`; only configuration and storage failures produce other codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// Failure with no more specific status
    GeneralError = 1,

    /// Missing credentials, bucket or profile
    UsageError = 2,

    /// The storage service could not be queried
    NetworkError = 3,

    /// Credentials were rejected
    AuthError = 4,

    /// Bucket is not in the account's bucket list
    BucketNotFound = 5,
}

impl ExitCode {
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::BucketNotFound),
            _ => None,
        }
    }

    /// Status for a failed command, as chosen by [`Error::exit_code`]
    pub fn from_error(err: &Error) -> Self {
        Self::from_i32(err.exit_code()).unwrap_or(Self::GeneralError)
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::GeneralError => "error",
            Self::UsageError => "bad configuration",
            Self::NetworkError => "storage unreachable",
            Self::AuthError => "access denied",
            Self::BucketNotFound => "no such bucket",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.as_i32(), self.summary())
    }
}
