//! Path normalization over a flat key namespace
//!
//! Object keys have no directories. A filesystem-style path such as `/a/c`
//! is mapped onto the key prefix `a/c/`, and a "directory" exists when a
//! delimited listing of that prefix returns anything at all.

/// Hierarchy delimiter used for every listing
pub const DELIMITER: char = '/';

/// A normalized, absolute path within a bucket
///
/// The path always starts with `/` and never ends with one, except for the
/// root itself. `.` segments and repeated separators are dropped and `..`
/// pops one level, stopping at the root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prefix {
    segments: Vec<String>,
}

impl Prefix {
    /// The bucket root
    pub fn root() -> Self {
        Self::default()
    }

    /// Resolve `target` against `base`
    ///
    /// Absolute targets ignore `base`. An empty target resolves to `base`.
    pub fn resolve(base: &Prefix, target: &str) -> Self {
        let mut segments = if target.starts_with(DELIMITER) {
            Vec::new()
        } else {
            base.segments.clone()
        };

        for segment in target.split(DELIMITER) {
            match segment {
                "" | "." => continue,
                ".." => {
                    segments.pop();
                }
                other => segments.push(other.to_string()),
            }
        }

        Self { segments }
    }

    /// Parse a path on its own, relative paths being taken from the root
    pub fn parse(path: &str) -> Self {
        Self::resolve(&Self::root(), path)
    }

    /// Whether this is the bucket root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Storage prefix for this path: no leading separator, trailing separator,
    /// empty for the root
    pub fn key(&self) -> String {
        let mut key = String::new();
        for segment in &self.segments {
            key.push_str(segment);
            key.push(DELIMITER);
        }
        key
    }

    /// Path segments from the root
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Name of a listed key or common prefix relative to this path
    ///
    /// Returns `None` when `key` is not beneath this path or is exactly the
    /// path's own key. The remainder is returned verbatim: keys are opaque, so
    /// empty, `.` and `..` segments inside them are names like any other.
    pub fn child_name<'a>(&self, key: &'a str) -> Option<&'a str> {
        let rest = key.strip_prefix(self.key().as_str())?;
        (!rest.is_empty()).then_some(rest)
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.segments.is_empty() {
            write!(f, "/")
        } else {
            write!(f, "/{}", self.segments.join("/"))
        }
    }
}
