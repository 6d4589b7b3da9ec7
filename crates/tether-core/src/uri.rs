//! Logical resource identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when parsing a [`ResourceUri`] from a string.
#[derive(Debug, Error)]
pub enum UriError {
    /// The string had no `scheme://` separator.
    #[error("missing scheme separator in uri: {0}")]
    MissingScheme(String),

    /// The scheme component was empty.
    #[error("empty scheme in uri: {0}")]
    EmptyScheme(String),
}

/// A logical resource identifier of the form `scheme://path`.
///
/// This is an identity, not a filesystem path: the bridge keys resource
/// backing entries and extension locations by the rendered string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceUri {
    scheme: String,
    path: String,
}

impl ResourceUri {
    /// Create a uri from a scheme and a path.
    #[must_use]
    pub fn new(scheme: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            path: path.into(),
        }
    }

    /// Create a `file://` uri.
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self::new("file", path)
    }

    /// The scheme component.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The path component.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}

impl FromStr for ResourceUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, path) = s
            .split_once("://")
            .ok_or_else(|| UriError::MissingScheme(s.to_string()))?;
        if scheme.is_empty() {
            return Err(UriError::EmptyScheme(s.to_string()));
        }
        Ok(Self::new(scheme, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trip() {
        let uri = ResourceUri::new("extension", "/out/main.js");
        assert_eq!(uri.to_string(), "extension:///out/main.js");

        let parsed: ResourceUri = uri.to_string().parse().unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn file_helper() {
        let uri = ResourceUri::file("/tmp/project");
        assert_eq!(uri.scheme(), "file");
        assert_eq!(uri.path(), "/tmp/project");
    }

    #[test]
    fn parse_rejects_missing_scheme() {
        assert!(matches!(
            "/no/scheme".parse::<ResourceUri>(),
            Err(UriError::MissingScheme(_))
        ));
        assert!(matches!(
            "://path".parse::<ResourceUri>(),
            Err(UriError::EmptyScheme(_))
        ));
    }
}
