//! Extension identity.
//!
//! The descriptor is the immutable record the surrounding host supplies once
//! at composition time. The bridge never mutates it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::uri::ResourceUri;

/// Unique identifier of an extension (`publisher.name` by convention).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionId(String);

impl ExtensionId {
    /// Create an identifier from its string form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform an extension targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    /// Browser / in-process environment.
    Web,
    /// Platform-independent.
    Universal,
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => f.write_str("web"),
            Self::Universal => f.write_str("universal"),
        }
    }
}

/// Immutable identity record of the capability-providing unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDescriptor {
    /// Unique identifier.
    pub identifier: ExtensionId,
    /// Whether the extension ships with the host.
    pub is_builtin: bool,
    /// Root location of the extension's resources.
    pub location: ResourceUri,
    /// Extension name.
    pub name: String,
    /// Publisher name.
    pub publisher: String,
    /// Version string.
    pub version: String,
    /// Platform the extension targets.
    pub target_platform: TargetPlatform,
}

impl ExtensionDescriptor {
    /// The built-in descriptor used when the host supplies none.
    #[must_use]
    pub fn builtin_default() -> Self {
        Self {
            identifier: ExtensionId::new("tether.builtin"),
            is_builtin: true,
            location: ResourceUri::new("extension", "/"),
            name: "builtin".to_string(),
            publisher: "tether".to_string(),
            version: "1.0.0".to_string(),
            target_platform: TargetPlatform::Web,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_shape() {
        let ext = ExtensionDescriptor::builtin_default();
        assert!(ext.is_builtin);
        assert_eq!(ext.identifier.as_str(), "tether.builtin");
        assert_eq!(ext.location.scheme(), "extension");
    }

    #[test]
    fn descriptor_serde_round_trip() {
        let ext = ExtensionDescriptor::builtin_default();
        let json = serde_json::to_string(&ext).unwrap();
        let back: ExtensionDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ext);
    }
}
