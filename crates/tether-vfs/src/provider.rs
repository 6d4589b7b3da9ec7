//! Lazily computed resource content.

use async_trait::async_trait;

use crate::error::FsResult;

/// Produces the content of a registered resource on demand.
///
/// Content is computed per read; the backing never caches it.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Produce the current content.
    async fn load(&self) -> FsResult<String>;
}

/// A provider returning a fixed string.
#[derive(Debug, Clone)]
pub struct StaticContent(String);

impl StaticContent {
    /// Wrap a fixed string as a provider.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }
}

#[async_trait]
impl ContentProvider for StaticContent {
    async fn load(&self) -> FsResult<String> {
        Ok(self.0.clone())
    }
}
