//! The uri-to-content registry.

use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use tether_core::ResourceUri;

use crate::error::{FsError, FsResult};
use crate::provider::ContentProvider;

/// Kind of a backed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A regular file.
    File,
}

/// Metadata for a backed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStat {
    /// Creation time, milliseconds since the epoch.
    pub ctime_ms: u64,
    /// Modification time, milliseconds since the epoch.
    pub mtime_ms: u64,
    /// Reported size. Content is computed lazily, so this is always zero.
    pub size: u64,
    /// Resource kind.
    pub kind: ResourceKind,
}

struct Entry {
    provider: Arc<dyn ContentProvider>,
    ctime_ms: u64,
    mtime_ms: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Maps logical resource identifiers to lazily computed string content.
///
/// Entries are added and removed through [`Registration`] handles
/// independently of the bridge's lifecycle. Only `stat` and `read` are
/// implemented; every mutating operation signals
/// [`FsError::Unsupported`].
pub struct ResourceBacking {
    entries: Arc<DashMap<String, Entry>>,
}

impl ResourceBacking {
    /// Create an empty backing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Register content for a resource.
    ///
    /// Registering a uri that is already backed replaces the previous entry.
    /// The returned handle removes the entry on [`Registration::dispose`];
    /// dropping the handle without disposing leaves the entry registered.
    #[must_use]
    pub fn register(
        &self,
        uri: &ResourceUri,
        provider: Arc<dyn ContentProvider>,
    ) -> Registration {
        let key = uri.to_string();
        let now = now_ms();
        debug!(uri = %key, "resource registered");
        self.entries.insert(
            key.clone(),
            Entry {
                provider,
                ctime_ms: now,
                mtime_ms: now,
            },
        );
        Registration {
            entries: Arc::downgrade(&self.entries),
            key,
        }
    }

    /// Metadata for a registered resource.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::FileNotFound`] if the uri is not registered.
    pub fn stat(&self, uri: &ResourceUri) -> FsResult<ResourceStat> {
        let key = uri.to_string();
        let entry = self
            .entries
            .get(&key)
            .ok_or(FsError::FileNotFound(key))?;
        Ok(ResourceStat {
            ctime_ms: entry.ctime_ms,
            mtime_ms: entry.mtime_ms,
            size: 0,
            kind: ResourceKind::File,
        })
    }

    /// Compute and return the content of a registered resource.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::FileNotFound`] if the uri is not registered, or
    /// the provider's error if content computation fails.
    pub async fn read(&self, uri: &ResourceUri) -> FsResult<String> {
        let key = uri.to_string();
        let provider = {
            let entry = self
                .entries
                .get(&key)
                .ok_or(FsError::FileNotFound(key))?;
            Arc::clone(&entry.provider)
        };
        provider.load().await
    }

    /// Writing is not implemented.
    ///
    /// # Errors
    ///
    /// Always returns [`FsError::Unsupported`].
    pub fn write(&self, _uri: &ResourceUri, _content: &str) -> FsResult<()> {
        Err(FsError::Unsupported { operation: "write" })
    }

    /// Directory creation is not implemented.
    ///
    /// # Errors
    ///
    /// Always returns [`FsError::Unsupported`].
    pub fn mkdir(&self, _uri: &ResourceUri) -> FsResult<()> {
        Err(FsError::Unsupported { operation: "mkdir" })
    }

    /// Directory listing is not implemented.
    ///
    /// # Errors
    ///
    /// Always returns [`FsError::Unsupported`].
    pub fn readdir(&self, _uri: &ResourceUri) -> FsResult<Vec<String>> {
        Err(FsError::Unsupported {
            operation: "readdir",
        })
    }

    /// Deletion is not implemented.
    ///
    /// # Errors
    ///
    /// Always returns [`FsError::Unsupported`].
    pub fn delete(&self, _uri: &ResourceUri) -> FsResult<()> {
        Err(FsError::Unsupported {
            operation: "delete",
        })
    }

    /// Renaming is not implemented.
    ///
    /// # Errors
    ///
    /// Always returns [`FsError::Unsupported`].
    pub fn rename(&self, _from: &ResourceUri, _to: &ResourceUri) -> FsResult<()> {
        Err(FsError::Unsupported {
            operation: "rename",
        })
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResourceBacking {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResourceBacking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceBacking")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Handle for a backed resource; removes the entry on `dispose`.
#[derive(Debug)]
pub struct Registration {
    entries: Weak<DashMap<String, Entry>>,
    key: String,
}

impl Registration {
    /// Unregister the resource.
    ///
    /// Disposing after the backing itself was dropped is a no-op.
    pub fn dispose(self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.remove(&self.key);
            debug!(uri = %self.key, "resource unregistered");
        }
    }

    /// The uri string this handle controls.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("ctime_ms", &self.ctime_ms)
            .field("mtime_ms", &self.mtime_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticContent;
    use async_trait::async_trait;

    fn uri(path: &str) -> ResourceUri {
        ResourceUri::new("extension", path)
    }

    #[tokio::test]
    async fn read_returns_registered_content() {
        let backing = ResourceBacking::new();
        let _reg = backing.register(&uri("/a.txt"), Arc::new(StaticContent::new("hi")));

        assert_eq!(backing.read(&uri("/a.txt")).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn dispose_unregisters() {
        let backing = ResourceBacking::new();
        let reg = backing.register(&uri("/a.txt"), Arc::new(StaticContent::new("hi")));
        assert_eq!(backing.read(&uri("/a.txt")).await.unwrap(), "hi");

        reg.dispose();
        assert!(matches!(
            backing.read(&uri("/a.txt")).await,
            Err(FsError::FileNotFound(_))
        ));
        assert!(matches!(
            backing.stat(&uri("/a.txt")),
            Err(FsError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn stat_only_for_registered() {
        let backing = ResourceBacking::new();
        assert!(matches!(
            backing.stat(&uri("/missing")),
            Err(FsError::FileNotFound(_))
        ));

        let _reg = backing.register(&uri("/a.txt"), Arc::new(StaticContent::new("hi")));
        let stat = backing.stat(&uri("/a.txt")).unwrap();
        assert_eq!(stat.kind, ResourceKind::File);
        assert_eq!(stat.size, 0);
        assert!(stat.ctime_ms > 0);
    }

    #[tokio::test]
    async fn content_is_computed_per_read() {
        struct Counter(std::sync::atomic::AtomicU32);

        #[async_trait]
        impl ContentProvider for Counter {
            async fn load(&self) -> FsResult<String> {
                let n = self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(format!("read {n}"))
            }
        }

        let backing = ResourceBacking::new();
        let _reg = backing.register(
            &uri("/dynamic"),
            Arc::new(Counter(std::sync::atomic::AtomicU32::new(0))),
        );

        assert_eq!(backing.read(&uri("/dynamic")).await.unwrap(), "read 0");
        assert_eq!(backing.read(&uri("/dynamic")).await.unwrap(), "read 1");
    }

    #[test]
    fn mutation_signals_unsupported() {
        let backing = ResourceBacking::new();
        let target = uri("/a.txt");

        assert!(matches!(
            backing.write(&target, "x"),
            Err(FsError::Unsupported { operation: "write" })
        ));
        assert!(matches!(
            backing.mkdir(&target),
            Err(FsError::Unsupported { operation: "mkdir" })
        ));
        assert!(matches!(
            backing.readdir(&target),
            Err(FsError::Unsupported { operation: "readdir" })
        ));
        assert!(matches!(
            backing.delete(&target),
            Err(FsError::Unsupported { operation: "delete" })
        ));
        assert!(matches!(
            backing.rename(&target, &uri("/b.txt")),
            Err(FsError::Unsupported { operation: "rename" })
        ));
    }

    #[tokio::test]
    async fn reregistration_replaces_entry() {
        let backing = ResourceBacking::new();
        let _first = backing.register(&uri("/a.txt"), Arc::new(StaticContent::new("one")));
        let _second = backing.register(&uri("/a.txt"), Arc::new(StaticContent::new("two")));

        assert_eq!(backing.read(&uri("/a.txt")).await.unwrap(), "two");
        assert_eq!(backing.len(), 1);
    }
}
