//! Host-facing façades over the bridge.
//!
//! The surrounding framework expects a handful of plain service shapes. These
//! adapters satisfy them by delegating into the bridge or its collaborators
//! instead of owning any state.

use serde_json::Value;
use std::sync::Arc;
use tether_core::ResourceUri;
use tether_rpc::ServiceProxy;
use tether_vfs::{ContentProvider, Registration, ResourceBacking};

use crate::error::ServiceResult;
use crate::ext::ExtCommands;

/// Command execution shaped for host-side callers.
///
/// Executions route through the extension-side registry, so host-owned and
/// contributed commands resolve identically.
pub struct BridgeCommands {
    commands: Arc<ExtCommands>,
}

impl BridgeCommands {
    /// Create the façade over the extension-side registry.
    #[must_use]
    pub fn new(commands: Arc<ExtCommands>) -> Self {
        Self { commands }
    }

    /// Execute a command by id.
    ///
    /// # Errors
    ///
    /// Propagates the execution failure as reported across the bridge.
    pub async fn execute_command(&self, id: &str, args: Vec<Value>) -> ServiceResult<Value> {
        self.commands.execute_command(id, args).await
    }
}

/// Pushes document lifecycle events from the host into the extension mirror.
pub struct DocumentsNotifier {
    ext_documents: ServiceProxy,
}

impl DocumentsNotifier {
    /// Create the notifier.
    ///
    /// `ext_documents` must target [`tether_rpc::ServiceId::ExtDocuments`].
    #[must_use]
    pub fn new(ext_documents: ServiceProxy) -> Self {
        Self { ext_documents }
    }

    /// Announce an opened document and its text.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn notify_opened(&self, uri: &ResourceUri, text: &str) -> ServiceResult<()> {
        self.ext_documents
            .invoke(
                "acceptModelAdded",
                vec![
                    serde_json::to_value(uri).map_err(tether_rpc::RpcError::from)?,
                    Value::String(text.to_string()),
                ],
            )
            .await?;
        Ok(())
    }

    /// Announce a closed document.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn notify_closed(&self, uri: &ResourceUri) -> ServiceResult<()> {
        self.ext_documents
            .invoke(
                "acceptModelRemoved",
                vec![serde_json::to_value(uri).map_err(tether_rpc::RpcError::from)?],
            )
            .await?;
        Ok(())
    }
}

/// Reads extension resources through the virtual backing.
pub struct ExtensionResourceLoader {
    backing: Arc<ResourceBacking>,
}

impl ExtensionResourceLoader {
    /// Create the loader over a backing.
    #[must_use]
    pub fn new(backing: Arc<ResourceBacking>) -> Self {
        Self { backing }
    }

    /// The underlying backing.
    #[must_use]
    pub fn backing(&self) -> &Arc<ResourceBacking> {
        &self.backing
    }

    /// Back a resource with lazily computed content.
    #[must_use]
    pub fn register_resource(
        &self,
        uri: &ResourceUri,
        provider: Arc<dyn ContentProvider>,
    ) -> Registration {
        self.backing.register(uri, provider)
    }

    /// Read the content of an extension resource.
    ///
    /// # Errors
    ///
    /// Propagates [`tether_vfs::FsError::FileNotFound`] for unregistered uris
    /// or the provider's failure.
    pub async fn read_extension_resource(&self, uri: &ResourceUri) -> ServiceResult<String> {
        Ok(self.backing.read(uri).await?)
    }
}
