//! Extension-side virtual document content providers.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tether_vfs::ContentProvider;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Serves virtual document text for schemes this side registered.
///
/// Provider bodies are the same lazy [`ContentProvider`]s the resource
/// backing uses.
pub struct ExtDocumentContents {
    providers: DashMap<u64, Arc<dyn ContentProvider>>,
    host_contents: ServiceProxy,
    next_handle: AtomicU64,
}

impl ExtDocumentContents {
    /// Create the registry.
    ///
    /// `host_contents` must target [`ServiceId::HostDocumentContents`].
    #[must_use]
    pub fn new(host_contents: ServiceProxy) -> Self {
        Self {
            providers: DashMap::new(),
            host_contents,
            next_handle: AtomicU64::new(1),
        }
    }

    /// Register a provider for a uri scheme; returns its handle.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection from mirroring the registration.
    pub async fn register_content_provider(
        &self,
        scheme: &str,
        provider: Arc<dyn ContentProvider>,
    ) -> ServiceResult<u64> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.providers.insert(handle, provider);
        debug!(handle, scheme, "content provider registered");
        self.host_contents
            .invoke(
                "registerTextContentProvider",
                vec![Value::from(handle), Value::String(scheme.to_string())],
            )
            .await?;
        Ok(handle)
    }

    /// Withdraw a provider by handle.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection from withdrawing the host mirror.
    pub async fn unregister_content_provider(&self, handle: u64) -> ServiceResult<()> {
        self.providers.remove(&handle);
        self.host_contents
            .invoke("unregisterTextContentProvider", vec![Value::from(handle)])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceHandler for ExtDocumentContents {
    fn id(&self) -> ServiceId {
        ServiceId::ExtDocumentContents
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "provideTextDocumentContent" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                let provider = self
                    .providers
                    .get(&handle)
                    .map(|entry| Arc::clone(entry.value()))
                    .ok_or_else(|| ServiceError::UnknownHandle { handle }.into_rpc(id, method))?;
                let text = provider
                    .load()
                    .await
                    .map_err(|e| ServiceError::Fs(e).into_rpc(id, method))?;
                Ok(Value::String(text))
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
