//! Host endpoint for virtual document content providers.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tether_core::ResourceUri;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};

/// Resolves virtual document contents by uri scheme.
///
/// The extension side registers a provider handle per scheme; resolving a uri
/// routes through the proxy to that provider.
pub struct HostDocumentContents {
    schemes: DashMap<String, u64>,
    ext_contents: ServiceProxy,
}

impl HostDocumentContents {
    /// Create the endpoint.
    ///
    /// `ext_contents` must target [`ServiceId::ExtDocumentContents`].
    #[must_use]
    pub fn new(ext_contents: ServiceProxy) -> Self {
        Self {
            schemes: DashMap::new(),
            ext_contents,
        }
    }

    /// Resolve the contents of a virtual document.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NoContentProvider`] when no provider covers
    /// the uri's scheme, or propagates the provider's rejection.
    pub async fn resolve_content(&self, uri: &ResourceUri) -> ServiceResult<String> {
        let handle = self
            .schemes
            .get(uri.scheme())
            .map(|entry| *entry.value())
            .ok_or_else(|| ServiceError::NoContentProvider {
                scheme: uri.scheme().to_string(),
            })?;
        let value = self
            .ext_contents
            .invoke(
                "provideTextDocumentContent",
                vec![Value::from(handle), serde_json::to_value(uri).map_err(RpcError::from)?],
            )
            .await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))
    }
}

#[async_trait]
impl ServiceHandler for HostDocumentContents {
    fn id(&self) -> ServiceId {
        ServiceId::HostDocumentContents
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "registerTextContentProvider" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                let scheme: String = decode_arg(id, method, &args, 1)?;
                debug!(handle, scheme = %scheme, "content provider registered");
                self.schemes.insert(scheme, handle);
                Ok(Value::Null)
            }
            "unregisterTextContentProvider" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                self.schemes.retain(|_, registered| *registered != handle);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
