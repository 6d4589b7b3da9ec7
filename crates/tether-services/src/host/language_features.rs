//! Host endpoint for language feature provider registrations.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tether_core::ResourceUri;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tracing::debug;

use crate::types::{DocumentSelector, FeatureKind};

/// Tracks feature providers registered by the extension side.
///
/// Provider bodies stay on the extension side; the host keeps only the
/// handle, kind and selector, and resolves results through the proxy.
pub struct HostLanguageFeatures {
    features: DashMap<u64, (FeatureKind, DocumentSelector)>,
    ext_features: ServiceProxy,
}

impl HostLanguageFeatures {
    /// Create the endpoint.
    ///
    /// `ext_features` must target [`ServiceId::ExtLanguageFeatures`].
    #[must_use]
    pub fn new(ext_features: ServiceProxy) -> Self {
        Self {
            features: DashMap::new(),
            ext_features,
        }
    }

    /// Kind and selector of a registered feature.
    #[must_use]
    pub fn registered(&self, handle: u64) -> Option<(FeatureKind, DocumentSelector)> {
        self.features.get(&handle).map(|entry| entry.value().clone())
    }

    /// Handles of all features of the given kind.
    #[must_use]
    pub fn handles_of(&self, kind: FeatureKind) -> Vec<u64> {
        let mut handles: Vec<u64> = self
            .features
            .iter()
            .filter(|entry| entry.value().0 == kind)
            .map(|entry| *entry.key())
            .collect();
        handles.sort_unstable();
        handles
    }

    /// Resolve a feature result from the extension-side provider.
    ///
    /// # Errors
    ///
    /// Propagates the provider's rejection, including
    /// [`RpcError::HandlerFailure`] when the handle is stale.
    pub async fn provide(&self, handle: u64, uri: &ResourceUri) -> RpcResult<Value> {
        self.ext_features
            .invoke(
                "provideFeature",
                vec![Value::from(handle), serde_json::to_value(uri)?],
            )
            .await
    }
}

#[async_trait]
impl ServiceHandler for HostLanguageFeatures {
    fn id(&self) -> ServiceId {
        ServiceId::HostLanguageFeatures
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "registerFeature" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                let kind: FeatureKind = decode_arg(id, method, &args, 1)?;
                let selector: DocumentSelector = decode_arg(id, method, &args, 2)?;
                debug!(handle, ?kind, "feature registered");
                self.features.insert(handle, (kind, selector));
                Ok(Value::Null)
            }
            "unregisterFeature" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                self.features.remove(&handle);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
