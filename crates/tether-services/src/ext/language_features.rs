//! Extension-side language feature providers.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tether_core::ResourceUri;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::types::{DocumentSelector, FeatureKind};

/// Produces a feature result for a document.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    /// Compute the feature payload for `uri`.
    async fn provide(&self, uri: &ResourceUri) -> ServiceResult<Value>;
}

/// Owns feature provider bodies and mirrors their handles to the host.
pub struct ExtLanguageFeatures {
    providers: DashMap<u64, Arc<dyn FeatureProvider>>,
    host_features: ServiceProxy,
    next_handle: AtomicU64,
}

impl ExtLanguageFeatures {
    /// Create the registry.
    ///
    /// `host_features` must target [`ServiceId::HostLanguageFeatures`].
    #[must_use]
    pub fn new(host_features: ServiceProxy) -> Self {
        Self {
            providers: DashMap::new(),
            host_features,
            next_handle: AtomicU64::new(1),
        }
    }

    /// Register a provider; returns its handle.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection from mirroring the registration.
    pub async fn register_provider(
        &self,
        kind: FeatureKind,
        selector: DocumentSelector,
        provider: Arc<dyn FeatureProvider>,
    ) -> ServiceResult<u64> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.providers.insert(handle, provider);
        debug!(handle, ?kind, "feature provider registered");
        self.host_features
            .invoke(
                "registerFeature",
                vec![
                    Value::from(handle),
                    serde_json::to_value(kind).map_err(RpcError::from)?,
                    serde_json::to_value(selector).map_err(RpcError::from)?,
                ],
            )
            .await?;
        Ok(handle)
    }

    /// Withdraw a provider by handle.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection from withdrawing the host mirror.
    pub async fn unregister_provider(&self, handle: u64) -> ServiceResult<()> {
        self.providers.remove(&handle);
        self.host_features
            .invoke("unregisterFeature", vec![Value::from(handle)])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceHandler for ExtLanguageFeatures {
    fn id(&self) -> ServiceId {
        ServiceId::ExtLanguageFeatures
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "provideFeature" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                let uri: ResourceUri = decode_arg(id, method, &args, 1)?;
                let provider = self
                    .providers
                    .get(&handle)
                    .map(|entry| Arc::clone(entry.value()))
                    .ok_or_else(|| ServiceError::UnknownHandle { handle }.into_rpc(id, method))?;
                provider
                    .provide(&uri)
                    .await
                    .map_err(|e| e.into_rpc(id, method))
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
