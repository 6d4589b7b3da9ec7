//! Extension-side diagnostics publisher.

use async_trait::async_trait;
use serde_json::Value;
use tether_core::ResourceUri;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy};

use crate::error::ServiceResult;
use crate::types::{Diagnostic, DiagnosticsEntry};

/// Publishes diagnostic markers to the host marker store.
///
/// Purely outbound; it binds its id so that misdirected calls reject with
/// an unknown method rather than an unbound endpoint.
pub struct ExtDiagnostics {
    host_diagnostics: ServiceProxy,
}

impl ExtDiagnostics {
    /// Create the publisher.
    ///
    /// `host_diagnostics` must target [`ServiceId::HostDiagnostics`].
    #[must_use]
    pub fn new(host_diagnostics: ServiceProxy) -> Self {
        Self { host_diagnostics }
    }

    /// Replace the markers `owner` attaches to `uri`; empty removes them.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn set(
        &self,
        owner: &str,
        uri: &ResourceUri,
        markers: Vec<Diagnostic>,
    ) -> ServiceResult<()> {
        let entry = DiagnosticsEntry {
            uri: uri.clone(),
            markers,
        };
        self.host_diagnostics
            .invoke(
                "changeMany",
                vec![
                    Value::String(owner.to_string()),
                    serde_json::to_value(vec![entry]).map_err(RpcError::from)?,
                ],
            )
            .await?;
        Ok(())
    }

    /// Remove every marker attributed to `owner`.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn clear(&self, owner: &str) -> ServiceResult<()> {
        self.host_diagnostics
            .invoke("clear", vec![Value::String(owner.to_string())])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceHandler for ExtDiagnostics {
    fn id(&self) -> ServiceId {
        ServiceId::ExtDiagnostics
    }

    async fn dispatch(&self, method: &str, _args: Vec<Value>) -> RpcResult<Value> {
        Err(RpcError::unknown_method(self.id(), method))
    }
}
