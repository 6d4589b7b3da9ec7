//! Host endpoint for diagnostic markers.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};
use tracing::trace;

use crate::collaborators::MarkerStore;
use crate::types::DiagnosticsEntry;

/// Applies marker updates to the host [`MarkerStore`].
pub struct HostDiagnostics {
    markers: Arc<dyn MarkerStore>,
}

impl HostDiagnostics {
    /// Create the endpoint over the marker collaborator.
    #[must_use]
    pub fn new(markers: Arc<dyn MarkerStore>) -> Self {
        Self { markers }
    }
}

#[async_trait]
impl ServiceHandler for HostDiagnostics {
    fn id(&self) -> ServiceId {
        ServiceId::HostDiagnostics
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "changeMany" => {
                let owner: String = decode_arg(id, method, &args, 0)?;
                let entries: Vec<DiagnosticsEntry> = decode_arg(id, method, &args, 1)?;
                trace!(owner = %owner, entries = entries.len(), "marker update");
                for entry in entries {
                    self.markers.change(&owner, &entry.uri, entry.markers);
                }
                Ok(Value::Null)
            }
            "clear" => {
                let owner: String = decode_arg(id, method, &args, 0)?;
                self.markers.clear(&owner);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
