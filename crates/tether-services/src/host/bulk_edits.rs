//! Host endpoint for multi-resource edits.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};

use crate::collaborators::BulkEditService;
use crate::types::WorkspaceEdit;

/// Applies workspace edits through the host [`BulkEditService`].
pub struct HostBulkEdits {
    bulk_edits: Arc<dyn BulkEditService>,
}

impl HostBulkEdits {
    /// Create the endpoint over the bulk-edit collaborator.
    #[must_use]
    pub fn new(bulk_edits: Arc<dyn BulkEditService>) -> Self {
        Self { bulk_edits }
    }
}

#[async_trait]
impl ServiceHandler for HostBulkEdits {
    fn id(&self) -> ServiceId {
        ServiceId::HostBulkEdits
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "tryApplyWorkspaceEdit" => {
                let edit: WorkspaceEdit = decode_arg(id, method, &args, 0)?;
                let applied = self
                    .bulk_edits
                    .apply(edit)
                    .await
                    .map_err(|e| e.into_rpc(id, method))?;
                Ok(Value::Bool(applied))
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
