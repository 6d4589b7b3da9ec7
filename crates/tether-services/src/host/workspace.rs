//! Host endpoint for workspace description queries.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId};

use crate::collaborators::WorkspaceContext;

/// Serves the workspace folder layout to the extension side.
pub struct HostWorkspace {
    workspace: Arc<dyn WorkspaceContext>,
}

impl HostWorkspace {
    /// Create the endpoint over the workspace collaborator.
    #[must_use]
    pub fn new(workspace: Arc<dyn WorkspaceContext>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl ServiceHandler for HostWorkspace {
    fn id(&self) -> ServiceId {
        ServiceId::HostWorkspace
    }

    async fn dispatch(&self, method: &str, _args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "getWorkspaceFolders" => Ok(serde_json::to_value(self.workspace.workspace_folders())?),
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
