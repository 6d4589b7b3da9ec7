//! Extension-side workspace mirror.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};

use crate::error::{ServiceError, ServiceResult};
use crate::types::WorkspaceFolder;

/// Mirrors the workspace folder layout announced by the host.
pub struct ExtWorkspace {
    folders: RwLock<Vec<WorkspaceFolder>>,
    host_workspace: ServiceProxy,
}

impl ExtWorkspace {
    /// Create an empty mirror.
    ///
    /// `host_workspace` must target [`ServiceId::HostWorkspace`].
    #[must_use]
    pub fn new(host_workspace: ServiceProxy) -> Self {
        Self {
            folders: RwLock::new(Vec::new()),
            host_workspace,
        }
    }

    /// The mirrored workspace folders.
    #[must_use]
    pub fn workspace_folders(&self) -> Vec<WorkspaceFolder> {
        match self.folders.read() {
            Ok(folders) => folders.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Install the folder layout directly, outside the bridge.
    pub fn accept(&self, folders: Vec<WorkspaceFolder>) {
        let mut current = match self.folders.write() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = folders;
    }

    /// Fetch the authoritative layout from the host and mirror it.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn refresh(&self) -> ServiceResult<Vec<WorkspaceFolder>> {
        let value = self
            .host_workspace
            .invoke("getWorkspaceFolders", Vec::new())
            .await?;
        let folders: Vec<WorkspaceFolder> =
            serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))?;
        self.accept(folders.clone());
        Ok(folders)
    }
}

#[async_trait]
impl ServiceHandler for ExtWorkspace {
    fn id(&self) -> ServiceId {
        ServiceId::ExtWorkspace
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "acceptWorkspaceData" => {
                let folders: Vec<WorkspaceFolder> = decode_arg(id, method, &args, 0)?;
                self.accept(folders);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
