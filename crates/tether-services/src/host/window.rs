//! Host endpoint for window interactions.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};

use crate::collaborators::WindowOpener;

/// Opens external resources on behalf of the extension side.
pub struct HostWindow {
    opener: Arc<dyn WindowOpener>,
}

impl HostWindow {
    /// Create the endpoint over the window collaborator.
    #[must_use]
    pub fn new(opener: Arc<dyn WindowOpener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl ServiceHandler for HostWindow {
    fn id(&self) -> ServiceId {
        ServiceId::HostWindow
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "openExternal" => {
                let url: String = decode_arg(id, method, &args, 0)?;
                let opened = self
                    .opener
                    .open_external(&url)
                    .await
                    .map_err(|e| e.into_rpc(id, method))?;
                Ok(Value::Bool(opened))
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
