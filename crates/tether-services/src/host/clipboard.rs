//! Host endpoint for clipboard access.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};

use crate::collaborators::ClipboardService;

/// Bridges clipboard reads and writes to the host [`ClipboardService`].
pub struct HostClipboard {
    clipboard: Arc<dyn ClipboardService>,
}

impl HostClipboard {
    /// Create the endpoint over the clipboard collaborator.
    #[must_use]
    pub fn new(clipboard: Arc<dyn ClipboardService>) -> Self {
        Self { clipboard }
    }
}

#[async_trait]
impl ServiceHandler for HostClipboard {
    fn id(&self) -> ServiceId {
        ServiceId::HostClipboard
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "readText" => {
                let text = self
                    .clipboard
                    .read_text()
                    .await
                    .map_err(|e| e.into_rpc(id, method))?;
                Ok(Value::String(text))
            }
            "writeText" => {
                let text: String = decode_arg(id, method, &args, 0)?;
                self.clipboard
                    .write_text(text)
                    .await
                    .map_err(|e| e.into_rpc(id, method))?;
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
