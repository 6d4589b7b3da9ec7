//! Extension-side window state and openers.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};

use crate::error::{ServiceError, ServiceResult};

/// Mirrors window focus and forwards external-open requests.
pub struct ExtWindow {
    focused: AtomicBool,
    host_window: ServiceProxy,
}

impl ExtWindow {
    /// Create the service.
    ///
    /// `host_window` must target [`ServiceId::HostWindow`].
    #[must_use]
    pub fn new(host_window: ServiceProxy) -> Self {
        Self {
            // The in-process window starts focused.
            focused: AtomicBool::new(true),
            host_window,
        }
    }

    /// Whether the workbench window currently has focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused.load(Ordering::Relaxed)
    }

    /// Ask the host to open `url` externally.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn open_external(&self, url: &str) -> ServiceResult<bool> {
        let value = self
            .host_window
            .invoke("openExternal", vec![Value::String(url.to_string())])
            .await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))
    }
}

#[async_trait]
impl ServiceHandler for ExtWindow {
    fn id(&self) -> ServiceId {
        ServiceId::ExtWindow
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "onDidChangeWindowFocus" => {
                let focused: bool = decode_arg(id, method, &args, 0)?;
                self.focused.store(focused, Ordering::Relaxed);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
