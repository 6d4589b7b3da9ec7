//! Extension-side clipboard façade.

use serde_json::Value;
use tether_rpc::{RpcError, ServiceProxy};

use crate::error::{ServiceError, ServiceResult};

/// Clipboard access for extension code. Outbound only, never registered.
pub struct ExtClipboard {
    host_clipboard: ServiceProxy,
}

impl ExtClipboard {
    /// Create the façade.
    ///
    /// `host_clipboard` must target [`tether_rpc::ServiceId::HostClipboard`].
    #[must_use]
    pub fn new(host_clipboard: ServiceProxy) -> Self {
        Self { host_clipboard }
    }

    /// Current clipboard text.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn read_text(&self) -> ServiceResult<String> {
        let value = self.host_clipboard.invoke("readText", Vec::new()).await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))
    }

    /// Replace the clipboard text.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn write_text(&self, text: &str) -> ServiceResult<()> {
        self.host_clipboard
            .invoke("writeText", vec![Value::String(text.to_string())])
            .await?;
        Ok(())
    }
}
