//! Extension-side notification façade.

use serde_json::Value;
use tether_rpc::{RpcError, ServiceProxy};

use crate::error::{ServiceError, ServiceResult};
use crate::types::{MessageOptions, Severity};

/// Raises notifications on the host. Outbound only, never registered.
pub struct ExtMessages {
    host_messages: ServiceProxy,
}

impl ExtMessages {
    /// Create the façade.
    ///
    /// `host_messages` must target [`tether_rpc::ServiceId::HostMessages`].
    #[must_use]
    pub fn new(host_messages: ServiceProxy) -> Self {
        Self { host_messages }
    }

    /// Show an informational notification.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn show_information(
        &self,
        message: &str,
        options: MessageOptions,
    ) -> ServiceResult<Option<String>> {
        self.show(Severity::Info, message, options).await
    }

    /// Show a warning notification.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn show_warning(
        &self,
        message: &str,
        options: MessageOptions,
    ) -> ServiceResult<Option<String>> {
        self.show(Severity::Warning, message, options).await
    }

    /// Show an error notification.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn show_error(
        &self,
        message: &str,
        options: MessageOptions,
    ) -> ServiceResult<Option<String>> {
        self.show(Severity::Error, message, options).await
    }

    async fn show(
        &self,
        severity: Severity,
        message: &str,
        options: MessageOptions,
    ) -> ServiceResult<Option<String>> {
        let value = self
            .host_messages
            .invoke(
                "showMessage",
                vec![
                    serde_json::to_value(severity).map_err(RpcError::from)?,
                    Value::String(message.to_string()),
                    serde_json::to_value(options).map_err(RpcError::from)?,
                ],
            )
            .await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))
    }
}
