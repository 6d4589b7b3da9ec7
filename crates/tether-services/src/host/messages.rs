//! Host endpoint for user-facing notifications.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg, opt_arg};

use crate::collaborators::NotificationService;
use crate::types::{MessageOptions, Severity};

/// Shows notifications raised by the extension side.
///
/// The `source` attribution is stripped before the notification reaches the
/// collaborator; in-process extensions are not rendered with a per-extension
/// settings affordance.
pub struct HostMessages {
    notifications: Arc<dyn NotificationService>,
}

impl HostMessages {
    /// Create the endpoint over the notification collaborator.
    #[must_use]
    pub fn new(notifications: Arc<dyn NotificationService>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl ServiceHandler for HostMessages {
    fn id(&self) -> ServiceId {
        ServiceId::HostMessages
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "showMessage" => {
                let severity: Severity = decode_arg(id, method, &args, 0)?;
                let message: String = decode_arg(id, method, &args, 1)?;
                let mut options: MessageOptions =
                    opt_arg(id, method, &args, 2)?.unwrap_or_default();
                options.source = None;
                let action = self
                    .notifications
                    .show_message(severity, &message, options)
                    .await
                    .map_err(|e| e.into_rpc(id, method))?;
                Ok(serde_json::to_value(action)?)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
