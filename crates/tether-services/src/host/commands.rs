//! Host endpoint for command registration and execution.

use async_trait::async_trait;
use dashmap::DashSet;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg, opt_arg};
use tracing::trace;

use crate::collaborators::CommandService;

/// Routes command executions.
///
/// Commands contributed by the extension side are recorded here by id;
/// executing one routes back through the extension-side registry. Everything
/// else goes to the host [`CommandService`] collaborator.
pub struct HostCommands {
    service: Arc<dyn CommandService>,
    contributed: DashSet<String>,
    ext_commands: ServiceProxy,
}

impl HostCommands {
    /// Create the endpoint over the host command collaborator.
    ///
    /// `ext_commands` must target [`ServiceId::ExtCommands`].
    #[must_use]
    pub fn new(service: Arc<dyn CommandService>, ext_commands: ServiceProxy) -> Self {
        Self {
            service,
            contributed: DashSet::new(),
            ext_commands,
        }
    }

    async fn execute(&self, id: String, args: Vec<Value>) -> RpcResult<Value> {
        if self.contributed.contains(&id) {
            trace!(command = %id, "routing to contributed command");
            return self
                .ext_commands
                .invoke(
                    "executeContributedCommand",
                    vec![Value::String(id), Value::Array(args)],
                )
                .await;
        }
        self.service
            .execute_command(&id, args)
            .await
            .map_err(|e| e.into_rpc(ServiceId::HostCommands, "executeCommand"))
    }
}

#[async_trait]
impl ServiceHandler for HostCommands {
    fn id(&self) -> ServiceId {
        ServiceId::HostCommands
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "registerCommand" => {
                let command: String = decode_arg(id, method, &args, 0)?;
                self.contributed.insert(command);
                Ok(Value::Null)
            }
            "unregisterCommand" => {
                let command: String = decode_arg(id, method, &args, 0)?;
                self.contributed.remove(&command);
                Ok(Value::Null)
            }
            "executeCommand" => {
                let command: String = decode_arg(id, method, &args, 0)?;
                let call_args: Vec<Value> = opt_arg(id, method, &args, 1)?.unwrap_or_default();
                self.execute(command, call_args).await
            }
            "getCommands" => {
                let mut ids = self.service.command_ids();
                ids.extend(self.contributed.iter().map(|entry| entry.key().clone()));
                ids.sort();
                Ok(serde_json::to_value(ids)?)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
