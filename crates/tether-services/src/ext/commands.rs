//! Extension-side command registry.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tracing::{debug, trace};

use crate::collaborators::CommandFn;
use crate::error::{ServiceError, ServiceResult};

/// Commands contributed by extension code.
///
/// Registration is mirrored to the host so that every execution, local or
/// host-initiated, routes through one dispatch point. Executions of commands
/// this side does not own travel to the host and may route back here.
pub struct ExtCommands {
    registry: DashMap<String, CommandFn>,
    host_commands: ServiceProxy,
}

impl ExtCommands {
    /// Create the registry.
    ///
    /// `host_commands` must target [`ServiceId::HostCommands`].
    #[must_use]
    pub fn new(host_commands: ServiceProxy) -> Self {
        Self {
            registry: DashMap::new(),
            host_commands,
        }
    }

    /// Contribute a command under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::CommandExists`] when `id` is already
    /// contributed on this side, or the bridge rejection from mirroring the
    /// registration to the host.
    pub async fn register_command<F>(&self, id: &str, body: F) -> ServiceResult<()>
    where
        F: Fn(Vec<Value>) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        match self.registry.entry(id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(ServiceError::CommandExists { id: id.to_string() });
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(body));
            }
        }
        debug!(command = id, "command contributed");
        self.host_commands
            .invoke("registerCommand", vec![Value::String(id.to_string())])
            .await?;
        Ok(())
    }

    /// Withdraw a contributed command.
    ///
    /// # Errors
    ///
    /// Returns the bridge rejection from withdrawing the host mirror.
    pub async fn unregister_command(&self, id: &str) -> ServiceResult<()> {
        self.registry.remove(id);
        self.host_commands
            .invoke("unregisterCommand", vec![Value::String(id.to_string())])
            .await?;
        Ok(())
    }

    /// Execute a command by id, wherever it lives.
    ///
    /// # Errors
    ///
    /// Propagates the execution failure as reported across the bridge.
    pub async fn execute_command(&self, id: &str, args: Vec<Value>) -> ServiceResult<Value> {
        trace!(command = id, "execute");
        let value = self
            .host_commands
            .invoke(
                "executeCommand",
                vec![Value::String(id.to_string()), Value::Array(args)],
            )
            .await?;
        Ok(value)
    }

    /// Identifiers of every known command, host-owned and contributed.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn all_commands(&self) -> ServiceResult<Vec<String>> {
        let value = self.host_commands.invoke("getCommands", Vec::new()).await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))
    }
}

#[async_trait]
impl ServiceHandler for ExtCommands {
    fn id(&self) -> ServiceId {
        ServiceId::ExtCommands
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "executeContributedCommand" => {
                let command: String = decode_arg(id, method, &args, 0)?;
                let call_args: Vec<Value> = decode_arg(id, method, &args, 1)?;
                let body = self
                    .registry
                    .get(&command)
                    .map(|entry| Arc::clone(entry.value()))
                    .ok_or_else(|| {
                        ServiceError::UnknownCommand {
                            id: command.clone(),
                        }
                        .into_rpc(id, method)
                    })?;
                body(call_args).map_err(|e| e.into_rpc(id, method))
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
