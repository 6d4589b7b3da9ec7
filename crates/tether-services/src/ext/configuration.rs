//! Extension-side configuration surface.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_config::{ConfigProvider, ConfigurationDelta, ConfigurationModel, SyncConfiguration};
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};

use crate::error::ServiceResult;

/// Wraps the synchronous configuration bridge for extension code.
///
/// Reads come straight from the snapshot; writes travel to the host registry
/// and return here as an accepted change.
pub struct ExtConfiguration {
    bridge: SyncConfiguration,
    host_configuration: ServiceProxy,
}

impl ExtConfiguration {
    /// Create the surface in the Uninitialized state.
    ///
    /// `host_configuration` must target [`ServiceId::HostConfiguration`].
    #[must_use]
    pub fn new(host_configuration: ServiceProxy) -> Self {
        Self {
            bridge: SyncConfiguration::new(),
            host_configuration,
        }
    }

    /// The current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the bridge's precondition violation when no snapshot was
    /// initialized yet.
    pub fn config_provider(&self) -> ServiceResult<Arc<ConfigProvider>> {
        Ok(self.bridge.config_provider()?)
    }

    /// Whether a snapshot is present.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.bridge.is_initialized()
    }

    /// Install the initial snapshot directly, outside the bridge.
    ///
    /// Composition injects the host registry's state through this before any
    /// call is issued.
    pub fn initialize(&self, model: ConfigurationModel) {
        self.bridge.initialize_configuration(model);
    }

    /// Write one option into the host registry.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn update_value(&self, key: &str, value: Value) -> ServiceResult<()> {
        self.host_configuration
            .invoke(
                "updateConfigurationOption",
                vec![Value::String(key.to_string()), value],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceHandler for ExtConfiguration {
    fn id(&self) -> ServiceId {
        ServiceId::ExtConfiguration
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "initializeConfiguration" => {
                let model: ConfigurationModel = decode_arg(id, method, &args, 0)?;
                self.bridge.initialize_configuration(model);
                Ok(Value::Null)
            }
            "acceptConfigurationChanged" => {
                let model: ConfigurationModel = decode_arg(id, method, &args, 0)?;
                let delta: ConfigurationDelta = decode_arg(id, method, &args, 1)?;
                self.bridge
                    .accept_configuration_changed(model, delta)
                    .map_err(|e| RpcError::handler(id, method, e.to_string()))?;
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
