//! Host endpoint for configuration updates.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_config::ConfigurationDelta;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tracing::debug;

use crate::collaborators::ConfigurationService;

/// Writes configuration options into the host registry.
///
/// Every accepted update is pushed back to the extension side as a change
/// notification carrying the new snapshot and the affected key.
pub struct HostConfiguration {
    configuration: Arc<dyn ConfigurationService>,
    ext_configuration: ServiceProxy,
}

impl HostConfiguration {
    /// Create the endpoint over the configuration collaborator.
    ///
    /// `ext_configuration` must target [`ServiceId::ExtConfiguration`].
    #[must_use]
    pub fn new(
        configuration: Arc<dyn ConfigurationService>,
        ext_configuration: ServiceProxy,
    ) -> Self {
        Self {
            configuration,
            ext_configuration,
        }
    }
}

#[async_trait]
impl ServiceHandler for HostConfiguration {
    fn id(&self) -> ServiceId {
        ServiceId::HostConfiguration
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "updateConfigurationOption" => {
                let key: String = decode_arg(id, method, &args, 0)?;
                let value: Value = decode_arg(id, method, &args, 1)?;
                self.configuration
                    .update_value(&key, value)
                    .map_err(|e| e.into_rpc(id, method))?;
                debug!(key = %key, "configuration option written");

                let snapshot = self.configuration.snapshot();
                let delta = ConfigurationDelta::new(vec![key]);
                self.ext_configuration
                    .invoke(
                        "acceptConfigurationChanged",
                        vec![serde_json::to_value(snapshot)?, serde_json::to_value(delta)?],
                    )
                    .await?;
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
