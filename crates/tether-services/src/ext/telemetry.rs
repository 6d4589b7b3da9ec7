//! Extension-side telemetry forwarding.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};
use tracing::trace;

use crate::error::ServiceResult;
use crate::types::TelemetryLevel;

/// Forwards telemetry events, honoring the host-announced level.
pub struct ExtTelemetry {
    level: RwLock<TelemetryLevel>,
    host_telemetry: ServiceProxy,
}

impl ExtTelemetry {
    /// Create the forwarder at the default level.
    ///
    /// `host_telemetry` must target [`ServiceId::HostTelemetry`].
    #[must_use]
    pub fn new(host_telemetry: ServiceProxy) -> Self {
        Self {
            level: RwLock::new(TelemetryLevel::default()),
            host_telemetry,
        }
    }

    /// The current telemetry level.
    #[must_use]
    pub fn level(&self) -> TelemetryLevel {
        match self.level.read() {
            Ok(level) => *level,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Publish one event unless telemetry is off.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn log(&self, event: &str, data: Value) -> ServiceResult<()> {
        if self.level() == TelemetryLevel::Off {
            trace!(event, "telemetry suppressed");
            return Ok(());
        }
        self.host_telemetry
            .invoke("publicLog", vec![Value::String(event.to_string()), data])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ServiceHandler for ExtTelemetry {
    fn id(&self) -> ServiceId {
        ServiceId::ExtTelemetry
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "onDidChangeTelemetryLevel" => {
                let level: TelemetryLevel = decode_arg(id, method, &args, 0)?;
                let mut current = match self.level.write() {
                    Ok(current) => current,
                    Err(poisoned) => poisoned.into_inner(),
                };
                *current = level;
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
