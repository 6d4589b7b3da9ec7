//! Host endpoint for telemetry events.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg, opt_arg};

use crate::collaborators::TelemetrySink;

/// Publishes extension telemetry into the host [`TelemetrySink`].
pub struct HostTelemetry {
    sink: Arc<dyn TelemetrySink>,
}

impl HostTelemetry {
    /// Create the endpoint over the telemetry collaborator.
    #[must_use]
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl ServiceHandler for HostTelemetry {
    fn id(&self) -> ServiceId {
        ServiceId::HostTelemetry
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "publicLog" => {
                let event: String = decode_arg(id, method, &args, 0)?;
                let data: Value = opt_arg(id, method, &args, 1)?.unwrap_or(Value::Null);
                self.sink.publish(&event, data);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
