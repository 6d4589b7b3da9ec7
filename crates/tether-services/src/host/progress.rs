//! Host endpoint for long-running operation progress.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};

use crate::collaborators::ProgressService;
use crate::types::ProgressOptions;

/// Forwards progress lifecycle events to the host [`ProgressService`].
pub struct HostProgress {
    progress: Arc<dyn ProgressService>,
}

impl HostProgress {
    /// Create the endpoint over the progress collaborator.
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressService>) -> Self {
        Self { progress }
    }
}

#[async_trait]
impl ServiceHandler for HostProgress {
    fn id(&self) -> ServiceId {
        ServiceId::HostProgress
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "startProgress" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                let options: ProgressOptions = decode_arg(id, method, &args, 1)?;
                self.progress.start(handle, options);
                Ok(Value::Null)
            }
            "progressReport" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                let message: String = decode_arg(id, method, &args, 1)?;
                self.progress.report(handle, message);
                Ok(Value::Null)
            }
            "progressEnd" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                self.progress.end(handle);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
