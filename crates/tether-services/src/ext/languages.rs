//! Extension-side mirror of registered language ids.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};

/// Language ids announced by the host.
#[derive(Default)]
pub struct ExtLanguages {
    ids: RwLock<Vec<String>>,
}

impl ExtLanguages {
    /// Create an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mirrored language ids.
    #[must_use]
    pub fn language_ids(&self) -> Vec<String> {
        match self.ids.read() {
            Ok(ids) => ids.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl ServiceHandler for ExtLanguages {
    fn id(&self) -> ServiceId {
        ServiceId::ExtLanguages
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "acceptLanguageIds" => {
                let ids: Vec<String> = decode_arg(id, method, &args, 0)?;
                let mut current = match self.ids.write() {
                    Ok(current) => current,
                    Err(poisoned) => poisoned.into_inner(),
                };
                *current = ids;
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
