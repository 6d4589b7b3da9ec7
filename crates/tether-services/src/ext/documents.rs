//! Extension-side mirror of open documents.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tether_core::ResourceUri;
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, decode_arg};
use tracing::trace;

/// Text of documents the host has announced as open.
#[derive(Default)]
pub struct ExtDocuments {
    documents: DashMap<String, String>,
}

impl ExtDocuments {
    /// Create an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of an open document, if mirrored.
    #[must_use]
    pub fn text(&self, uri: &ResourceUri) -> Option<String> {
        self.documents.get(&uri.to_string()).map(|entry| entry.value().clone())
    }

    /// Rendered uris of all mirrored documents.
    #[must_use]
    pub fn uris(&self) -> Vec<String> {
        let mut uris: Vec<String> = self.documents.iter().map(|entry| entry.key().clone()).collect();
        uris.sort();
        uris
    }
}

#[async_trait]
impl ServiceHandler for ExtDocuments {
    fn id(&self) -> ServiceId {
        ServiceId::ExtDocuments
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "acceptModelAdded" => {
                let uri: ResourceUri = decode_arg(id, method, &args, 0)?;
                let text: String = decode_arg(id, method, &args, 1)?;
                trace!(uri = %uri, "document added");
                self.documents.insert(uri.to_string(), text);
                Ok(Value::Null)
            }
            "acceptModelRemoved" => {
                let uri: ResourceUri = decode_arg(id, method, &args, 0)?;
                self.documents.remove(&uri.to_string());
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
