//! Wire messages.
//!
//! Buffers carry a method name, positional arguments, and a correlation id
//! for request/response pairing. The encoding satisfies the transport's
//! structural contract only; it carries no external compatibility
//! requirement.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RpcError, RpcResult};
use crate::ident::ServiceId;

/// Error kind preserved across the simulated process boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    /// The target identifier had no bound handler.
    NotRegistered,
    /// The handler does not implement the method.
    UnknownMethod,
    /// The handler failed while servicing the call.
    HandlerFailure,
}

/// A call rejection carried in a reply buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    /// Error kind.
    pub code: ErrorCode,
    /// The dispatch target.
    pub service: ServiceId,
    /// The method that was invoked.
    pub method: String,
    /// Human-readable description.
    pub message: String,
}

impl WireError {
    /// Build the wire form of a handler-side rejection.
    #[must_use]
    pub fn from_rpc_error(service: ServiceId, method: &str, err: &RpcError) -> Self {
        let code = match err {
            RpcError::NotRegistered { .. } => ErrorCode::NotRegistered,
            RpcError::UnknownMethod { .. } => ErrorCode::UnknownMethod,
            _ => ErrorCode::HandlerFailure,
        };
        Self {
            code,
            service,
            method: method.to_string(),
            message: err.to_string(),
        }
    }

    /// Reconstruct the caller-side error.
    #[must_use]
    pub fn into_rpc_error(self) -> RpcError {
        match self.code {
            ErrorCode::NotRegistered => RpcError::NotRegistered { id: self.service },
            ErrorCode::UnknownMethod => RpcError::UnknownMethod {
                service: self.service,
                method: self.method,
            },
            ErrorCode::HandlerFailure => RpcError::HandlerFailure {
                service: self.service,
                method: self.method,
                message: self.message,
            },
        }
    }
}

/// A buffer-shaped protocol message.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RpcMessage {
    /// An outgoing call.
    Request {
        /// Correlation id.
        seq: u64,
        /// Target endpoint.
        target: ServiceId,
        /// Method name.
        method: String,
        /// Positional arguments.
        args: Vec<Value>,
    },
    /// A successful response.
    Reply {
        /// Correlation id of the request.
        seq: u64,
        /// Decoded return value.
        value: Value,
    },
    /// A rejected response.
    ReplyErr {
        /// Correlation id of the request.
        seq: u64,
        /// The rejection.
        error: WireError,
    },
}

impl RpcMessage {
    /// Encode into a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Codec`] if serialization fails.
    pub fn encode(&self) -> RpcResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode from a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Codec`] if the buffer is not a valid message.
    pub fn decode(buffer: &[u8]) -> RpcResult<Self> {
        Ok(serde_json::from_slice(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_round_trip() {
        let msg = RpcMessage::Request {
            seq: 7,
            target: ServiceId::HostCommands,
            method: "executeCommand".to_string(),
            args: vec![json!("editor.action.format"), json!([1, 2])],
        };
        let buf = msg.encode().unwrap();
        match RpcMessage::decode(&buf).unwrap() {
            RpcMessage::Request {
                seq,
                target,
                method,
                args,
            } => {
                assert_eq!(seq, 7);
                assert_eq!(target, ServiceId::HostCommands);
                assert_eq!(method, "executeCommand");
                assert_eq!(args.len(), 2);
            },
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn wire_error_preserves_kind() {
        let err = RpcError::NotRegistered {
            id: ServiceId::HostClipboard,
        };
        let wire = WireError::from_rpc_error(ServiceId::HostClipboard, "readText", &err);
        assert_eq!(wire.code, ErrorCode::NotRegistered);
        assert!(matches!(
            wire.into_rpc_error(),
            RpcError::NotRegistered {
                id: ServiceId::HostClipboard
            }
        ));
    }

    #[test]
    fn handler_failure_carries_message() {
        let err = RpcError::handler(ServiceId::ExtCommands, "executeContributedCommand", "boom");
        let wire = WireError::from_rpc_error(ServiceId::ExtCommands, "executeContributedCommand", &err);
        assert_eq!(wire.code, ErrorCode::HandlerFailure);
        match wire.into_rpc_error() {
            RpcError::HandlerFailure { message, .. } => assert!(message.contains("boom")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
