//! Handler trait and argument helpers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RpcError, RpcResult};
use crate::ident::ServiceId;

/// A handler bound to a [`ServiceId`] for inbound calls.
///
/// Implementations match on the method name and extract positional arguments
/// with [`decode_arg`]. Unrecognized methods must return
/// [`RpcError::UnknownMethod`]; any other error rejects the specific call
/// only and never escapes to the channel.
#[async_trait]
pub trait ServiceHandler: Send + Sync {
    /// Service this handler expects to be bound to (used in error reporting).
    fn id(&self) -> ServiceId;

    /// Dispatch an inbound call.
    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value>;
}

/// Decode the positional argument at `index`.
///
/// # Errors
///
/// Returns [`RpcError::HandlerFailure`] if the argument is missing or has the
/// wrong shape.
pub fn decode_arg<T: DeserializeOwned>(
    service: ServiceId,
    method: &str,
    args: &[Value],
    index: usize,
) -> RpcResult<T> {
    let value = args.get(index).ok_or_else(|| {
        RpcError::handler(service, method, format!("missing argument {index}"))
    })?;
    serde_json::from_value(value.clone()).map_err(|e| {
        RpcError::handler(service, method, format!("bad argument {index}: {e}"))
    })
}

/// Decode the positional argument at `index`, treating absence or `null` as
/// `None`.
///
/// # Errors
///
/// Returns [`RpcError::HandlerFailure`] if a present argument has the wrong
/// shape.
pub fn opt_arg<T: DeserializeOwned>(
    service: ServiceId,
    method: &str,
    args: &[Value],
    index: usize,
) -> RpcResult<Option<T>> {
    match args.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
            RpcError::handler(service, method, format!("bad argument {index}: {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_arg_extracts_positionally() {
        let args = vec![json!("hello"), json!(3)];
        let first: String =
            decode_arg(ServiceId::HostCommands, "executeCommand", &args, 0).unwrap();
        let second: u32 = decode_arg(ServiceId::HostCommands, "executeCommand", &args, 1).unwrap();
        assert_eq!(first, "hello");
        assert_eq!(second, 3);
    }

    #[test]
    fn decode_arg_reports_missing() {
        let args: Vec<Value> = Vec::new();
        let err = decode_arg::<String>(ServiceId::HostCommands, "executeCommand", &args, 0)
            .unwrap_err();
        assert!(matches!(err, RpcError::HandlerFailure { .. }));
    }

    #[test]
    fn opt_arg_treats_null_as_none() {
        let args = vec![Value::Null];
        let value: Option<String> =
            opt_arg(ServiceId::HostMessages, "showMessage", &args, 0).unwrap();
        assert!(value.is_none());

        let value: Option<String> =
            opt_arg(ServiceId::HostMessages, "showMessage", &args, 5).unwrap();
        assert!(value.is_none());
    }
}
