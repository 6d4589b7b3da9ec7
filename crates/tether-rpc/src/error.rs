//! RPC error taxonomy.

use thiserror::Error;

use crate::ident::ServiceId;

/// Errors raised by the channel, the protocol, or a dispatched handler.
///
/// Call-scoped errors (`NotRegistered`, `UnknownMethod`, `HandlerFailure`)
/// reject only the specific call that triggered them. Composition-scoped
/// errors (`DuplicateRegistration`, `MissingRequiredRegistration`) are fatal
/// to startup: the service graph must be internally consistent before any
/// call can be trusted.
#[derive(Debug, Error)]
pub enum RpcError {
    /// A call targeted an identifier with no bound handler.
    #[error("no handler registered for {id}")]
    NotRegistered {
        /// The unbound endpoint.
        id: ServiceId,
    },

    /// A handler was registered against an already-bound identifier.
    #[error("handler already registered for {id}")]
    DuplicateRegistration {
        /// The doubly-bound endpoint.
        id: ServiceId,
    },

    /// A required set of identifiers was not fully bound at startup.
    #[error("required service handlers missing: {missing:?}")]
    MissingRequiredRegistration {
        /// The unbound endpoints.
        missing: Vec<ServiceId>,
    },

    /// A bound handler does not implement the requested method.
    #[error("{service} has no method {method:?}")]
    UnknownMethod {
        /// The dispatch target.
        service: ServiceId,
        /// The unrecognized method name.
        method: String,
    },

    /// A handler failed while servicing a call.
    #[error("{service}.{method} failed: {message}")]
    HandlerFailure {
        /// The dispatch target.
        service: ServiceId,
        /// The method that failed.
        method: String,
        /// Handler-supplied failure description.
        message: String,
    },

    /// A message could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The channel was torn down before the call settled.
    #[error("channel closed before the call settled")]
    ChannelClosed,
}

impl RpcError {
    /// Convenience constructor for handler-level failures.
    #[must_use]
    pub fn handler(service: ServiceId, method: &str, message: impl Into<String>) -> Self {
        Self::HandlerFailure {
            service,
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Convenience constructor for unrecognized methods.
    #[must_use]
    pub fn unknown_method(service: ServiceId, method: &str) -> Self {
        Self::UnknownMethod {
            service,
            method: method.to_string(),
        }
    }
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
