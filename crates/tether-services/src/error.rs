//! Error types for service pairs and host adapters.

use tether_rpc::{RpcError, ServiceId};

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors produced by service pairs, host collaborators and adapters.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A call through the bridge failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The configuration bridge rejected the operation.
    #[error(transparent)]
    Config(#[from] tether_config::ConfigError),

    /// A virtual resource operation failed.
    #[error(transparent)]
    Fs(#[from] tether_vfs::FsError),

    /// No command is registered under the given identifier.
    #[error("command not found: {id}")]
    UnknownCommand {
        /// The requested command identifier.
        id: String,
    },

    /// A command is already registered under the given identifier.
    #[error("command already exists: {id}")]
    CommandExists {
        /// The conflicting command identifier.
        id: String,
    },

    /// No provider is registered for the given feature handle.
    #[error("no provider for handle {handle}")]
    UnknownHandle {
        /// The unresolved provider handle.
        handle: u64,
    },

    /// No content provider covers the given uri scheme.
    #[error("no content provider for scheme {scheme}")]
    NoContentProvider {
        /// The unhandled uri scheme.
        scheme: String,
    },
}

impl ServiceError {
    /// Fold into an [`RpcError`] for replying across the bridge.
    ///
    /// Bridge errors pass through unchanged; everything else becomes a
    /// handler failure attributed to `service`/`method`.
    #[must_use]
    pub fn into_rpc(self, service: ServiceId, method: &str) -> RpcError {
        match self {
            Self::Rpc(err) => err,
            other => RpcError::handler(service, method, other.to_string()),
        }
    }
}
