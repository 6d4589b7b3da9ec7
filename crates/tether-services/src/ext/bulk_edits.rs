//! Extension-side workspace edit façade.

use tether_rpc::{RpcError, ServiceProxy};

use crate::error::{ServiceError, ServiceResult};
use crate::types::WorkspaceEdit;

/// Applies workspace edits through the host. Outbound only, never registered.
pub struct ExtBulkEdits {
    host_bulk_edits: ServiceProxy,
}

impl ExtBulkEdits {
    /// Create the façade.
    ///
    /// `host_bulk_edits` must target [`tether_rpc::ServiceId::HostBulkEdits`].
    #[must_use]
    pub fn new(host_bulk_edits: ServiceProxy) -> Self {
        Self { host_bulk_edits }
    }

    /// Apply `edit`; returns whether the host applied it in full.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn apply_edit(&self, edit: WorkspaceEdit) -> ServiceResult<bool> {
        let value = self
            .host_bulk_edits
            .invoke(
                "tryApplyWorkspaceEdit",
                vec![serde_json::to_value(edit).map_err(RpcError::from)?],
            )
            .await?;
        serde_json::from_value(value).map_err(|e| ServiceError::Rpc(RpcError::from(e)))
    }
}
