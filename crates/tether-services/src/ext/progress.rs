//! Extension-side progress reporting.

use async_trait::async_trait;
use dashmap::DashSet;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tether_rpc::{RpcError, RpcResult, ServiceHandler, ServiceId, ServiceProxy, decode_arg};

use crate::error::ServiceResult;
use crate::types::ProgressOptions;

/// Reports long-running operations to the host progress renderer.
pub struct ExtProgress {
    host_progress: ServiceProxy,
    next_handle: AtomicU64,
    canceled: DashSet<u64>,
}

impl ExtProgress {
    /// Create the reporter.
    ///
    /// `host_progress` must target [`ServiceId::HostProgress`].
    #[must_use]
    pub fn new(host_progress: ServiceProxy) -> Self {
        Self {
            host_progress,
            next_handle: AtomicU64::new(1),
            canceled: DashSet::new(),
        }
    }

    /// Announce an operation; returns its handle.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn start(&self, options: ProgressOptions) -> ServiceResult<u64> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.host_progress
            .invoke(
                "startProgress",
                vec![
                    Value::from(handle),
                    serde_json::to_value(options).map_err(RpcError::from)?,
                ],
            )
            .await?;
        Ok(handle)
    }

    /// Post an intermediate message for an announced operation.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn report(&self, handle: u64, message: &str) -> ServiceResult<()> {
        self.host_progress
            .invoke(
                "progressReport",
                vec![Value::from(handle), Value::String(message.to_string())],
            )
            .await?;
        Ok(())
    }

    /// Mark an announced operation as finished.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection.
    pub async fn end(&self, handle: u64) -> ServiceResult<()> {
        self.canceled.remove(&handle);
        self.host_progress
            .invoke("progressEnd", vec![Value::from(handle)])
            .await?;
        Ok(())
    }

    /// Run `task` bracketed by start and end events.
    ///
    /// # Errors
    ///
    /// Propagates the bridge rejection from either bracket; the task itself
    /// is infallible from the reporter's point of view.
    pub async fn with_progress<T, Fut>(&self, options: ProgressOptions, task: Fut) -> ServiceResult<T>
    where
        Fut: Future<Output = T> + Send,
    {
        let handle = self.start(options).await?;
        let output = task.await;
        self.end(handle).await?;
        Ok(output)
    }

    /// Whether the host canceled the operation.
    #[must_use]
    pub fn is_canceled(&self, handle: u64) -> bool {
        self.canceled.contains(&handle)
    }
}

#[async_trait]
impl ServiceHandler for ExtProgress {
    fn id(&self) -> ServiceId {
        ServiceId::ExtProgress
    }

    async fn dispatch(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let id = self.id();
        match method {
            "acceptProgressCanceled" => {
                let handle: u64 = decode_arg(id, method, &args, 0)?;
                self.canceled.insert(handle);
                Ok(Value::Null)
            }
            _ => Err(RpcError::unknown_method(id, method)),
        }
    }
}
