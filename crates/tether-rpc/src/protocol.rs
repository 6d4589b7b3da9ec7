//! Call multiplexing over the message channel.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Notify, oneshot};
use tracing::{debug, trace, warn};

use crate::channel::Endpoint;
use crate::error::{RpcError, RpcResult};
use crate::handler::ServiceHandler;
use crate::ident::ServiceId;
use crate::message::{RpcMessage, WireError};

struct Inner {
    /// Side label used in log output.
    label: &'static str,
    endpoint: Endpoint,
    /// Endpoint registry: populated at composition time, one handler per id.
    locals: DashMap<ServiceId, Arc<dyn ServiceHandler>>,
    /// Pending call table: correlation id to resolver.
    pending: DashMap<u64, oneshot::Sender<RpcResult<Value>>>,
    next_seq: AtomicU64,
    /// Signaled whenever a pending call settles; `drain` waits on this.
    settled: Notify,
}

/// One side's view of the RPC bridge.
///
/// Multiplexes calls and events over a channel [`Endpoint`]: registered
/// handlers service inbound requests, [`RpcProtocol::proxy`] produces
/// callable stubs for the remote side's handlers.
#[derive(Clone)]
pub struct RpcProtocol {
    inner: Arc<Inner>,
}

impl RpcProtocol {
    /// Create a protocol bound to one endpoint of a channel pair.
    ///
    /// `label` names the side in log output (`"host"` / `"extension"`).
    #[must_use]
    pub fn new(endpoint: Endpoint, label: &'static str) -> Self {
        let inner = Arc::new(Inner {
            label,
            endpoint,
            locals: DashMap::new(),
            pending: DashMap::new(),
            next_seq: AtomicU64::new(1),
            settled: Notify::new(),
        });

        let weak = Arc::downgrade(&inner);
        inner.endpoint.on_message(move |buffer| {
            if let Some(inner) = weak.upgrade() {
                Inner::receive(&inner, &buffer);
            }
        });

        Self { inner }
    }

    /// Bind a handler for inbound calls addressed to its [`ServiceId`].
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::DuplicateRegistration`] if the id is already
    /// bound. This is fatal at composition time; the existing binding is
    /// never silently overwritten.
    pub fn register_local(&self, handler: Arc<dyn ServiceHandler>) -> RpcResult<()> {
        let id = handler.id();
        match self.inner.locals.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(RpcError::DuplicateRegistration { id })
            },
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(handler);
                debug!(side = self.inner.label, service = %id, "handler registered");
                Ok(())
            },
        }
    }

    /// Obtain a callable stub for a remote endpoint.
    ///
    /// The stub may be obtained before or after the remote side binds its
    /// handler; calls always dispatch to the handler bound at call time.
    #[must_use]
    pub fn proxy(&self, id: ServiceId) -> ServiceProxy {
        ServiceProxy {
            inner: Arc::clone(&self.inner),
            id,
        }
    }

    /// Assert that every id in `ids` has a bound local handler.
    ///
    /// This is a composition-time invariant check, not a runtime race check.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::MissingRequiredRegistration`] listing the unbound
    /// ids; the caller must abort composition.
    pub fn assert_registered(&self, ids: &[ServiceId]) -> RpcResult<()> {
        let missing: Vec<ServiceId> = ids
            .iter()
            .copied()
            .filter(|id| !self.inner.locals.contains_key(id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RpcError::MissingRequiredRegistration { missing })
        }
    }

    /// Resolve once all currently pending outgoing calls have settled.
    ///
    /// Intended for shutdown only, never mid-flight.
    pub async fn drain(&self) {
        loop {
            let settled = self.inner.settled.notified();
            if self.inner.pending.is_empty() {
                return;
            }
            settled.await;
        }
    }

    /// Number of calls awaiting a response.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.inner.pending.len()
    }
}

impl std::fmt::Debug for RpcProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcProtocol")
            .field("side", &self.inner.label)
            .field("locals", &self.inner.locals.len())
            .field("pending", &self.inner.pending.len())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn receive(inner: &Arc<Self>, buffer: &[u8]) {
        let message = match RpcMessage::decode(buffer) {
            Ok(message) => message,
            Err(e) => {
                warn!(side = inner.label, error = %e, "dropping undecodable message");
                return;
            },
        };

        match message {
            RpcMessage::Request {
                seq,
                target,
                method,
                args,
            } => Self::dispatch(inner, seq, target, method, args),
            RpcMessage::Reply { seq, value } => inner.settle(seq, Ok(value)),
            RpcMessage::ReplyErr { seq, error } => {
                inner.settle(seq, Err(error.into_rpc_error()));
            },
        }
    }

    /// Decode the target and invoke the bound handler, converting any error
    /// into a rejected reply rather than letting it escape to the channel.
    fn dispatch(inner: &Arc<Self>, seq: u64, target: ServiceId, method: String, args: Vec<Value>) {
        trace!(side = inner.label, service = %target, method = %method, seq, "dispatch");

        let Some(handler) = inner.locals.get(&target).map(|entry| Arc::clone(entry.value()))
        else {
            inner.reply_err(
                seq,
                WireError::from_rpc_error(
                    target,
                    &method,
                    &RpcError::NotRegistered { id: target },
                ),
            );
            return;
        };

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            match handler.dispatch(&method, args).await {
                Ok(value) => inner.reply(seq, value),
                Err(e) => {
                    trace!(
                        side = inner.label,
                        service = %target,
                        method = %method,
                        error = %e,
                        "handler rejected call"
                    );
                    inner.reply_err(seq, WireError::from_rpc_error(target, &method, &e));
                },
            }
        });
    }

    fn reply(&self, seq: u64, value: Value) {
        match (RpcMessage::Reply { seq, value }).encode() {
            Ok(buffer) => self.endpoint.send(buffer),
            Err(e) => warn!(side = self.label, seq, error = %e, "failed to encode reply"),
        }
    }

    fn reply_err(&self, seq: u64, error: WireError) {
        match (RpcMessage::ReplyErr { seq, error }).encode() {
            Ok(buffer) => self.endpoint.send(buffer),
            Err(e) => warn!(side = self.label, seq, error = %e, "failed to encode rejection"),
        }
    }

    fn settle(&self, seq: u64, result: RpcResult<Value>) {
        if let Some((_, tx)) = self.pending.remove(&seq) {
            // The caller may have been dropped; that only cancels its own wait.
            let _ = tx.send(result);
            self.settled.notify_waiters();
        } else {
            warn!(side = self.label, seq, "response for unknown correlation id");
        }
    }
}

/// A callable stub for a remote endpoint.
///
/// Methods invoked through the stub serialize onto the channel and resolve
/// with the decoded response or the propagated handler error. There is no
/// timeout or cancellation for in-flight calls: a handler that never responds
/// leaves the returned future pending forever. This is inherited, documented
/// behavior.
#[derive(Clone)]
pub struct ServiceProxy {
    inner: Arc<Inner>,
    id: ServiceId,
}

impl ServiceProxy {
    /// The endpoint this stub targets.
    #[must_use]
    pub fn id(&self) -> ServiceId {
        self.id
    }

    /// Invoke a method on the remote handler.
    ///
    /// # Errors
    ///
    /// Rejects with [`RpcError::NotRegistered`] if the target has no bound
    /// handler, [`RpcError::UnknownMethod`] or [`RpcError::HandlerFailure`]
    /// as propagated from the handler, or [`RpcError::ChannelClosed`] if the
    /// protocol is torn down before the call settles.
    pub async fn invoke(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.inner.pending.insert(seq, tx);

        let request = RpcMessage::Request {
            seq,
            target: self.id,
            method: method.to_string(),
            args,
        };
        let buffer = match request.encode() {
            Ok(buffer) => buffer,
            Err(e) => {
                self.inner.pending.remove(&seq);
                return Err(e);
            },
        };

        trace!(side = self.inner.label, service = %self.id, method, seq, "invoke");
        self.inner.endpoint.send(buffer);

        rx.await.map_err(|_| RpcError::ChannelClosed)?
    }
}

impl std::fmt::Debug for ServiceProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProxy").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MessageChannel;
    use async_trait::async_trait;
    use serde_json::json;

    /// Returns its single argument unchanged.
    struct EchoHandler {
        id: ServiceId,
    }

    #[async_trait]
    impl ServiceHandler for EchoHandler {
        fn id(&self) -> ServiceId {
            self.id
        }

        async fn dispatch(&self, method: &str, mut args: Vec<Value>) -> RpcResult<Value> {
            match method {
                "invoke" => Ok(args.drain(..).next().unwrap_or(Value::Null)),
                "fail" => Err(RpcError::handler(self.id, method, "intentional failure")),
                _ => Err(RpcError::unknown_method(self.id, method)),
            }
        }
    }

    fn bridge() -> (RpcProtocol, RpcProtocol) {
        let (host_end, ext_end) = MessageChannel::pair();
        (
            RpcProtocol::new(host_end, "host"),
            RpcProtocol::new(ext_end, "extension"),
        )
    }

    #[tokio::test]
    async fn proxy_resolves_to_registered_handler() {
        let (host, ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();

        let proxy = ext.proxy(ServiceId::HostCommands);
        let result = proxy.invoke("invoke", vec![json!("hello")]).await.unwrap();
        assert_eq!(result, json!("hello"));
    }

    #[tokio::test]
    async fn proxy_obtained_before_registration_still_dispatches() {
        let (host, ext) = bridge();
        let proxy = ext.proxy(ServiceId::HostCommands);

        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();

        let result = proxy.invoke("invoke", vec![json!(42)]).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn call_to_unbound_id_rejects_not_registered() {
        let (_host, ext) = bridge();
        let proxy = ext.proxy(ServiceId::HostClipboard);
        let err = proxy.invoke("readText", Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            RpcError::NotRegistered {
                id: ServiceId::HostClipboard
            }
        ));
    }

    #[tokio::test]
    async fn handler_failure_rejects_only_that_call() {
        let (host, ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();
        let proxy = ext.proxy(ServiceId::HostCommands);

        let err = proxy.invoke("fail", Vec::new()).await.unwrap_err();
        assert!(matches!(err, RpcError::HandlerFailure { .. }));

        // The receiving side survives; the next call succeeds.
        let result = proxy.invoke("invoke", vec![json!("still alive")]).await.unwrap();
        assert_eq!(result, json!("still alive"));
    }

    #[tokio::test]
    async fn unknown_method_is_distinguishable() {
        let (host, ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();
        let proxy = ext.proxy(ServiceId::HostCommands);

        let err = proxy.invoke("noSuchMethod", Vec::new()).await.unwrap_err();
        assert!(matches!(err, RpcError::UnknownMethod { .. }));
    }

    #[tokio::test]
    async fn duplicate_registration_is_fatal() {
        let (host, _ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();
        let err = host
            .register_local(Arc::new(EchoHandler {
                id: ServiceId::HostCommands,
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            RpcError::DuplicateRegistration {
                id: ServiceId::HostCommands
            }
        ));
    }

    #[tokio::test]
    async fn assert_registered_reports_missing_ids() {
        let (host, _ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();

        host.assert_registered(&[ServiceId::HostCommands]).unwrap();

        let err = host
            .assert_registered(&[ServiceId::HostCommands, ServiceId::HostWindow])
            .unwrap_err();
        match err {
            RpcError::MissingRequiredRegistration { missing } => {
                assert_eq!(missing, vec![ServiceId::HostWindow]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn drain_resolves_once_calls_settle() {
        let (host, ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();
        let proxy = ext.proxy(ServiceId::HostCommands);

        proxy.invoke("invoke", vec![json!(1)]).await.unwrap();
        assert_eq!(ext.pending_calls(), 0);

        // With nothing in flight, drain resolves immediately.
        ext.drain().await;
    }

    #[tokio::test]
    async fn bidirectional_calls_share_one_channel_pair() {
        let (host, ext) = bridge();
        host.register_local(Arc::new(EchoHandler {
            id: ServiceId::HostCommands,
        }))
        .unwrap();
        ext.register_local(Arc::new(EchoHandler {
            id: ServiceId::ExtCommands,
        }))
        .unwrap();

        let to_host = ext.proxy(ServiceId::HostCommands);
        let to_ext = host.proxy(ServiceId::ExtCommands);

        assert_eq!(
            to_host.invoke("invoke", vec![json!("a")]).await.unwrap(),
            json!("a")
        );
        assert_eq!(
            to_ext.invoke("invoke", vec![json!("b")]).await.unwrap(),
            json!("b")
        );
    }
}
