//! Same-process duplex message channel.
//!
//! [`MessageChannel::pair`] yields two connected [`Endpoint`]s. `send` on one
//! endpoint synchronously invokes the receiver installed on the other within
//! the same call, so delivery is in-order by construction: there is exactly
//! one sender and one receiver per direction and no batching or reordering.
//! There is no backpressure signal; the channel never blocks.

use std::sync::{Arc, Mutex};
use tracing::trace;

type Receiver = Box<dyn Fn(Vec<u8>) + Send + Sync>;

#[derive(Default)]
struct EndpointState {
    receiver: Mutex<Option<Receiver>>,
    /// Messages sent before the receiver was installed, flushed on install.
    backlog: Mutex<Vec<Vec<u8>>>,
}

/// One side of an in-process duplex channel.
#[derive(Clone)]
pub struct Endpoint {
    local: Arc<EndpointState>,
    remote: Arc<EndpointState>,
}

impl Endpoint {
    /// Send a buffer to the paired endpoint.
    ///
    /// If the peer has installed a receiver the buffer is delivered
    /// synchronously, within this call. Otherwise it is buffered and
    /// delivered, in order, when the peer installs one.
    pub fn send(&self, buffer: Vec<u8>) {
        trace!(len = buffer.len(), "channel send");
        let guard = match self.remote.receiver.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(receiver) = guard.as_ref() {
            receiver(buffer);
        } else {
            drop(guard);
            let mut backlog = match self.remote.backlog.lock() {
                Ok(backlog) => backlog,
                Err(poisoned) => poisoned.into_inner(),
            };
            backlog.push(buffer);
        }
    }

    /// Install the receiver for buffers arriving at this endpoint.
    ///
    /// Any buffers the peer sent before this call are delivered immediately,
    /// in send order. Installing a second receiver replaces the first.
    pub fn on_message(&self, receiver: impl Fn(Vec<u8>) + Send + Sync + 'static) {
        let pending = {
            let mut guard = match self.local.receiver.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard = Some(Box::new(receiver));
            let mut backlog = match self.local.backlog.lock() {
                Ok(backlog) => backlog,
                Err(poisoned) => poisoned.into_inner(),
            };
            std::mem::take(&mut *backlog)
        };
        if !pending.is_empty() {
            trace!(count = pending.len(), "flushing buffered channel messages");
            let guard = match self.local.receiver.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(receiver) = guard.as_ref() {
                for buffer in pending {
                    receiver(buffer);
                }
            }
        }
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}

/// Factory for connected endpoint pairs.
#[derive(Debug)]
pub struct MessageChannel;

impl MessageChannel {
    /// Create a connected pair of endpoints.
    #[must_use]
    pub fn pair() -> (Endpoint, Endpoint) {
        let a = Arc::new(EndpointState::default());
        let b = Arc::new(EndpointState::default());
        (
            Endpoint {
                local: Arc::clone(&a),
                remote: Arc::clone(&b),
            },
            Endpoint { local: b, remote: a },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn delivers_synchronously_in_order() {
        let (a, b) = MessageChannel::pair();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        b.on_message(move |buf| sink.lock().unwrap().push(buf));

        a.send(vec![1]);
        a.send(vec![2]);
        a.send(vec![3]);

        assert_eq!(*seen.lock().unwrap(), vec![vec![1], vec![2], vec![3]]);
    }

    #[test]
    fn buffers_until_receiver_installed() {
        let (a, b) = MessageChannel::pair();
        a.send(vec![1]);
        a.send(vec![2]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        b.on_message(move |buf| sink.lock().unwrap().push(buf));

        assert_eq!(*seen.lock().unwrap(), vec![vec![1], vec![2]]);

        a.send(vec![3]);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn directions_are_independent() {
        let (a, b) = MessageChannel::pair();
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen_a);
        a.on_message(move |buf| sink.lock().unwrap().push(buf));
        let sink = Arc::clone(&seen_b);
        b.on_message(move |buf| sink.lock().unwrap().push(buf));

        a.send(vec![10]);
        b.send(vec![20]);

        assert_eq!(*seen_a.lock().unwrap(), vec![vec![20]]);
        assert_eq!(*seen_b.lock().unwrap(), vec![vec![10]]);
    }
}
