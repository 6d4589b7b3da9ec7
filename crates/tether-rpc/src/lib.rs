#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! In-process message channel and RPC protocol for the tether bridge.
//!
//! This crate provides:
//! - A same-process duplex [`MessageChannel`] standing in for a real socket
//! - A typed [`ServiceId`] registry of logical endpoints
//! - An [`RpcProtocol`] that multiplexes calls over the channel, turning a
//!   registered handler into a callable remote stub and incoming buffers
//!   into local dispatches
//!
//! The "wire format" here is an internal convention, not a persisted or
//! networked protocol: buffers only exist to preserve the two-sided
//! call/response contract of the original out-of-process design.

mod channel;
mod error;
mod handler;
mod ident;
mod message;
mod protocol;

pub use channel::{Endpoint, MessageChannel};
pub use error::{RpcError, RpcResult};
pub use handler::{ServiceHandler, decode_arg, opt_arg};
pub use ident::{ServiceId, Side};
pub use message::{ErrorCode, RpcMessage, WireError};
pub use protocol::{RpcProtocol, ServiceProxy};
