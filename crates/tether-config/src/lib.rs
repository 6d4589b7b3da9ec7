#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Synchronous configuration bridge for the tether in-process extension host.
//!
//! This crate has no dependencies on other workspace members. It holds the
//! configuration snapshot model, change deltas, and the two-state bridge
//! (Uninitialized → Initialized) that replaces the asynchronous original for
//! the in-process environment. Wiring the bridge to the RPC layer happens in
//! `tether-services`.

mod bridge;
mod error;
mod model;
mod provider;

pub use bridge::SyncConfiguration;
pub use error::{ConfigError, ConfigResult};
pub use model::{ConfigurationDelta, ConfigurationModel};
pub use provider::ConfigProvider;
