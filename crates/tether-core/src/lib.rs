#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Shared leaf types for the tether bridge.
//!
//! This crate has no dependencies on other workspace members. It holds the
//! types both sides of the bridge agree on: resource identifiers and the
//! extension identity record supplied at composition time.

mod extension;
mod uri;

pub use extension::{ExtensionDescriptor, ExtensionId, TargetPlatform};
pub use uri::{ResourceUri, UriError};
