#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Virtual resource backing for the tether bridge.
//!
//! Maps logical resource identifiers to lazily computed string content.
//! Entries are registered and unregistered through disposable handles;
//! `stat` and `read` succeed only for registered identifiers, and every
//! mutating operation signals a distinct unsupported-operation error rather
//! than silently succeeding.

mod backing;
mod error;
mod provider;

pub use backing::{Registration, ResourceBacking, ResourceKind, ResourceStat};
pub use error::{FsError, FsResult};
pub use provider::{ContentProvider, StaticContent};
