#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Service pairs and the composition root of the tether bridge.
//!
//! The bridge substitutes an in-process channel for the usual out-of-process
//! extension host transport. This crate holds both sides of every service
//! pair, the narrow collaborator traits the host endpoints delegate to, the
//! host-facing adapter façades, and [`ServiceGraph`], which composes the
//! whole thing in a fixed dependency order.
//!
//! Typical use goes through [`ServiceGraph::global`] for the process-wide
//! instance, or [`ServiceGraph::build`] for isolated graphs in tests.

pub mod adapters;
pub mod collaborators;
mod composition;
mod error;
pub mod ext;
pub mod host;
mod types;

pub use composition::{ServiceGraph, required_extension_services, required_host_services};
pub use error::{ServiceError, ServiceResult};
pub use types::{
    Diagnostic, DiagnosticsEntry, DocumentSelector, FeatureKind, MessageOptions,
    ProgressOptions, ResourceTextEdit, Severity, TelemetryLevel, WorkspaceEdit, WorkspaceFolder,
};
