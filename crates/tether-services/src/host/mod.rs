//! Host-side endpoints of the service pairs.
//!
//! Each endpoint binds one host [`tether_rpc::ServiceId`] and translates
//! inbound calls into collaborator operations. Endpoints that need the
//! extension side hold proxies obtained at composition time; they never hold
//! direct references to extension-side objects.

mod bulk_edits;
mod clipboard;
mod commands;
mod configuration;
mod diagnostics;
mod document_contents;
mod language_features;
mod messages;
mod progress;
mod telemetry;
mod window;
mod workspace;

pub use bulk_edits::HostBulkEdits;
pub use clipboard::HostClipboard;
pub use commands::HostCommands;
pub use configuration::HostConfiguration;
pub use diagnostics::HostDiagnostics;
pub use document_contents::HostDocumentContents;
pub use language_features::HostLanguageFeatures;
pub use messages::HostMessages;
pub use progress::HostProgress;
pub use telemetry::HostTelemetry;
pub use window::HostWindow;
pub use workspace::HostWorkspace;
