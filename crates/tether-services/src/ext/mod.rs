//! Extension-side services.
//!
//! These are the objects extension-style code talks to directly. Inbound
//! state pushes from the host arrive through their [`tether_rpc::ServiceHandler`]
//! implementations; outbound operations go through proxies captured at
//! composition time. The messages, clipboard and bulk-edit surfaces have no
//! inbound methods and exist as plain façades.

mod bulk_edits;
mod clipboard;
mod commands;
mod configuration;
mod diagnostics;
mod document_contents;
mod documents;
mod language_features;
mod languages;
mod messages;
mod progress;
mod telemetry;
mod window;
mod workspace;

pub use bulk_edits::ExtBulkEdits;
pub use clipboard::ExtClipboard;
pub use commands::ExtCommands;
pub use configuration::ExtConfiguration;
pub use diagnostics::ExtDiagnostics;
pub use document_contents::ExtDocumentContents;
pub use documents::ExtDocuments;
pub use language_features::{ExtLanguageFeatures, FeatureProvider};
pub use languages::ExtLanguages;
pub use messages::ExtMessages;
pub use progress::ExtProgress;
pub use telemetry::ExtTelemetry;
pub use window::ExtWindow;
pub use workspace::ExtWorkspace;
