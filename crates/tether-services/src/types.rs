//! Value shapes exchanged between service pairs.

use serde::{Deserialize, Serialize};
use tether_core::ResourceUri;

/// Severity of a user-facing notification or a diagnostic marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Informational.
    Info,
    /// A warning.
    Warning,
    /// An error.
    Error,
}

/// Presentation options attached to a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOptions {
    /// The extension that raised the notification, if attributed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Whether the notification should block until dismissed.
    #[serde(default)]
    pub modal: bool,
}

/// A diagnostic marker attached to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub message: String,
    /// Marker severity.
    pub severity: Severity,
    /// Optional marker code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One entry of a bulk diagnostics update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsEntry {
    /// The resource the markers attach to.
    pub uri: ResourceUri,
    /// The complete marker set for the resource; empty clears it.
    pub markers: Vec<Diagnostic>,
}

/// A root folder of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFolder {
    /// The folder root.
    pub uri: ResourceUri,
    /// Display name.
    pub name: String,
    /// Position among the workspace folders.
    pub index: u32,
}

/// A single text replacement of a workspace edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTextEdit {
    /// The resource to rewrite.
    pub uri: ResourceUri,
    /// The replacement contents.
    pub text: String,
}

/// A set of edits applied atomically across resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    /// The edits, in application order.
    pub edits: Vec<ResourceTextEdit>,
}

/// Presentation options for a long-running operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOptions {
    /// Title shown while the operation runs.
    pub title: String,
}

/// The kind of a language feature provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    /// Completion items.
    Completions,
    /// Hover contents.
    Hover,
    /// Document outline symbols.
    DocumentSymbols,
}

/// Restricts a feature provider to matching documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSelector {
    /// Match documents with this uri scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Match documents with this language id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// How much telemetry the host accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TelemetryLevel {
    /// No telemetry.
    Off,
    /// Errors only.
    Error,
    /// Errors and usage events.
    #[default]
    Usage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_options_omit_absent_source() {
        let options = MessageOptions {
            source: None,
            modal: true,
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "modal": true })
        );
    }

    #[test]
    fn severity_wire_names_are_camel_case() {
        assert_eq!(serde_json::to_value(Severity::Warning).unwrap(), json!("warning"));
        assert_eq!(
            serde_json::from_value::<FeatureKind>(json!("documentSymbols")).unwrap(),
            FeatureKind::DocumentSymbols
        );
    }
}
