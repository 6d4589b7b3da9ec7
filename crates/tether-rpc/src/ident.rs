//! Typed service identifiers.
//!
//! The original design keyed endpoints by a `{name, numeric id}` pair built
//! at runtime. Here the full set of logical endpoints is a closed enum, so a
//! proxy to a nonexistent capability is unrepresentable and the registry is
//! checked at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the simulated process boundary a service lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The host (main thread) side.
    Host,
    /// The extension side.
    Extension,
}

/// Identifier of a logical endpoint on the bridge.
///
/// `Host*` services are bound on the host-side protocol, `Ext*` services on
/// the extension-side protocol. The serialized form doubles as the wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceId {
    /// Host-side command dispatch.
    HostCommands,
    /// Host-side window control.
    HostWindow,
    /// Host-side user notifications.
    HostMessages,
    /// Host-side diagnostics sink.
    HostDiagnostics,
    /// Host-side progress reporting.
    HostProgress,
    /// Host-side telemetry sink.
    HostTelemetry,
    /// Host-side clipboard access.
    HostClipboard,
    /// Host-side configuration writes.
    HostConfiguration,
    /// Host-side workspace queries.
    HostWorkspace,
    /// Host-side bulk edit application.
    HostBulkEdits,
    /// Host-side language feature registrations.
    HostLanguageFeatures,
    /// Host-side virtual document content registry.
    HostDocumentContents,

    /// Extension-side command registry.
    ExtCommands,
    /// Extension-side window state.
    ExtWindow,
    /// Extension-side open document tracking.
    ExtDocuments,
    /// Extension-side diagnostics collections.
    ExtDiagnostics,
    /// Extension-side progress tasks.
    ExtProgress,
    /// Extension-side telemetry state.
    ExtTelemetry,
    /// Extension-side configuration bridge.
    ExtConfiguration,
    /// Extension-side workspace state.
    ExtWorkspace,
    /// Extension-side language id tracking.
    ExtLanguages,
    /// Extension-side language feature providers.
    ExtLanguageFeatures,
    /// Extension-side virtual document content providers.
    ExtDocumentContents,
}

impl ServiceId {
    /// The wire name of this endpoint.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::HostCommands => "hostCommands",
            Self::HostWindow => "hostWindow",
            Self::HostMessages => "hostMessages",
            Self::HostDiagnostics => "hostDiagnostics",
            Self::HostProgress => "hostProgress",
            Self::HostTelemetry => "hostTelemetry",
            Self::HostClipboard => "hostClipboard",
            Self::HostConfiguration => "hostConfiguration",
            Self::HostWorkspace => "hostWorkspace",
            Self::HostBulkEdits => "hostBulkEdits",
            Self::HostLanguageFeatures => "hostLanguageFeatures",
            Self::HostDocumentContents => "hostDocumentContents",
            Self::ExtCommands => "extCommands",
            Self::ExtWindow => "extWindow",
            Self::ExtDocuments => "extDocuments",
            Self::ExtDiagnostics => "extDiagnostics",
            Self::ExtProgress => "extProgress",
            Self::ExtTelemetry => "extTelemetry",
            Self::ExtConfiguration => "extConfiguration",
            Self::ExtWorkspace => "extWorkspace",
            Self::ExtLanguages => "extLanguages",
            Self::ExtLanguageFeatures => "extLanguageFeatures",
            Self::ExtDocumentContents => "extDocumentContents",
        }
    }

    /// Which side of the bridge this endpoint is bound on.
    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Self::HostCommands
            | Self::HostWindow
            | Self::HostMessages
            | Self::HostDiagnostics
            | Self::HostProgress
            | Self::HostTelemetry
            | Self::HostClipboard
            | Self::HostConfiguration
            | Self::HostWorkspace
            | Self::HostBulkEdits
            | Self::HostLanguageFeatures
            | Self::HostDocumentContents => Side::Host,
            Self::ExtCommands
            | Self::ExtWindow
            | Self::ExtDocuments
            | Self::ExtDiagnostics
            | Self::ExtProgress
            | Self::ExtTelemetry
            | Self::ExtConfiguration
            | Self::ExtWorkspace
            | Self::ExtLanguages
            | Self::ExtLanguageFeatures
            | Self::ExtDocumentContents => Side::Extension,
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_matches_serde_form() {
        let json = serde_json::to_string(&ServiceId::HostCommands).unwrap();
        assert_eq!(json, "\"hostCommands\"");
        assert_eq!(ServiceId::HostCommands.name(), "hostCommands");

        let json = serde_json::to_string(&ServiceId::ExtLanguageFeatures).unwrap();
        assert_eq!(json, "\"extLanguageFeatures\"");
    }

    #[test]
    fn sides() {
        assert_eq!(ServiceId::HostWindow.side(), Side::Host);
        assert_eq!(ServiceId::ExtConfiguration.side(), Side::Extension);
    }
}
