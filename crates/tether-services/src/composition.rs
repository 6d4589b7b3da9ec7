//! The service composition root.
//!
//! Builds the channel pair, both protocol sides, and every service pair in a
//! fixed dependency order. Cross-side references go exclusively through
//! proxies obtained from the protocols; no object on one side holds a direct
//! reference to an object on the other.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tether_core::ExtensionDescriptor;
use tether_rpc::{MessageChannel, RpcProtocol, ServiceHandler, ServiceId};
use tether_vfs::ResourceBacking;
use tracing::{debug, info};

use crate::adapters::{BridgeCommands, DocumentsNotifier, ExtensionResourceLoader};
use crate::collaborators::HostCollaborators;
use crate::error::ServiceResult;
use crate::ext::{
    ExtBulkEdits, ExtClipboard, ExtCommands, ExtConfiguration, ExtDiagnostics,
    ExtDocumentContents, ExtDocuments, ExtLanguageFeatures, ExtLanguages, ExtMessages,
    ExtProgress, ExtTelemetry, ExtWindow, ExtWorkspace,
};
use crate::host::{
    HostBulkEdits, HostClipboard, HostCommands, HostConfiguration, HostDiagnostics,
    HostDocumentContents, HostLanguageFeatures, HostMessages, HostProgress, HostTelemetry,
    HostWindow, HostWorkspace,
};

/// Host endpoints that must be bound before composition completes.
#[must_use]
pub fn required_host_services() -> &'static [ServiceId] {
    &[
        ServiceId::HostCommands,
        ServiceId::HostWindow,
        ServiceId::HostMessages,
        ServiceId::HostDiagnostics,
        ServiceId::HostProgress,
        ServiceId::HostTelemetry,
        ServiceId::HostClipboard,
        ServiceId::HostConfiguration,
        ServiceId::HostWorkspace,
        ServiceId::HostBulkEdits,
        ServiceId::HostLanguageFeatures,
        ServiceId::HostDocumentContents,
    ]
}

/// Extension endpoints that must be bound before composition completes.
#[must_use]
pub fn required_extension_services() -> &'static [ServiceId] {
    &[
        ServiceId::ExtCommands,
        ServiceId::ExtWindow,
        ServiceId::ExtDocuments,
        ServiceId::ExtDiagnostics,
        ServiceId::ExtProgress,
        ServiceId::ExtTelemetry,
        ServiceId::ExtConfiguration,
        ServiceId::ExtWorkspace,
        ServiceId::ExtLanguages,
        ServiceId::ExtLanguageFeatures,
        ServiceId::ExtDocumentContents,
    ]
}

static GLOBAL: OnceLock<ServiceGraph> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());
static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// The fully composed bridge: both protocol sides and every service.
pub struct ServiceGraph {
    /// The extension this graph hosts.
    pub extension: ExtensionDescriptor,
    /// Host-side protocol instance.
    pub host_protocol: RpcProtocol,
    /// Extension-side protocol instance.
    pub ext_protocol: RpcProtocol,
    /// The collaborators backing the host endpoints.
    pub collaborators: HostCollaborators,

    /// Extension-side command registry.
    pub commands: Arc<ExtCommands>,
    /// Extension-side window state.
    pub window: Arc<ExtWindow>,
    /// Extension-side document mirror.
    pub documents: Arc<ExtDocuments>,
    /// Extension-side diagnostics publisher.
    pub diagnostics: Arc<ExtDiagnostics>,
    /// Extension-side progress reporter.
    pub progress: Arc<ExtProgress>,
    /// Extension-side telemetry forwarder.
    pub telemetry: Arc<ExtTelemetry>,
    /// Extension-side configuration surface.
    pub configuration: Arc<ExtConfiguration>,
    /// Extension-side workspace mirror.
    pub workspace: Arc<ExtWorkspace>,
    /// Extension-side language id mirror.
    pub languages: Arc<ExtLanguages>,
    /// Extension-side feature provider registry.
    pub language_features: Arc<ExtLanguageFeatures>,
    /// Extension-side content provider registry.
    pub document_contents: Arc<ExtDocumentContents>,
    /// Extension-side notification façade.
    pub messages: Arc<ExtMessages>,
    /// Extension-side clipboard façade.
    pub clipboard: Arc<ExtClipboard>,
    /// Extension-side workspace edit façade.
    pub bulk_edits: Arc<ExtBulkEdits>,

    /// Host endpoint resolving virtual document contents by scheme.
    pub host_contents: Arc<HostDocumentContents>,
    /// Host endpoint tracking feature registrations.
    pub host_features: Arc<HostLanguageFeatures>,

    /// Command execution shaped for host-side callers.
    pub bridge_commands: Arc<BridgeCommands>,
    /// Pushes document lifecycle events into the extension mirror.
    pub documents_notifier: Arc<DocumentsNotifier>,
    /// Extension resource reads over the virtual backing.
    pub resource_loader: Arc<ExtensionResourceLoader>,
}

impl ServiceGraph {
    /// Compose an isolated graph over the given collaborators.
    ///
    /// Registration follows a fixed dependency order: the host window and
    /// command endpoints are bound before any extension-side service that
    /// captures proxies to them; the remaining host endpoints follow. Both
    /// sides' required-id sets are asserted before the graph is returned, so
    /// a miscomposed graph is rejected before any call is issued.
    ///
    /// # Errors
    ///
    /// Returns [`tether_rpc::RpcError::DuplicateRegistration`] or
    /// [`tether_rpc::RpcError::MissingRequiredRegistration`] when the
    /// composition invariants are violated. Both are fatal; the graph must
    /// not be used.
    pub fn build(
        collaborators: HostCollaborators,
        extension: ExtensionDescriptor,
    ) -> ServiceResult<Self> {
        CONSTRUCTIONS.fetch_add(1, Ordering::Relaxed);
        debug!(extension = %extension.identifier.as_str(), "composing service graph");

        let (host_end, ext_end) = MessageChannel::pair();
        let host_protocol = RpcProtocol::new(host_end, "host");
        let ext_protocol = RpcProtocol::new(ext_end, "extension");

        // Window and command dispatch precede every extension-side service.
        host_protocol.register_local(Arc::new(HostWindow::new(Arc::clone(
            &collaborators.window,
        ))))?;
        host_protocol.register_local(Arc::new(HostCommands::new(
            Arc::clone(&collaborators.commands),
            host_protocol.proxy(ServiceId::ExtCommands),
        )))?;
        host_protocol.assert_registered(&[ServiceId::HostWindow, ServiceId::HostCommands])?;

        let commands = Arc::new(ExtCommands::new(ext_protocol.proxy(ServiceId::HostCommands)));
        let window = Arc::new(ExtWindow::new(ext_protocol.proxy(ServiceId::HostWindow)));
        let documents = Arc::new(ExtDocuments::new());
        let diagnostics = Arc::new(ExtDiagnostics::new(
            ext_protocol.proxy(ServiceId::HostDiagnostics),
        ));
        let progress = Arc::new(ExtProgress::new(ext_protocol.proxy(ServiceId::HostProgress)));
        let telemetry = Arc::new(ExtTelemetry::new(
            ext_protocol.proxy(ServiceId::HostTelemetry),
        ));
        let configuration = Arc::new(ExtConfiguration::new(
            ext_protocol.proxy(ServiceId::HostConfiguration),
        ));
        let workspace = Arc::new(ExtWorkspace::new(
            ext_protocol.proxy(ServiceId::HostWorkspace),
        ));
        let languages = Arc::new(ExtLanguages::new());
        let language_features = Arc::new(ExtLanguageFeatures::new(
            ext_protocol.proxy(ServiceId::HostLanguageFeatures),
        ));
        let document_contents = Arc::new(ExtDocumentContents::new(
            ext_protocol.proxy(ServiceId::HostDocumentContents),
        ));

        ext_protocol.register_local(Arc::clone(&commands) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&window) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&documents) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&diagnostics) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&progress) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&telemetry) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&configuration) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&workspace) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&languages) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&language_features) as Arc<dyn ServiceHandler>)?;
        ext_protocol.register_local(Arc::clone(&document_contents) as Arc<dyn ServiceHandler>)?;

        // Remaining host endpoints.
        host_protocol.register_local(Arc::new(HostMessages::new(Arc::clone(
            &collaborators.notifications,
        ))))?;
        host_protocol.register_local(Arc::new(HostDiagnostics::new(Arc::clone(
            &collaborators.markers,
        ))))?;
        host_protocol.register_local(Arc::new(HostProgress::new(Arc::clone(
            &collaborators.progress,
        ))))?;
        host_protocol.register_local(Arc::new(HostTelemetry::new(Arc::clone(
            &collaborators.telemetry,
        ))))?;
        host_protocol.register_local(Arc::new(HostClipboard::new(Arc::clone(
            &collaborators.clipboard,
        ))))?;
        host_protocol.register_local(Arc::new(HostConfiguration::new(
            Arc::clone(&collaborators.configuration),
            host_protocol.proxy(ServiceId::ExtConfiguration),
        )))?;
        host_protocol.register_local(Arc::new(HostWorkspace::new(Arc::clone(
            &collaborators.workspace,
        ))))?;
        host_protocol.register_local(Arc::new(HostBulkEdits::new(Arc::clone(
            &collaborators.bulk_edits,
        ))))?;
        let host_features = Arc::new(HostLanguageFeatures::new(
            host_protocol.proxy(ServiceId::ExtLanguageFeatures),
        ));
        host_protocol.register_local(Arc::clone(&host_features) as Arc<dyn ServiceHandler>)?;
        let host_contents = Arc::new(HostDocumentContents::new(
            host_protocol.proxy(ServiceId::ExtDocumentContents),
        ));
        host_protocol.register_local(Arc::clone(&host_contents) as Arc<dyn ServiceHandler>)?;

        host_protocol.assert_registered(required_host_services())?;
        ext_protocol.assert_registered(required_extension_services())?;

        // Initial state injection, before any call is issued.
        configuration.initialize(collaborators.configuration.snapshot());
        workspace.accept(collaborators.workspace.workspace_folders());

        let messages = Arc::new(ExtMessages::new(ext_protocol.proxy(ServiceId::HostMessages)));
        let clipboard = Arc::new(ExtClipboard::new(
            ext_protocol.proxy(ServiceId::HostClipboard),
        ));
        let bulk_edits = Arc::new(ExtBulkEdits::new(
            ext_protocol.proxy(ServiceId::HostBulkEdits),
        ));

        let bridge_commands = Arc::new(BridgeCommands::new(Arc::clone(&commands)));
        let documents_notifier = Arc::new(DocumentsNotifier::new(
            host_protocol.proxy(ServiceId::ExtDocuments),
        ));
        let resource_loader = Arc::new(ExtensionResourceLoader::new(Arc::new(
            ResourceBacking::new(),
        )));

        info!(extension = %extension.identifier.as_str(), "service graph composed");
        Ok(Self {
            extension,
            host_protocol,
            ext_protocol,
            collaborators,
            commands,
            window,
            documents,
            diagnostics,
            progress,
            telemetry,
            configuration,
            workspace,
            languages,
            language_features,
            document_contents,
            messages,
            clipboard,
            bulk_edits,
            host_contents,
            host_features,
            bridge_commands,
            documents_notifier,
            resource_loader,
        })
    }

    /// Compose an isolated graph over basic collaborators and the built-in
    /// extension descriptor.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ServiceGraph::build`].
    pub fn build_default() -> ServiceResult<Self> {
        Self::build(
            HostCollaborators::basic(),
            ExtensionDescriptor::builtin_default(),
        )
    }

    /// The process-wide graph.
    ///
    /// The first call composes the graph; every later call returns the same
    /// instance. Construction happens at most once per process.
    ///
    /// # Errors
    ///
    /// Propagates the composition failure of the first call; a failed
    /// composition is not cached, so a later call retries.
    pub fn global() -> ServiceResult<&'static Self> {
        if let Some(graph) = GLOBAL.get() {
            return Ok(graph);
        }
        let _guard = match INIT_LOCK.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(graph) = GLOBAL.get() {
            return Ok(graph);
        }
        let graph = Self::build_default()?;
        Ok(GLOBAL.get_or_init(|| graph))
    }

    /// Number of graphs composed so far in this process.
    #[must_use]
    pub fn constructions() -> usize {
        CONSTRUCTIONS.load(Ordering::Relaxed)
    }

    /// Resolve once both sides' pending outgoing calls have settled.
    pub async fn drain(&self) {
        self.host_protocol.drain().await;
        self.ext_protocol.drain().await;
    }
}

impl std::fmt::Debug for ServiceGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceGraph")
            .field("extension", &self.extension.identifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        BasicBulkEditService, BasicClipboardService, BasicCommandService,
        BasicConfigurationService, BasicMarkerStore, BasicNotificationService, MarkerStore,
        BasicProgressService, BasicTelemetrySink, BasicWindowOpener, BasicWorkspaceContext,
        ProgressEvent,
    };
    use crate::error::ServiceError;
    use crate::ext::FeatureProvider;
    use crate::types::{
        Diagnostic, DocumentSelector, FeatureKind, MessageOptions, ProgressOptions, Severity,
        WorkspaceFolder,
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tether_config::ConfigurationModel;
    use tether_core::ResourceUri;
    use tether_rpc::RpcError;
    use tether_vfs::StaticContent;

    struct Observed {
        notifications: Arc<BasicNotificationService>,
        markers: Arc<BasicMarkerStore>,
        progress: Arc<BasicProgressService>,
    }

    fn observed_collaborators(initial_config: ConfigurationModel) -> (HostCollaborators, Observed) {
        let notifications = Arc::new(BasicNotificationService::new());
        let markers = Arc::new(BasicMarkerStore::new());
        let progress = Arc::new(BasicProgressService::new());
        let collaborators = HostCollaborators {
            commands: Arc::new(BasicCommandService::new()),
            notifications: Arc::clone(&notifications) as _,
            progress: Arc::clone(&progress) as _,
            telemetry: Arc::new(BasicTelemetrySink::new()),
            clipboard: Arc::new(BasicClipboardService::new()),
            markers: Arc::clone(&markers) as _,
            configuration: Arc::new(BasicConfigurationService::new(initial_config)),
            workspace: Arc::new(BasicWorkspaceContext::new(vec![WorkspaceFolder {
                uri: ResourceUri::file("/workspace"),
                name: "workspace".to_string(),
                index: 0,
            }])),
            bulk_edits: Arc::new(BasicBulkEditService::new()),
            window: Arc::new(BasicWindowOpener::new()),
        };
        (
            collaborators,
            Observed {
                notifications,
                markers,
                progress,
            },
        )
    }

    fn graph() -> (ServiceGraph, Observed) {
        let (collaborators, observed) = observed_collaborators(ConfigurationModel::new(json!({
            "editor": { "fontSize": 14 }
        })));
        let graph = ServiceGraph::build(collaborators, ExtensionDescriptor::builtin_default())
            .expect("composition");
        (graph, observed)
    }

    #[tokio::test]
    async fn contributed_command_executes_end_to_end() {
        let (graph, _observed) = graph();
        graph
            .commands
            .register_command("cmd.echo", |mut args| {
                Ok(args.drain(..).next().unwrap_or(Value::Null))
            })
            .await
            .unwrap();

        let result = graph
            .commands
            .execute_command("cmd.echo", vec![json!("hello")])
            .await
            .unwrap();
        assert_eq!(result, json!("hello"));

        // Host-side callers resolve the same command through the façade.
        let via_host = graph
            .bridge_commands
            .execute_command("cmd.echo", vec![json!(7)])
            .await
            .unwrap();
        assert_eq!(via_host, json!(7));
    }

    #[tokio::test]
    async fn unknown_command_rejects_that_call_only() {
        let (graph, _observed) = graph();
        let err = graph
            .commands
            .execute_command("cmd.missing", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rpc(RpcError::HandlerFailure { .. })
        ));

        graph
            .commands
            .register_command("cmd.alive", |_| Ok(json!(true)))
            .await
            .unwrap();
        assert_eq!(
            graph
                .commands
                .execute_command("cmd.alive", Vec::new())
                .await
                .unwrap(),
            json!(true)
        );
    }

    #[tokio::test]
    async fn configuration_snapshot_is_seeded_and_follows_updates() {
        let (graph, _observed) = graph();
        assert!(graph.configuration.is_initialized());

        let provider = graph.configuration.config_provider().unwrap();
        assert_eq!(provider.get_value("editor.fontSize"), Some(json!(14)));

        graph
            .configuration
            .update_value("editor.fontSize", json!(18))
            .await
            .unwrap();

        // The previously obtained snapshot observes the change in place.
        assert_eq!(provider.get_value("editor.fontSize"), Some(json!(18)));
        assert!(provider.last_change().affects("editor.fontSize"));
        assert!(provider.last_change().affects("editor"));
        assert!(!provider.last_change().affects("files"));
    }

    #[tokio::test]
    async fn uninitialized_configuration_is_a_precondition_violation() {
        let (host_end, ext_end) = MessageChannel::pair();
        let _host = RpcProtocol::new(host_end, "host");
        let ext = RpcProtocol::new(ext_end, "extension");
        let configuration = ExtConfiguration::new(ext.proxy(ServiceId::HostConfiguration));

        let err = configuration.config_provider().unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Config(tether_config::ConfigError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn misordered_composition_fails_before_any_call() {
        let (host_end, ext_end) = MessageChannel::pair();
        let host = RpcProtocol::new(host_end, "host");
        let ext = RpcProtocol::new(ext_end, "extension");

        // Only the window endpoint is bound; the required set is not.
        host.register_local(Arc::new(HostWindow::new(Arc::new(BasicWindowOpener::new()))))
            .unwrap();
        let err = host.assert_registered(required_host_services()).unwrap_err();
        match err {
            RpcError::MissingRequiredRegistration { missing } => {
                assert!(missing.contains(&ServiceId::HostCommands));
                assert!(!missing.contains(&ServiceId::HostWindow));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = ext
            .assert_registered(required_extension_services())
            .unwrap_err();
        assert!(matches!(err, RpcError::MissingRequiredRegistration { .. }));
    }

    #[tokio::test]
    async fn notification_source_is_stripped() {
        let (graph, observed) = graph();
        let action = graph
            .messages
            .show_warning(
                "disk full",
                MessageOptions {
                    source: Some("tether.builtin".to_string()),
                    modal: false,
                },
            )
            .await
            .unwrap();
        assert!(action.is_none());

        let shown = observed.notifications.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, Severity::Warning);
        assert_eq!(shown[0].1, "disk full");
        assert!(shown[0].2.source.is_none());
    }

    #[tokio::test]
    async fn diagnostics_reach_the_marker_store() {
        let (graph, observed) = graph();
        let uri = ResourceUri::file("/workspace/main.rs");
        let marker = Diagnostic {
            message: "unused import".to_string(),
            severity: Severity::Warning,
            code: Some("W0611".to_string()),
        };

        graph
            .diagnostics
            .set("linter", &uri, vec![marker.clone()])
            .await
            .unwrap();
        assert_eq!(observed.markers.markers("linter", &uri), vec![marker]);

        graph.diagnostics.clear("linter").await.unwrap();
        assert!(observed.markers.markers("linter", &uri).is_empty());
    }

    #[tokio::test]
    async fn progress_brackets_are_observed_in_order() {
        let (graph, observed) = graph();
        let output = graph
            .progress
            .with_progress(
                ProgressOptions {
                    title: "indexing".to_string(),
                },
                async { 21usize.saturating_mul(2) },
            )
            .await
            .unwrap();
        assert_eq!(output, 42);

        let events = observed.progress.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ProgressEvent::Started { .. }));
        assert!(matches!(events[1], ProgressEvent::Ended { .. }));
    }

    #[tokio::test]
    async fn virtual_document_contents_resolve_by_scheme() {
        let (graph, _observed) = graph();
        graph
            .document_contents
            .register_content_provider("preview", Arc::new(StaticContent::new("# rendered")))
            .await
            .unwrap();

        let uri = ResourceUri::new("preview", "/readme");
        let text = graph.host_contents.resolve_content(&uri).await.unwrap();
        assert_eq!(text, "# rendered");

        let err = graph
            .host_contents
            .resolve_content(&ResourceUri::new("unknown", "/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoContentProvider { .. }));
    }

    #[tokio::test]
    async fn feature_providers_resolve_through_the_host() {
        struct Outline;

        #[async_trait]
        impl FeatureProvider for Outline {
            async fn provide(&self, uri: &ResourceUri) -> crate::error::ServiceResult<Value> {
                Ok(json!([format!("symbols of {uri}")]))
            }
        }

        let (graph, _observed) = graph();
        let handle = graph
            .language_features
            .register_provider(
                FeatureKind::DocumentSymbols,
                DocumentSelector {
                    scheme: Some("file".to_string()),
                    language: None,
                },
                Arc::new(Outline),
            )
            .await
            .unwrap();

        assert_eq!(
            graph.host_features.handles_of(FeatureKind::DocumentSymbols),
            vec![handle]
        );

        let uri = ResourceUri::file("/workspace/main.rs");
        let value = graph.host_features.provide(handle, &uri).await.unwrap();
        assert_eq!(value, json!(["symbols of file:///workspace/main.rs"]));

        graph
            .language_features
            .unregister_provider(handle)
            .await
            .unwrap();
        assert!(
            graph
                .host_features
                .handles_of(FeatureKind::DocumentSymbols)
                .is_empty()
        );
    }

    #[tokio::test]
    async fn document_lifecycle_reaches_the_extension_mirror() {
        let (graph, _observed) = graph();
        let uri = ResourceUri::file("/workspace/lib.rs");

        graph
            .documents_notifier
            .notify_opened(&uri, "fn lib() {}")
            .await
            .unwrap();
        assert_eq!(graph.documents.text(&uri).as_deref(), Some("fn lib() {}"));

        graph.documents_notifier.notify_closed(&uri).await.unwrap();
        assert!(graph.documents.text(&uri).is_none());
    }

    #[tokio::test]
    async fn workspace_folders_are_seeded_and_refreshable() {
        let (graph, _observed) = graph();
        let seeded = graph.workspace.workspace_folders();
        assert_eq!(seeded.len(), 1);
        assert_eq!(seeded[0].name, "workspace");

        let refreshed = graph.workspace.refresh().await.unwrap();
        assert_eq!(refreshed, seeded);
    }

    #[tokio::test]
    async fn global_graph_is_constructed_at_most_once() {
        let first = ServiceGraph::global().unwrap();
        let constructions_after_first = ServiceGraph::constructions();

        let second = ServiceGraph::global().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(ServiceGraph::constructions(), constructions_after_first);
    }

    #[tokio::test]
    async fn drain_resolves_on_idle_graph() {
        let (graph, _observed) = graph();
        graph
            .commands
            .register_command("cmd.noop", |_| Ok(Value::Null))
            .await
            .unwrap();
        graph
            .commands
            .execute_command("cmd.noop", Vec::new())
            .await
            .unwrap();
        graph.drain().await;
        assert_eq!(graph.host_protocol.pending_calls(), 0);
        assert_eq!(graph.ext_protocol.pending_calls(), 0);
    }
}
