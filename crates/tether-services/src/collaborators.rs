//! Host-side collaborator seams.
//!
//! Host handlers never talk to the platform directly; they go through the
//! narrow traits defined here. The `Basic*` implementations back the default
//! composition and keep everything in memory, which also makes them the
//! observation points for tests.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::{Arc, Mutex, RwLock};
use tether_config::ConfigurationModel;
use tether_core::ResourceUri;
use tracing::{debug, trace};

use crate::error::{ServiceError, ServiceResult};
use crate::types::{
    Diagnostic, MessageOptions, ProgressOptions, Severity, WorkspaceEdit, WorkspaceFolder,
};

fn read_or_recover<'a, T>(lock: &'a RwLock<T>) -> std::sync::RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_or_recover<'a, T>(lock: &'a RwLock<T>) -> std::sync::RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn lock_or_recover<'a, T>(lock: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Executes host-owned commands.
#[async_trait]
pub trait CommandService: Send + Sync {
    /// Run the command registered under `id` with `args`.
    async fn execute_command(&self, id: &str, args: Vec<Value>) -> ServiceResult<Value>;

    /// Identifiers of all host-owned commands.
    fn command_ids(&self) -> Vec<String>;
}

/// Shows user-facing notifications.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Show a notification, returning the chosen action if any.
    async fn show_message(
        &self,
        severity: Severity,
        message: &str,
        options: MessageOptions,
    ) -> ServiceResult<Option<String>>;
}

/// Renders long-running operation progress.
pub trait ProgressService: Send + Sync {
    /// An operation identified by `handle` started.
    fn start(&self, handle: u64, options: ProgressOptions);
    /// The operation posted an intermediate message.
    fn report(&self, handle: u64, message: String);
    /// The operation finished.
    fn end(&self, handle: u64);
}

/// Receives telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Record one event with its payload.
    fn publish(&self, event: &str, data: Value);
}

/// System clipboard access.
#[async_trait]
pub trait ClipboardService: Send + Sync {
    /// Current clipboard text.
    async fn read_text(&self) -> ServiceResult<String>;
    /// Replace the clipboard text.
    async fn write_text(&self, text: String) -> ServiceResult<()>;
}

/// Owns diagnostic markers per resource and owner.
pub trait MarkerStore: Send + Sync {
    /// Replace the markers `owner` attached to `uri`; empty removes them.
    fn change(&self, owner: &str, uri: &ResourceUri, markers: Vec<Diagnostic>);
    /// Remove every marker attributed to `owner`.
    fn clear(&self, owner: &str);
    /// Markers `owner` attached to `uri`.
    fn markers(&self, owner: &str, uri: &ResourceUri) -> Vec<Diagnostic>;
}

/// The host-side configuration registry.
pub trait ConfigurationService: Send + Sync {
    /// The current merged configuration.
    fn snapshot(&self) -> ConfigurationModel;
    /// Set a single option by dotted key.
    fn update_value(&self, key: &str, value: Value) -> ServiceResult<()>;
}

/// Describes the open workspace.
pub trait WorkspaceContext: Send + Sync {
    /// The workspace root folders, in order.
    fn workspace_folders(&self) -> Vec<WorkspaceFolder>;
}

/// Applies multi-resource edits.
#[async_trait]
pub trait BulkEditService: Send + Sync {
    /// Apply `edit`; returns whether it was applied in full.
    async fn apply(&self, edit: WorkspaceEdit) -> ServiceResult<bool>;
}

/// Opens external resources on behalf of extensions.
#[async_trait]
pub trait WindowOpener: Send + Sync {
    /// Open `url` outside the workbench; returns whether a handler accepted it.
    async fn open_external(&self, url: &str) -> ServiceResult<bool>;
}

/// The full set of host collaborators a composition needs.
#[derive(Clone)]
pub struct HostCollaborators {
    /// Host-owned command execution.
    pub commands: Arc<dyn CommandService>,
    /// User-facing notifications.
    pub notifications: Arc<dyn NotificationService>,
    /// Progress rendering.
    pub progress: Arc<dyn ProgressService>,
    /// Telemetry events.
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Clipboard access.
    pub clipboard: Arc<dyn ClipboardService>,
    /// Diagnostic markers.
    pub markers: Arc<dyn MarkerStore>,
    /// Configuration registry.
    pub configuration: Arc<dyn ConfigurationService>,
    /// Workspace description.
    pub workspace: Arc<dyn WorkspaceContext>,
    /// Multi-resource edits.
    pub bulk_edits: Arc<dyn BulkEditService>,
    /// External openers.
    pub window: Arc<dyn WindowOpener>,
}

impl HostCollaborators {
    /// Collaborators backed by the in-memory `Basic*` implementations.
    #[must_use]
    pub fn basic() -> Self {
        Self {
            commands: Arc::new(BasicCommandService::new()),
            notifications: Arc::new(BasicNotificationService::new()),
            progress: Arc::new(BasicProgressService::new()),
            telemetry: Arc::new(BasicTelemetrySink::new()),
            clipboard: Arc::new(BasicClipboardService::new()),
            markers: Arc::new(BasicMarkerStore::new()),
            configuration: Arc::new(BasicConfigurationService::new(ConfigurationModel::default())),
            workspace: Arc::new(BasicWorkspaceContext::new(Vec::new())),
            bulk_edits: Arc::new(BasicBulkEditService::new()),
            window: Arc::new(BasicWindowOpener::new()),
        }
    }
}

impl std::fmt::Debug for HostCollaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostCollaborators").finish_non_exhaustive()
    }
}

/// Synchronous command body stored by [`BasicCommandService`].
pub type CommandFn = Arc<dyn Fn(Vec<Value>) -> ServiceResult<Value> + Send + Sync>;

/// In-memory command registry.
#[derive(Default)]
pub struct BasicCommandService {
    commands: DashMap<String, CommandFn>,
}

impl BasicCommandService {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host command.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::CommandExists`] when `id` is taken.
    pub fn register<F>(&self, id: &str, body: F) -> ServiceResult<()>
    where
        F: Fn(Vec<Value>) -> ServiceResult<Value> + Send + Sync + 'static,
    {
        match self.commands.entry(id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(ServiceError::CommandExists {
                id: id.to_string(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(body));
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CommandService for BasicCommandService {
    async fn execute_command(&self, id: &str, args: Vec<Value>) -> ServiceResult<Value> {
        let body = self
            .commands
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ServiceError::UnknownCommand { id: id.to_string() })?;
        trace!(command = id, "executing host command");
        body(args)
    }

    fn command_ids(&self) -> Vec<String> {
        self.commands.iter().map(|entry| entry.key().clone()).collect()
    }
}

/// Records notifications instead of rendering them.
#[derive(Default)]
pub struct BasicNotificationService {
    shown: Mutex<Vec<(Severity, String, MessageOptions)>>,
}

impl BasicNotificationService {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification shown so far.
    #[must_use]
    pub fn shown(&self) -> Vec<(Severity, String, MessageOptions)> {
        lock_or_recover(&self.shown).clone()
    }
}

#[async_trait]
impl NotificationService for BasicNotificationService {
    async fn show_message(
        &self,
        severity: Severity,
        message: &str,
        options: MessageOptions,
    ) -> ServiceResult<Option<String>> {
        debug!(?severity, message, "notification");
        lock_or_recover(&self.shown).push((severity, message.to_string(), options));
        Ok(None)
    }
}

/// One observed progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// An operation started.
    Started {
        /// Operation handle.
        handle: u64,
        /// Display title.
        title: String,
    },
    /// An operation posted a message.
    Reported {
        /// Operation handle.
        handle: u64,
        /// The message.
        message: String,
    },
    /// An operation finished.
    Ended {
        /// Operation handle.
        handle: u64,
    },
}

/// Records progress events in order.
#[derive(Default)]
pub struct BasicProgressService {
    events: Mutex<Vec<ProgressEvent>>,
}

impl BasicProgressService {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events observed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        lock_or_recover(&self.events).clone()
    }
}

impl ProgressService for BasicProgressService {
    fn start(&self, handle: u64, options: ProgressOptions) {
        lock_or_recover(&self.events).push(ProgressEvent::Started {
            handle,
            title: options.title,
        });
    }

    fn report(&self, handle: u64, message: String) {
        lock_or_recover(&self.events).push(ProgressEvent::Reported { handle, message });
    }

    fn end(&self, handle: u64) {
        lock_or_recover(&self.events).push(ProgressEvent::Ended { handle });
    }
}

/// Records telemetry events.
#[derive(Default)]
pub struct BasicTelemetrySink {
    events: Mutex<Vec<(String, Value)>>,
}

impl BasicTelemetrySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Value)> {
        lock_or_recover(&self.events).clone()
    }
}

impl TelemetrySink for BasicTelemetrySink {
    fn publish(&self, event: &str, data: Value) {
        trace!(event, "telemetry");
        lock_or_recover(&self.events).push((event.to_string(), data));
    }
}

/// In-memory clipboard.
#[derive(Default)]
pub struct BasicClipboardService {
    text: RwLock<String>,
}

impl BasicClipboardService {
    /// Create an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClipboardService for BasicClipboardService {
    async fn read_text(&self) -> ServiceResult<String> {
        Ok(read_or_recover(&self.text).clone())
    }

    async fn write_text(&self, text: String) -> ServiceResult<()> {
        *write_or_recover(&self.text) = text;
        Ok(())
    }
}

/// In-memory marker store keyed by owner and resource.
#[derive(Default)]
pub struct BasicMarkerStore {
    markers: DashMap<(String, String), Vec<Diagnostic>>,
}

impl BasicMarkerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for BasicMarkerStore {
    fn change(&self, owner: &str, uri: &ResourceUri, markers: Vec<Diagnostic>) {
        let key = (owner.to_string(), uri.to_string());
        if markers.is_empty() {
            self.markers.remove(&key);
        } else {
            self.markers.insert(key, markers);
        }
    }

    fn clear(&self, owner: &str) {
        self.markers.retain(|(existing, _), _| existing != owner);
    }

    fn markers(&self, owner: &str, uri: &ResourceUri) -> Vec<Diagnostic> {
        self.markers
            .get(&(owner.to_string(), uri.to_string()))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

/// In-memory configuration registry.
pub struct BasicConfigurationService {
    model: RwLock<ConfigurationModel>,
}

impl BasicConfigurationService {
    /// Create a registry seeded with `model`.
    #[must_use]
    pub fn new(model: ConfigurationModel) -> Self {
        Self {
            model: RwLock::new(model),
        }
    }
}

impl ConfigurationService for BasicConfigurationService {
    fn snapshot(&self) -> ConfigurationModel {
        read_or_recover(&self.model).clone()
    }

    fn update_value(&self, key: &str, value: Value) -> ServiceResult<()> {
        debug!(key, "configuration option updated");
        write_or_recover(&self.model).set_value(key, value);
        Ok(())
    }
}

/// Fixed workspace description.
pub struct BasicWorkspaceContext {
    folders: Vec<WorkspaceFolder>,
}

impl BasicWorkspaceContext {
    /// Create a workspace with the given root folders.
    #[must_use]
    pub fn new(folders: Vec<WorkspaceFolder>) -> Self {
        Self { folders }
    }
}

impl WorkspaceContext for BasicWorkspaceContext {
    fn workspace_folders(&self) -> Vec<WorkspaceFolder> {
        self.folders.clone()
    }
}

/// Records applied workspace edits and accepts them all.
#[derive(Default)]
pub struct BasicBulkEditService {
    applied: Mutex<Vec<WorkspaceEdit>>,
}

impl BasicBulkEditService {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Edits applied so far.
    #[must_use]
    pub fn applied(&self) -> Vec<WorkspaceEdit> {
        lock_or_recover(&self.applied).clone()
    }
}

#[async_trait]
impl BulkEditService for BasicBulkEditService {
    async fn apply(&self, edit: WorkspaceEdit) -> ServiceResult<bool> {
        lock_or_recover(&self.applied).push(edit);
        Ok(true)
    }
}

/// Records opened urls and accepts them all.
#[derive(Default)]
pub struct BasicWindowOpener {
    opened: Mutex<Vec<String>>,
}

impl BasicWindowOpener {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Urls opened so far.
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        lock_or_recover(&self.opened).clone()
    }
}

#[async_trait]
impl WindowOpener for BasicWindowOpener {
    async fn open_external(&self, url: &str) -> ServiceResult<bool> {
        debug!(url, "open external");
        lock_or_recover(&self.opened).push(url.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn command_registry_executes_and_rejects_duplicates() {
        let service = BasicCommandService::new();
        service
            .register("host.version", |_args| Ok(json!("1.0")))
            .unwrap();

        let err = service.register("host.version", |_args| Ok(Value::Null));
        assert!(matches!(err, Err(ServiceError::CommandExists { .. })));

        let out = service.execute_command("host.version", vec![]).await.unwrap();
        assert_eq!(out, json!("1.0"));

        let missing = service.execute_command("host.missing", vec![]).await;
        assert!(matches!(missing, Err(ServiceError::UnknownCommand { .. })));
    }

    #[test]
    fn marker_store_change_and_clear() {
        let store = BasicMarkerStore::new();
        let uri: ResourceUri = "file:///a.rs".parse().unwrap();
        let marker = Diagnostic {
            message: "unused variable".to_string(),
            severity: Severity::Warning,
            code: None,
        };

        store.change("linter", &uri, vec![marker.clone()]);
        assert_eq!(store.markers("linter", &uri), vec![marker]);

        store.change("linter", &uri, Vec::new());
        assert!(store.markers("linter", &uri).is_empty());

        store.change("linter", &uri, vec![Diagnostic {
            message: "x".to_string(),
            severity: Severity::Error,
            code: Some("E1".to_string()),
        }]);
        store.clear("linter");
        assert!(store.markers("linter", &uri).is_empty());
    }
}
