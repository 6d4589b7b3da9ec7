//! The synchronous configuration bridge.
//!
//! A synchronous variant of an otherwise-asynchronous configuration
//! provider: instead of gating reads behind a readiness barrier, the bridge
//! exposes two states. Uninitialized (no snapshot) transitions to
//! Initialized on [`SyncConfiguration::initialize_configuration`]; reads
//! before that point are a contract violation, not a recoverable condition.

use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigurationDelta, ConfigurationModel};
use crate::provider::ConfigProvider;

/// Holds the current configuration snapshot for the extension side.
pub struct SyncConfiguration {
    provider: RwLock<Option<Arc<ConfigProvider>>>,
}

impl SyncConfiguration {
    /// Create the bridge in the Uninitialized state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: RwLock::new(None),
        }
    }

    /// Whether a snapshot is present.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        let provider = match self.provider.read() {
            Ok(provider) => provider,
            Err(poisoned) => poisoned.into_inner(),
        };
        provider.is_some()
    }

    /// Transition Uninitialized → Initialized by constructing the snapshot.
    ///
    /// Re-initialization replaces the snapshot.
    pub fn initialize_configuration(&self, model: ConfigurationModel) -> Arc<ConfigProvider> {
        debug!("configuration initialized");
        let created = Arc::new(ConfigProvider::new(model));
        let mut provider = match self.provider.write() {
            Ok(provider) => provider,
            Err(poisoned) => poisoned.into_inner(),
        };
        *provider = Some(Arc::clone(&created));
        created
    }

    /// Apply a change delta to the existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotInitialized`] when called in the
    /// Uninitialized state; change notifications are only valid after
    /// initialization.
    pub fn accept_configuration_changed(
        &self,
        model: ConfigurationModel,
        delta: ConfigurationDelta,
    ) -> ConfigResult<()> {
        self.config_provider()?.apply_change(model, delta);
        Ok(())
    }

    /// The current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotInitialized`] when called in the
    /// Uninitialized state. Callers are contractually required to have
    /// awaited initialization first.
    pub fn config_provider(&self) -> ConfigResult<Arc<ConfigProvider>> {
        let provider = match self.provider.read() {
            Ok(provider) => provider,
            Err(poisoned) => poisoned.into_inner(),
        };
        provider.as_ref().map(Arc::clone).ok_or(ConfigError::NotInitialized)
    }
}

impl Default for SyncConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyncConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfiguration")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_before_initialize_is_precondition_violation() {
        let bridge = SyncConfiguration::new();
        assert!(!bridge.is_initialized());
        assert!(matches!(
            bridge.config_provider(),
            Err(ConfigError::NotInitialized)
        ));
    }

    #[test]
    fn change_before_initialize_is_rejected() {
        let bridge = SyncConfiguration::new();
        let err = bridge
            .accept_configuration_changed(
                ConfigurationModel::default(),
                ConfigurationDelta::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotInitialized));
    }

    #[test]
    fn initialize_then_read_then_change() {
        let bridge = SyncConfiguration::new();
        bridge.initialize_configuration(ConfigurationModel::new(json!({
            "editor": { "tabSize": 4 }
        })));

        let provider = bridge.config_provider().unwrap();
        assert_eq!(provider.get_value("editor.tabSize"), Some(json!(4)));

        bridge
            .accept_configuration_changed(
                ConfigurationModel::new(json!({ "editor": { "tabSize": 2 } })),
                ConfigurationDelta::new(vec!["editor.tabSize".to_string()]),
            )
            .unwrap();

        // The snapshot is mutated in place: the previously obtained provider
        // observes the change.
        assert_eq!(provider.get_value("editor.tabSize"), Some(json!(2)));
    }

    #[test]
    fn reinitialization_replaces_snapshot() {
        let bridge = SyncConfiguration::new();
        bridge.initialize_configuration(ConfigurationModel::new(json!({ "a": 1 })));
        bridge.initialize_configuration(ConfigurationModel::new(json!({ "a": 2 })));

        let provider = bridge.config_provider().unwrap();
        assert_eq!(provider.get_value("a"), Some(json!(2)));
    }
}
