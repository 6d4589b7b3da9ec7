//! The live configuration snapshot.

use serde_json::Value;
use std::sync::RwLock;
use tracing::debug;

use crate::model::{ConfigurationDelta, ConfigurationModel};

/// A point-in-time configuration snapshot, mutated in place by change
/// notifications.
pub struct ConfigProvider {
    model: RwLock<ConfigurationModel>,
    last_change: RwLock<ConfigurationDelta>,
}

impl ConfigProvider {
    /// Create a provider from the initial snapshot.
    #[must_use]
    pub fn new(model: ConfigurationModel) -> Self {
        Self {
            model: RwLock::new(model),
            last_change: RwLock::new(ConfigurationDelta::default()),
        }
    }

    /// Look up a value by dotted key in the current snapshot.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let model = match self.model.read() {
            Ok(model) => model,
            Err(poisoned) => poisoned.into_inner(),
        };
        model.get_value(key).cloned()
    }

    /// Replace the snapshot with `model`, recording the delta.
    pub fn apply_change(&self, model: ConfigurationModel, delta: ConfigurationDelta) {
        debug!(changed = delta.keys.len(), "configuration changed");
        {
            let mut current = match self.model.write() {
                Ok(current) => current,
                Err(poisoned) => poisoned.into_inner(),
            };
            *current = model;
        }
        let mut last = match self.last_change.write() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last = delta;
    }

    /// The delta recorded by the most recent change, if any.
    #[must_use]
    pub fn last_change(&self) -> ConfigurationDelta {
        let last = match self.last_change.read() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        last.clone()
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_reflect_applied_change() {
        let provider = ConfigProvider::new(ConfigurationModel::new(json!({
            "editor": { "fontSize": 14 }
        })));
        assert_eq!(provider.get_value("editor.fontSize"), Some(json!(14)));

        provider.apply_change(
            ConfigurationModel::new(json!({ "editor": { "fontSize": 16 } })),
            ConfigurationDelta::new(vec!["editor.fontSize".to_string()]),
        );

        assert_eq!(provider.get_value("editor.fontSize"), Some(json!(16)));
        assert!(provider.last_change().affects("editor.fontSize"));
    }
}
