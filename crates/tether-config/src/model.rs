//! Configuration snapshot contents and change deltas.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// The merged configuration contents at a point in time.
///
/// Contents are a nested JSON object addressed by dotted keys
/// (`"editor.fontSize"` resolves `contents["editor"]["fontSize"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationModel {
    contents: Value,
}

impl ConfigurationModel {
    /// Create a model from its nested contents.
    #[must_use]
    pub fn new(contents: Value) -> Self {
        Self { contents }
    }

    /// Look up a value by dotted key.
    ///
    /// An empty key returns the full contents.
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return Some(&self.contents);
        }
        let mut current = &self.contents;
        for segment in key.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// The full nested contents.
    #[must_use]
    pub fn contents(&self) -> &Value {
        &self.contents
    }

    /// Set the value at a dotted key, creating intermediate objects.
    ///
    /// Non-object values along the path are replaced. An empty key replaces
    /// the full contents.
    pub fn set_value(&mut self, key: &str, value: Value) {
        if key.is_empty() {
            self.contents = value;
            return;
        }
        let (prefix, last) = match key.rsplit_once('.') {
            Some((prefix, last)) => (Some(prefix), last),
            None => (None, key),
        };
        let mut current = &mut self.contents;
        for segment in prefix.into_iter().flat_map(|p| p.split('.')) {
            if !current.is_object() {
                *current = Value::Object(serde_json::Map::new());
            }
            let Value::Object(map) = current else {
                return;
            };
            current = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }
    }
}

impl Default for ConfigurationModel {
    fn default() -> Self {
        Self {
            contents: Value::Object(serde_json::Map::new()),
        }
    }
}

/// The set of keys affected by a configuration change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDelta {
    /// Dotted keys whose effective value changed.
    pub keys: Vec<String>,
}

impl ConfigurationDelta {
    /// Create a delta from its affected keys.
    #[must_use]
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }

    /// Whether the delta affects `key` or one of its sub-keys.
    #[must_use]
    pub fn affects(&self, key: &str) -> bool {
        let affected = self.keys.iter().any(|changed| {
            changed == key
                || key
                    .strip_prefix(changed.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
                || changed
                    .strip_prefix(key)
                    .is_some_and(|rest| rest.starts_with('.'))
        });
        trace!(key, affected, "configuration delta query");
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> ConfigurationModel {
        ConfigurationModel::new(json!({
            "editor": { "fontSize": 14, "minimap": { "enabled": true } },
            "files": { "autoSave": "off" }
        }))
    }

    #[test]
    fn dotted_key_lookup() {
        let model = model();
        assert_eq!(model.get_value("editor.fontSize"), Some(&json!(14)));
        assert_eq!(
            model.get_value("editor.minimap.enabled"),
            Some(&json!(true))
        );
        assert_eq!(model.get_value("files.autoSave"), Some(&json!("off")));
        assert!(model.get_value("editor.missing").is_none());
        assert!(model.get_value("editor.fontSize.deeper").is_none());
    }

    #[test]
    fn empty_key_returns_contents() {
        let model = model();
        assert_eq!(model.get_value(""), Some(model.contents()));
    }

    #[test]
    fn set_value_creates_intermediate_objects() {
        let mut model = ConfigurationModel::default();
        model.set_value("editor.minimap.enabled", json!(false));
        assert_eq!(model.get_value("editor.minimap.enabled"), Some(&json!(false)));

        model.set_value("editor.fontSize", json!(12));
        assert_eq!(model.get_value("editor.fontSize"), Some(&json!(12)));
        assert_eq!(model.get_value("editor.minimap.enabled"), Some(&json!(false)));
    }

    #[test]
    fn set_value_replaces_scalar_on_path() {
        let mut model = ConfigurationModel::new(json!({ "a": 1 }));
        model.set_value("a.b", json!(2));
        assert_eq!(model.get_value("a.b"), Some(&json!(2)));
    }

    #[test]
    fn delta_affects_key_and_subtree() {
        let delta = ConfigurationDelta::new(vec!["editor.minimap".to_string()]);
        assert!(delta.affects("editor.minimap"));
        assert!(delta.affects("editor.minimap.enabled"));
        assert!(delta.affects("editor"));
        assert!(!delta.affects("files"));
        assert!(!delta.affects("editor.minimapWidth"));
    }
}
