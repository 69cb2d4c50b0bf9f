use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{WidgetError, WidgetResult};

/// A value held by the shared preference store.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    Str(String),
}

impl From<bool> for PrefValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PrefValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for PrefValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Key/value store shared between the widget and the app that configures it.
pub trait PreferenceStore {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<PrefValue>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: PrefValue);

    /// String under `key`, or `default` when missing or not a string.
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(PrefValue::Str(s)) => s,
            None => default.to_string(),
            Some(other) => {
                tracing::warn!(key, ?other, "preference is not a string, using default");
                default.to_string()
            }
        }
    }

    /// Integer under `key`, or `default` when missing or not an integer.
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(PrefValue::Int(v)) => v,
            None => default,
            Some(other) => {
                tracing::warn!(key, ?other, "preference is not an integer, using default");
                default
            }
        }
    }

    /// Boolean under `key`, or `default` when missing or not a boolean.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(PrefValue::Bool(v)) => v,
            None => default,
            Some(other) => {
                tracing::warn!(key, ?other, "preference is not a boolean, using default");
                default
            }
        }
    }
}

/// In-memory preference store with a flat JSON object representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MemoryPrefs {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPrefs {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `key: value` pairs.
    pub fn from_json_str(s: &str) -> WidgetResult<Self> {
        serde_json::from_str(s).map_err(|e| WidgetError::serde(e.to_string()))
    }

    /// Serialize as a pretty JSON object (keys sorted).
    pub fn to_json_string(&self) -> WidgetResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WidgetError::serde(e.to_string()))
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> WidgetResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read preferences '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Write to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> WidgetResult<()> {
        let path = path.as_ref();
        let s = self.to_json_string()?;
        std::fs::write(path, s)
            .with_context(|| format!("write preferences '{}'", path.display()))?;
        Ok(())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store has no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: PrefValue) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/prefs.rs"]
mod tests;
