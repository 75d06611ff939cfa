//! Per-control layout persistence over a single store key
//!
//! The whole layout lives in one JSON object under one key, mapping control
//! id to [`ControlLayoutEntry`]. Reads fail open: a missing, unreadable or
//! malformed blob means "no overrides", and a malformed entry is skipped
//! without affecting the others. Writes are read-modify-write of that one
//! object; failures are logged and dropped (the next drag end rewrites it).

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::entry::ControlLayoutEntry;
use super::store::LayoutStore;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "moonlight-virtual-layout";

/// Reads and writes layout overrides for individual controls
pub struct LayoutRepository {
    store: Box<dyn LayoutStore>,
    key: String,
}

impl LayoutRepository {
    pub fn new(store: Box<dyn LayoutStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw JSON object stored under the key, empty on any failure
    fn read_blob(&self) -> Map<String, Value> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Map::new(),
            Err(e) => {
                warn!("Failed to read layout {:?}: {}", self.key, e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!(
                    "Ignoring layout {:?}: expected an object, found {}",
                    self.key,
                    json_kind(&other)
                );
                Map::new()
            }
            Err(e) => {
                warn!("Ignoring malformed layout {:?}: {}", self.key, e);
                Map::new()
            }
        }
    }

    /// Every valid override, keyed by control id
    pub fn load_all(&self) -> HashMap<String, ControlLayoutEntry> {
        self.read_blob()
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value(value) {
                Ok(entry) => Some((id, entry)),
                Err(e) => {
                    warn!("Skipping malformed layout entry {:?}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    /// Override for one control, if any
    pub fn load(&self, id: &str) -> Option<ControlLayoutEntry> {
        let value = self.read_blob().remove(id)?;
        match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed layout entry {:?}: {}", id, e);
                None
            }
        }
    }

    /// Store the override for one control, keeping every other entry as is
    pub fn save(&self, id: &str, entry: &ControlLayoutEntry) {
        let mut blob = self.read_blob();

        let value = match serde_json::to_value(entry) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize layout entry {:?}: {}", id, e);
                return;
            }
        };
        blob.insert(id.to_string(), value);

        let raw = match serde_json::to_string(&Value::Object(blob)) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize layout {:?}: {}", self.key, e);
                return;
            }
        };

        match self.store.set(&self.key, &raw) {
            Ok(()) => debug!("Saved layout for {}: {:?}", id, entry),
            Err(e) => warn!("Failed to save layout for {}: {}", id, e),
        }
    }

    /// Drop every override
    pub fn clear(&self) {
        match self.store.remove(&self.key) {
            Ok(()) => debug!("Cleared layout {:?}", self.key),
            Err(e) => warn!("Failed to clear layout {:?}: {}", self.key, e),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
