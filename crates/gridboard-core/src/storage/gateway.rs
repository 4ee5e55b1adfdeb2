//! Widget-set persistence on top of a key-value store.
//!
//! Persistence is best-effort: reads degrade to an empty canvas and write
//! failures are logged and swallowed. In-memory state stays authoritative.

use super::{KeyValueStore, StorageResult};
use crate::widget::Widget;
use std::collections::HashSet;

/// Loads and saves the full widget set under one fixed key.
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
    key: String,
    columns: u32,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Create a gateway storing under `key` for a grid `columns` wide.
    pub fn new(store: S, key: impl Into<String>, columns: u32) -> Self {
        Self {
            store,
            key: key.into(),
            columns,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored widget set.
    ///
    /// Absent or unreadable records yield an empty set. Entries that fail to
    /// decode are dropped, as are later duplicates of an id. Positions are
    /// clamped back into the grid.
    pub fn load(&self) -> Vec<Widget> {
        let bytes = match self.store.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Failed to read widgets from '{}': {}", self.key, e);
                return Vec::new();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Stored widgets under '{}' are unreadable: {}", self.key, e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::with_capacity(entries.len());
        let mut widgets = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let mut widget: Widget = match serde_json::from_value(entry) {
                Ok(widget) => widget,
                Err(e) => {
                    log::warn!("Dropping stored widget #{}: {}", index, e);
                    continue;
                }
            };
            if !seen.insert(widget.id().clone()) {
                log::warn!("Dropping duplicate stored widget {}", widget.id());
                continue;
            }
            widget.clamp_to_grid(self.columns);
            widgets.push(widget);
        }

        log::debug!("Loaded {} widgets from '{}'", widgets.len(), self.key);
        widgets
    }

    /// Overwrite the stored record. Failures are logged, never returned.
    pub fn save(&self, widgets: &[Widget]) {
        if let Err(e) = self.try_save(widgets) {
            log::error!("Failed to save {} widgets to '{}': {}", widgets.len(), self.key, e);
        }
    }

    /// Remove the stored record. Failures are logged, never returned.
    pub fn clear(&self) {
        if let Err(e) = self.store.delete(&self.key) {
            log::error!("Failed to clear stored widgets '{}': {}", self.key, e);
        }
    }

    fn try_save(&self, widgets: &[Widget]) -> StorageResult<()> {
        let bytes = serde_json::to_vec(widgets)?;
        self.store.set(&self.key, &bytes)
    }
}
