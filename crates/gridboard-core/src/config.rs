//! Engine configuration.

use crate::grid::{GRID_COLUMNS, ROW_HEIGHT};
use crate::placement::GridGeometry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key the widget set is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "canvas-widgets";

/// Most columns a table may be set up with.
pub const DEFAULT_MAX_TABLE_COLUMNS: u32 = 10;

/// Most rows a table may be set up with.
pub const DEFAULT_MAX_TABLE_ROWS: u32 = 10;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for a [`Canvas`](crate::Canvas). Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    /// Columns spanning the canvas width.
    pub grid_columns: u32,
    /// Row height in canvas pixels.
    pub row_height: f64,
    /// Key the widget set is stored under.
    pub storage_key: String,
    /// Maximum undo snapshots kept; `None` keeps all.
    pub history_limit: Option<usize>,
    pub max_table_columns: u32,
    pub max_table_rows: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_columns: GRID_COLUMNS,
            row_height: ROW_HEIGHT,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            history_limit: None,
            max_table_columns: DEFAULT_MAX_TABLE_COLUMNS,
            max_table_rows: DEFAULT_MAX_TABLE_ROWS,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_columns == 0 {
            return Err(ConfigError::Invalid {
                field: "gridColumns",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "rowHeight",
                reason: format!("must be a positive number, got {}", self.row_height),
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "storageKey",
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_table_columns == 0 {
            return Err(ConfigError::Invalid {
                field: "maxTableColumns",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_table_rows == 0 {
            return Err(ConfigError::Invalid {
                field: "maxTableRows",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid {
                field: "historyLimit",
                reason: "must keep at least one snapshot".to_string(),
            });
        }
        Ok(())
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.grid_columns, self.row_height)
    }
}
