//! Gridboard Core Library
//!
//! Platform-agnostic canvas state engine for the Gridboard widget builder:
//! the widget model, grid placement, undo/redo history and persistence.

pub mod canvas;
pub mod command;
pub mod config;
pub mod grid;
pub mod history;
pub mod placement;
pub mod storage;
pub mod widget;

pub use canvas::{Canvas, CanvasError};
pub use command::{CanvasCommand, CommandOutcome};
pub use config::{CanvasConfig, ConfigError};
pub use grid::{GridPosition, GridRect, GridSize, GRID_COLUMNS, ROW_HEIGHT};
pub use history::History;
pub use placement::{resolve_cell, resolve_drop, DropContext, GridGeometry, Placement};
pub use storage::{KeyValueStore, MemoryStore, PersistenceGateway, StorageError, StorageResult};
pub use widget::{
    PatchRecord, Widget, WidgetContent, WidgetId, WidgetKind, WidgetPatch, WidgetStyle,
};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
