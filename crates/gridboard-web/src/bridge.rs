//! JSON boundary between the canvas engine and a script host.
//!
//! Everything here is target-independent so the wire shapes can be tested
//! natively. The wasm bindings in `web` only move strings and values across.

use gridboard_core::{
    Canvas, CanvasCommand, CanvasConfig, CommandOutcome, ConfigError, KeyValueStore, Widget,
    WidgetId,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to the host.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Malformed command: {0}")]
    Command(serde_json::Error),
    #[error("Failed to encode result: {0}")]
    Encode(serde_json::Error),
}

/// What the presentation layer renders after each command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasView<'a> {
    pub widgets: &'a [Widget],
    pub can_undo: bool,
    pub can_redo: bool,
    pub dragging: Option<&'a WidgetId>,
}

impl<'a> CanvasView<'a> {
    pub fn of<S: KeyValueStore>(canvas: &'a Canvas<S>) -> Self {
        Self {
            widgets: canvas.widgets(),
            can_undo: canvas.can_undo(),
            can_redo: canvas.can_redo(),
            dragging: canvas.dragging(),
        }
    }
}

/// Open a canvas on `store`, with an optional JSON config overriding defaults.
pub fn open_canvas<S: KeyValueStore>(
    store: S,
    config_json: Option<&str>,
) -> Result<Canvas<S>, BridgeError> {
    let config = match config_json.map(str::trim) {
        Some(json) if !json.is_empty() => CanvasConfig::from_json(json)?,
        _ => CanvasConfig::default(),
    };
    Ok(Canvas::with_config(store, config))
}

/// Decode a JSON command and apply it.
pub fn dispatch_json<S: KeyValueStore>(
    canvas: &mut Canvas<S>,
    json: &str,
) -> Result<CommandOutcome, BridgeError> {
    let command: CanvasCommand = serde_json::from_str(json).map_err(BridgeError::Command)?;
    log::debug!("Dispatching {:?}", command);
    Ok(canvas.apply(command))
}

/// The current view as a JSON string.
pub fn view_json<S: KeyValueStore>(canvas: &Canvas<S>) -> Result<String, BridgeError> {
    serde_json::to_string(&CanvasView::of(canvas)).map_err(BridgeError::Encode)
}
