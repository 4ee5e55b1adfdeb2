//! WebAssembly entry point and browser bindings.

use crate::bridge::{self, CanvasView};
use gridboard_core::{Canvas, LocalStorageStore};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A canvas persisted to `window.localStorage`.
#[wasm_bindgen]
pub struct CanvasHandle {
    canvas: Canvas<LocalStorageStore>,
}

#[wasm_bindgen]
impl CanvasHandle {
    /// Open the canvas, restoring any saved widgets.
    ///
    /// `config` is an optional JSON object overriding the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<CanvasHandle, JsValue> {
        let store = LocalStorageStore::new().map_err(js_error)?;
        let canvas = bridge::open_canvas(store, config.as_deref()).map_err(js_error)?;
        Ok(Self { canvas })
    }

    /// Apply a command object and return its outcome.
    pub fn dispatch(&mut self, command: JsValue) -> Result<JsValue, JsValue> {
        let json = js_sys::JSON::stringify(&command)?;
        let json = String::from(json);
        let outcome = bridge::dispatch_json(&mut self.canvas, &json).map_err(|e| {
            log::warn!("{}", e);
            js_error(e)
        })?;
        to_js(&outcome)
    }

    /// Current widgets in insertion order.
    pub fn widgets(&self) -> Result<JsValue, JsValue> {
        to_js(self.canvas.widgets())
    }

    /// Widgets plus undo/redo availability.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&CanvasView::of(&self.canvas))
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.canvas.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.canvas.can_redo()
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialized: {}", e).into());
    }

    log::info!("Gridboard canvas engine loaded");
}
