//! Gridboard Web
//!
//! Exposes the canvas engine to the browser. The presentation layer sends
//! command objects and renders the widget list it gets back.

pub mod bridge;

pub use bridge::{dispatch_json, open_canvas, view_json, BridgeError, CanvasView};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{start, CanvasHandle};
