//! WASM entry points
//!
//! The page calls one of the exported functions after loading the module.
//! Rendering targets a canvas created inside `#model-section`; overlay text
//! goes into the page's own elements.

pub mod dom;
pub mod fetch;

use crate::viewer::{DebugMode, ScrollMode, Viewer, ViewerConfig, ViewerMode};
use wasm_bindgen::prelude::*;

fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }
}

fn start(mode: impl ViewerMode + 'static) -> Result<(), JsValue> {
    init_logging();
    Viewer::new(ViewerConfig::default(), mode)
        .run()
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Orbit viewer with the `#coords` readout.
#[wasm_bindgen]
pub fn start_debug_viewer() -> Result<(), JsValue> {
    start(DebugMode::new())
}

/// Scroll-driven showcase bound to `#model-section`.
#[wasm_bindgen]
pub fn start_scroll_sequencer() -> Result<(), JsValue> {
    start(ScrollMode::default())
}
