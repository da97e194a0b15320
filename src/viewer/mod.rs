//! Viewer shell shared by both entry points
//!
//! [`Viewer`] owns the window, GPU state, loader and [`SceneContext`]; the
//! behaviour that differs between the debug viewer and the scroll
//! sequencer lives behind [`ViewerMode`].

mod clock;
mod debug;
mod scroll;
mod shell;

#[cfg(not(target_arch = "wasm32"))]
mod egui_overlay;

pub use clock::FrameClock;
pub use debug::{coords_label, DebugMode};
pub use scroll::{ScrollMode, ScrollModeConfig};
pub use shell::Viewer;

use crate::asset::{LoadError, LoadProgress};
use crate::render::RenderError;
use crate::scene::{Background, SceneContext};
use crate::scroll::{Markers, PinState, ScrollPosition, ScrollTrigger};
use crate::sequence::PanelState;
use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
pub const DEFAULT_MODEL_PATH: &str = "/models/test.glb";
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_MODEL_PATH: &str = "assets/models/test.glb";

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("missing page element {0}")]
    MissingElement(String),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("JavaScript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for ViewerError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        ViewerError::Js(format!("{value:?}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// File path natively, URL on the web.
    pub model_path: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

impl ViewerConfig {
    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model_path = path.into();
        self
    }
}

/// One text panel as the overlay should show it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    /// Page class the panel is found by, e.g. `step-1`.
    pub class: String,
    pub caption: String,
    pub state: PanelState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinView {
    pub state: PinState,
    pub spacing: f64,
}

/// Everything drawn on top of the 3D view. Produced by the mode each
/// frame and presented by egui natively or the DOM on the web.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub coords: Option<String>,
    pub loading: Option<String>,
    pub panels: Vec<PanelView>,
    pub pin: Option<PinView>,
    pub markers: Option<Markers>,
    pub scroll_y: f64,
}

/// The part of a viewer that is not window or GPU plumbing.
pub trait ViewerMode {
    fn title(&self) -> &str;

    fn background(&self) -> Background;

    fn handle_input(&mut self, _event: &WindowEvent) {}

    fn on_load_progress(&mut self, _progress: LoadProgress) {}

    /// Called once the model is part of `scene`.
    fn on_model_loaded(&mut self, scene: &mut SceneContext);

    fn on_load_failed(&mut self, error: &LoadError);

    fn update(&mut self, scene: &mut SceneContext, dt: f32);

    fn overlay(&self, scene: &SceneContext) -> Overlay;

    /// Shared scroll offset the page writes into, for scroll-driven modes.
    fn scroll_position(&self) -> Option<ScrollPosition> {
        None
    }

    fn scroll_trigger_mut(&mut self) -> Option<&mut ScrollTrigger> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_override_keeps_window_size() {
        let config = ViewerConfig::default().with_model_path("other.glb");
        assert_eq!(config.model_path, "other.glb");
        assert_eq!((config.width, config.height), (1280, 720));
    }

    #[test]
    fn errors_render_readably() {
        let err = ViewerError::MissingElement("#model-section".into());
        assert_eq!(err.to_string(), "missing page element #model-section");

        let err = ViewerError::from(RenderError::NoAdapter);
        assert_eq!(err.to_string(), "no compatible GPU adapter found");
    }
}
