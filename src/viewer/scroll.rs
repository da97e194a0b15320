use super::{Overlay, PanelView, PinView, ViewerMode};
use crate::asset::{LoadError, LoadProgress};
use crate::scene::{gradient_texture, Background, GradientConfig, SceneContext};
use crate::scroll::{ScrollPosition, ScrollTrigger, ScrollTriggerConfig};
use crate::sequence::{ScrollSequence, SequenceConfig, SequenceFrame};
use glam::Vec3;
use winit::event::WindowEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollModeConfig {
    pub sequence: SequenceConfig,
    pub trigger: ScrollTriggerConfig,
    pub gradient: GradientConfig,
    /// Pixels scrolled per wheel line.
    pub line_height: f64,
}

impl Default for ScrollModeConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            trigger: ScrollTriggerConfig::default(),
            gradient: GradientConfig::default(),
            line_height: 100.0,
        }
    }
}

/// Scroll-driven showcase: the sequence is built once the model is in the
/// scene and sampled from the scroll position every frame.
pub struct ScrollMode {
    config: ScrollModeConfig,
    trigger: ScrollTrigger,
    position: ScrollPosition,
    sequence: Option<ScrollSequence>,
    frame: Option<SequenceFrame>,
    loading: Option<String>,
}

impl Default for ScrollMode {
    fn default() -> Self {
        Self::new(ScrollModeConfig::default())
    }
}

impl ScrollMode {
    pub fn new(config: ScrollModeConfig) -> Self {
        Self {
            trigger: ScrollTrigger::new(config.trigger),
            position: ScrollPosition::new(),
            sequence: None,
            frame: None,
            loading: Some(LoadProgress { loaded: 0, total: None }.label()),
            config,
        }
    }

    pub fn sequence(&self) -> Option<&ScrollSequence> {
        self.sequence.as_ref()
    }

    pub fn frame(&self) -> Option<&SequenceFrame> {
        self.frame.as_ref()
    }

    pub fn position(&self) -> &ScrollPosition {
        &self.position
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn progress(&self) -> f32 {
        self.trigger.progress(self.position.get())
    }

    /// Scroll offset at which timeline time `at` is reached.
    fn step_offset(&self, at: f32, duration: f32) -> f64 {
        let config = self.trigger.config();
        let fraction = if duration > 0.0 { f64::from(at / duration) } else { 0.0 };
        config.start_offset + fraction * config.distance
    }

    fn panel_views(&self) -> Vec<PanelView> {
        let hidden = self.config.sequence.panel_motion.hidden();
        self.config
            .sequence
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| PanelView {
                class: step.panel.clone(),
                caption: caption(&step.panel),
                state: self
                    .frame
                    .as_ref()
                    .and_then(|frame| frame.panels.get(index).copied())
                    .unwrap_or(hidden),
            })
            .collect()
    }
}

/// `step-1` becomes `Step 1`.
fn caption(class: &str) -> String {
    let spaced = class.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ViewerMode for ScrollMode {
    fn title(&self) -> &str {
        "Scroll Showcase"
    }

    fn background(&self) -> Background {
        Background::Equirect(gradient_texture(&self.config.gradient))
    }

    fn handle_input(&mut self, event: &WindowEvent) {
        // The page scrolls itself in the browser.
        if cfg!(target_arch = "wasm32") {
            return;
        }
        if let WindowEvent::MouseWheel { delta, .. } = event {
            let pixels = match delta {
                winit::event::MouseScrollDelta::LineDelta(_, y) => f64::from(*y) * self.config.line_height,
                winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y,
            };
            self.position.scroll_by(-pixels, self.trigger.end());
        }
    }

    fn on_load_progress(&mut self, progress: LoadProgress) {
        self.loading = Some(progress.label());
    }

    fn on_model_loaded(&mut self, scene: &mut SceneContext) {
        scene.camera.position = self.config.sequence.initial_camera;
        scene.camera.look_forward();

        match ScrollSequence::build(&self.config.sequence) {
            Ok(sequence) => {
                log::info!(
                    "scroll sequence ready: {} steps over {:.0}px",
                    sequence.steps().len(),
                    self.trigger.config().distance
                );
                for step in sequence.steps() {
                    if let Some(at) = sequence.step_start(&step.panel) {
                        log::debug!("{} starts at {:.0}px", step.panel, self.step_offset(at, sequence.duration()));
                    }
                }
                self.sequence = Some(sequence);
                self.loading = None;
            }
            Err(err) => {
                log::error!("Error building scroll sequence: {err}");
                self.loading = Some(format!("Error: {err}"));
            }
        }
    }

    fn on_load_failed(&mut self, error: &LoadError) {
        self.sequence = None;
        self.frame = None;
        self.loading = Some(format!("Error loading model: {error}"));
    }

    fn update(&mut self, scene: &mut SceneContext, _dt: f32) {
        let Some(sequence) = &self.sequence else {
            return;
        };

        let model_position = scene.model().map_or(Vec3::ZERO, |model| model.position());
        let frame = sequence.sample(self.progress(), model_position);

        let (camera, model) = scene.camera_and_model_mut();
        if let Some(model) = model {
            frame.apply(camera, &mut model.transform);
        }
        self.frame = Some(frame);
    }

    fn overlay(&self, _scene: &SceneContext) -> Overlay {
        let scroll_y = self.position.get();
        Overlay {
            coords: None,
            loading: self.loading.clone(),
            panels: self.panel_views(),
            pin: self.trigger.config().pin.then(|| PinView {
                state: self.trigger.pin_state(scroll_y),
                spacing: self.trigger.pin_spacing(),
            }),
            markers: self.trigger.markers(),
            scroll_y,
        }
    }

    fn scroll_position(&self) -> Option<ScrollPosition> {
        Some(self.position.clone())
    }

    fn scroll_trigger_mut(&mut self) -> Option<&mut ScrollTrigger> {
        Some(&mut self.trigger)
    }
}
