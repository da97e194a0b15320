use super::{Overlay, ViewerMode};
use crate::asset::LoadError;
use crate::render::OrbitController;
use crate::scene::{Background, SceneContext};
use glam::Vec3;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

const LOADED_CAMERA: Vec3 = Vec3::new(0.0, 1.0, 5.0);

/// Free orbit around the origin with a live camera readout.
pub struct DebugMode {
    orbit: OrbitController,
    cursor: Option<PhysicalPosition<f64>>,
    rotating: bool,
    panning: bool,
}

impl Default for DebugMode {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugMode {
    pub fn new() -> Self {
        Self {
            orbit: OrbitController::new(Vec3::ZERO, 5.0).with_upper_hemisphere(),
            cursor: None,
            rotating: false,
            panning: false,
        }
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }
}

/// Readout text, two decimals per axis.
pub fn coords_label(position: Vec3) -> String {
    format!(
        "Camera: x={:.2}, y={:.2}, z={:.2}",
        print_zero(position.x),
        print_zero(position.y),
        print_zero(position.z)
    )
}

// Values that round to zero print without a sign.
fn print_zero(value: f32) -> f32 {
    if (value * 100.0).round() == 0.0 {
        0.0
    } else {
        value
    }
}

impl ViewerMode for DebugMode {
    fn title(&self) -> &str {
        "Model Debug Viewer"
    }

    fn background(&self) -> Background {
        Background::WHITE
    }

    fn handle_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.rotating = pressed,
                    MouseButton::Right => self.panning = pressed,
                    _ => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(last) = self.cursor {
                    let delta_x = (position.x - last.x) as f32;
                    let delta_y = (position.y - last.y) as f32;
                    if self.rotating {
                        self.orbit.rotate(delta_x, delta_y);
                    } else if self.panning {
                        self.orbit.pan(-delta_x, delta_y);
                    }
                }
                self.cursor = Some(*position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.rotating = false;
                self.panning = false;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.orbit.zoom(scroll);
            }
            _ => {}
        }
    }

    fn on_model_loaded(&mut self, scene: &mut SceneContext) {
        self.orbit.set_position(LOADED_CAMERA);
        self.orbit.update_camera(&mut scene.camera);
    }

    fn on_load_failed(&mut self, _error: &LoadError) {}

    fn update(&mut self, scene: &mut SceneContext, _dt: f32) {
        self.orbit.update();
        self.orbit.update_camera(&mut scene.camera);
    }

    fn overlay(&self, scene: &SceneContext) -> Overlay {
        Overlay {
            coords: Some(coords_label(scene.camera.position)),
            ..Overlay::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Aabb;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn loaded_scene(mode: &mut DebugMode) -> SceneContext {
        let mut scene = SceneContext::new(mode.background());
        scene.set_model(Aabb::EMPTY);
        mode.on_model_loaded(&mut scene);
        scene
    }

    #[test]
    fn camera_moves_to_viewing_position_on_load() {
        let mut mode = DebugMode::new();
        let mut scene = loaded_scene(&mut mode);
        mode.update(&mut scene, 1.0 / 60.0);

        assert!(scene.camera.position.abs_diff_eq(LOADED_CAMERA, 1e-4));
        assert_eq!(scene.camera.target, Vec3::ZERO);
        assert_eq!(
            mode.overlay(&scene).coords.as_deref(),
            Some("Camera: x=0.00, y=1.00, z=5.00")
        );
    }

    #[test]
    fn readout_never_prints_negative_zero() {
        assert_eq!(
            coords_label(Vec3::new(-0.001, 2.5, -3.14159)),
            "Camera: x=0.00, y=2.50, z=-3.14"
        );
    }

    #[test]
    fn polar_angle_stays_in_upper_hemisphere() {
        let mut mode = DebugMode::new();
        let mut scene = loaded_scene(&mut mode);

        // Dragging the cursor up pushes the camera down past the horizon.
        mode.orbit.rotate(0.0, -10_000.0);
        for _ in 0..120 {
            mode.update(&mut scene, 1.0 / 60.0);
        }

        assert_abs_diff_eq!(mode.orbit().phi, FRAC_PI_2);
        assert!(scene.camera.position.y >= -1e-4);
    }

    #[test]
    fn motion_is_damped_to_rest() {
        let mut mode = DebugMode::new();
        let mut scene = loaded_scene(&mut mode);
        mode.orbit.rotate(40.0, 0.0);
        assert!(mode.orbit().is_moving());

        for _ in 0..300 {
            mode.update(&mut scene, 1.0 / 60.0);
        }
        assert!(!mode.orbit().is_moving());
    }

    #[test]
    fn failed_load_keeps_readout_running() {
        let mut mode = DebugMode::new();
        let mut scene = SceneContext::new(mode.background());
        mode.on_load_failed(&LoadError::EmptyScene);
        mode.update(&mut scene, 1.0 / 60.0);

        assert!(scene.model().is_none());
        assert!(mode.overlay(&scene).coords.is_some());
    }
}
