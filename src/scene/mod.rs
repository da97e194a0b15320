//! Per-viewer scene state
//!
//! Background, one ambient light, the camera and (once loaded) the model.
//! Each viewer owns exactly one of these and hands it to its update and
//! resize code; nothing here touches the GPU.

mod background;

pub use background::{gradient_texture, Background, GradientConfig, TextureData};

use crate::math::{Aabb, Transform};
use crate::render::Camera;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

impl AmbientLight {
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

/// The loaded model as the scene sees it: where it is and how big.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneModel {
    pub transform: Transform,
    /// Local-space bounds of the whole model.
    pub bounds: Aabb,
}

impl SceneModel {
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

pub struct SceneContext {
    pub camera: Camera,
    pub background: Background,
    pub light: AmbientLight,
    model: Option<SceneModel>,
}

impl SceneContext {
    pub fn new(background: Background) -> Self {
        Self {
            camera: Camera::default(),
            background,
            light: AmbientLight::default(),
            model: None,
        }
    }

    pub fn model(&self) -> Option<&SceneModel> {
        self.model.as_ref()
    }

    /// Both halves at once, for updates that move the camera relative to
    /// the model.
    pub fn camera_and_model_mut(&mut self) -> (&mut Camera, Option<&mut SceneModel>) {
        (&mut self.camera, self.model.as_mut())
    }

    pub fn set_model(&mut self, bounds: Aabb) -> &mut SceneModel {
        self.model.insert(SceneModel {
            transform: Transform::IDENTITY,
            bounds,
        })
    }

    /// Keeps the camera's aspect in step with the drawing surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect(width as f32 / height as f32);
    }
}
