//! WebGPU rendering
//!
//! GPU context, camera, uploaded meshes and the scene renderer that draws a
//! [`crate::scene::SceneContext`] each frame.

pub mod camera;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod scene_renderer;

pub use camera::{Camera, OrbitController};
pub use context::{GpuContext, RenderError};
pub use mesh::{Mesh, Vertex};
pub use pipeline::RenderPipelines;
pub use scene_renderer::SceneRenderer;
