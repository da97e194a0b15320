//! Math utilities module
//!
//! Model transforms and bounding boxes on top of glam.

mod bounds;
mod transform;

pub use bounds::Aabb;
pub use transform::Transform;

pub use glam::{Mat4, Quat, Vec3};
