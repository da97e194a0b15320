//! # scrollscene
//!
//! Renders one glTF model with WebGPU and drives its camera and transform
//! from page scroll, plus a free-orbit debug viewer for the same model.
//!
//! ## Features
//! - Timeline evaluator with GSAP-style eases, `to`/`fromTo` tweens and labels
//! - Scroll trigger: scroll offset to progress, section pinning, markers
//! - Four-step showcase sequence with text panel fades, sampled statelessly
//! - Cross-platform: native window with egui overlay, or WASM with a DOM overlay
//!
//! ## Example
//! ```rust
//! use scrollscene::sequence::{ScrollSequence, SequenceConfig};
//! use glam::Vec3;
//!
//! let sequence = ScrollSequence::build(&SequenceConfig::default()).unwrap();
//! let frame = sequence.sample(1.0, Vec3::ZERO);
//! assert_eq!(frame.camera_position, Vec3::new(0.0, 30.0, -85.0));
//! assert!(frame.panels.iter().all(|panel| panel.opacity == 0.0));
//! ```

pub mod asset;
pub mod math;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod sequence;
pub mod timeline;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use asset::{LoadError, LoadEvent, LoadProgress, ModelData};
pub use math::{Aabb, Transform};
pub use scene::{Background, SceneContext};
pub use scroll::{PinState, ScrollPosition, ScrollTrigger, ScrollTriggerConfig};
pub use sequence::{ScrollSequence, SequenceConfig, SequenceFrame};
pub use timeline::{Ease, Timeline, TimelineError};
pub use viewer::{DebugMode, ScrollMode, Viewer, ViewerConfig, ViewerError, ViewerMode};
