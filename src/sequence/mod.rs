//! Scroll-bound showcase sequence
//!
//! Four steps, one timeline unit apart. Each step either spins the model or
//! flies the camera, and reveals its own text panel. The whole sequence is
//! sampled from a single progress value, so scrubbing the page back and
//! forth always lands on the same camera and panel state.

mod panel;

pub use panel::{PanelMotion, PanelState};

use crate::render::Camera;
use crate::math::Transform;
use crate::timeline::{Ease, Timeline, TimelineError};
use glam::Vec3;
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence has no steps")]
    Empty,
    #[error("step {index} starts at {start}, less than one unit after the previous step at {previous}")]
    StepOrder { index: usize, start: f32, previous: f32 },
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Property {
    ModelRotationY,
    CameraPosition,
    PanelOpacity(usize),
    PanelOffsetX(usize),
}

/// What a step animates besides its panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMotion {
    /// Yaw the model to `angle` radians.
    RotateModel { angle: f32, duration: f32, ease: Ease },
    /// Fly the camera to `to`. With `aim_at_model` the camera faces the
    /// model from this step on.
    MoveCamera {
        to: Vec3,
        duration: f32,
        ease: Ease,
        aim_at_model: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    /// Class name of the step's text panel, without the leading dot.
    pub panel: String,
    pub start: f32,
    pub motion: StepMotion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    pub initial_camera: Vec3,
    pub steps: Vec<StepConfig>,
    pub panel_motion: PanelMotion,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        let camera_move = |to: Vec3, ease: Ease| StepMotion::MoveCamera {
            to,
            duration: 1.0,
            ease,
            aim_at_model: true,
        };

        Self {
            initial_camera: Vec3::new(0.0, 20.0, 90.0),
            steps: vec![
                StepConfig {
                    panel: "step-1".to_owned(),
                    start: 0.0,
                    motion: StepMotion::RotateModel {
                        angle: TAU,
                        duration: 1.0,
                        ease: Ease::default(),
                    },
                },
                StepConfig {
                    panel: "step-2".to_owned(),
                    start: 1.0,
                    motion: camera_move(Vec3::new(60.0, 100.0, 16.0), Ease::default()),
                },
                StepConfig {
                    panel: "step-3".to_owned(),
                    start: 2.0,
                    motion: camera_move(Vec3::new(61.0, 101.0, 16.5), Ease::InOut(1)),
                },
                StepConfig {
                    panel: "step-4".to_owned(),
                    start: 3.0,
                    motion: camera_move(Vec3::new(0.0, 30.0, -85.0), Ease::default()),
                },
            ],
            panel_motion: PanelMotion::default(),
        }
    }
}

/// Where the camera points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aim {
    /// Untouched orientation, facing -Z.
    Forward,
    /// Faces the model's current position, read at sample time.
    Model,
}

/// Everything a frame needs from the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceFrame {
    pub time: f32,
    pub camera_position: Vec3,
    pub aim: Aim,
    pub look_at: Vec3,
    pub model_rotation_y: f32,
    /// One entry per step, in step order.
    pub panels: Vec<PanelState>,
}

impl SequenceFrame {
    pub fn apply(&self, camera: &mut Camera, model: &mut Transform) {
        camera.position = self.camera_position;
        camera.target = self.look_at;
        model.set_rotation_y(self.model_rotation_y);
    }
}

pub struct ScrollSequence {
    timeline: Timeline<Property>,
    steps: Vec<StepConfig>,
    aim_changes: Vec<(f32, Aim)>,
    duration: f32,
}

impl ScrollSequence {
    pub fn build(config: &SequenceConfig) -> Result<Self, SequenceError> {
        if config.steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        for (index, pair) in config.steps.windows(2).enumerate() {
            if pair[1].start < pair[0].start + 1.0 {
                return Err(SequenceError::StepOrder {
                    index: index + 1,
                    start: pair[1].start,
                    previous: pair[0].start,
                });
            }
        }
        config.panel_motion.validate()?;

        let mut timeline = Timeline::new();
        timeline
            .property(Property::CameraPosition, config.initial_camera)?
            .property(Property::ModelRotationY, 0.0_f32)?;

        let mut aim_changes = Vec::new();
        for (index, step) in config.steps.iter().enumerate() {
            timeline.label(step.panel.as_str(), step.start);

            match step.motion {
                StepMotion::RotateModel { angle, duration, ease } => {
                    timeline.to(Property::ModelRotationY, angle, duration, ease, step.start)?;
                }
                StepMotion::MoveCamera {
                    to,
                    duration,
                    ease,
                    aim_at_model,
                } => {
                    timeline.to(Property::CameraPosition, to, duration, ease, step.start)?;
                    if aim_at_model {
                        aim_changes.push((step.start, Aim::Model));
                    }
                }
            }

            add_panel(&mut timeline, index, step.start, &config.panel_motion)?;
        }

        let duration = timeline.duration();
        log::debug!(
            "built scroll sequence: {} steps, {duration} timeline units",
            config.steps.len()
        );

        Ok(Self {
            timeline,
            steps: config.steps.clone(),
            aim_changes,
            duration,
        })
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    /// Timeline length; progress 1.0 maps here.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn step_start(&self, panel: &str) -> Option<f32> {
        self.timeline.label_time(panel)
    }

    pub fn time_at(&self, progress: f32) -> f32 {
        progress.clamp(0.0, 1.0) * self.duration
    }

    pub fn aim_at(&self, time: f32) -> Aim {
        self.aim_changes
            .iter()
            .rev()
            .find(|(at, _)| *at <= time)
            .map_or(Aim::Forward, |(_, aim)| *aim)
    }

    pub fn sample(&self, progress: f32, model_position: Vec3) -> SequenceFrame {
        self.sample_at_time(self.time_at(progress), model_position)
    }

    pub fn sample_at_time(&self, time: f32, model_position: Vec3) -> SequenceFrame {
        let camera_position: Vec3 = self
            .timeline
            .sample(Property::CameraPosition, time)
            .unwrap_or(Vec3::ZERO);
        let model_rotation_y: f32 = self
            .timeline
            .sample(Property::ModelRotationY, time)
            .unwrap_or(0.0);

        let aim = self.aim_at(time);
        let look_at = match aim {
            Aim::Model if model_position.distance_squared(camera_position) > f32::EPSILON => {
                model_position
            }
            _ => camera_position + Vec3::NEG_Z,
        };

        let panels = (0..self.steps.len())
            .map(|index| PanelState {
                opacity: self
                    .timeline
                    .sample(Property::PanelOpacity(index), time)
                    .unwrap_or(0.0),
                offset_x: self
                    .timeline
                    .sample(Property::PanelOffsetX(index), time)
                    .unwrap_or(0.0),
            })
            .collect();

        SequenceFrame {
            time,
            camera_position,
            aim,
            look_at,
            model_rotation_y,
            panels,
        }
    }
}

fn add_panel(
    timeline: &mut Timeline<Property>,
    index: usize,
    start: f32,
    motion: &PanelMotion,
) -> Result<(), TimelineError> {
    let opacity = Property::PanelOpacity(index);
    let offset = Property::PanelOffsetX(index);

    timeline
        .from_to(opacity, 0.0_f32, 1.0, motion.enter_duration, motion.enter_ease, start)?
        .from_to(
            offset,
            motion.hidden_offset,
            motion.shown_offset,
            motion.enter_duration,
            motion.enter_ease,
            start,
        )?
        .to(
            offset,
            motion.drift_offset,
            motion.drift_duration,
            motion.drift_ease,
            start + motion.drift_delay,
        )?
        .to(opacity, 0.0_f32, motion.exit_duration, motion.exit_ease, start + motion.exit_delay)?
        .to(
            offset,
            motion.exit_offset,
            motion.exit_duration,
            motion.exit_ease,
            start + motion.exit_delay,
        )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sequence() -> ScrollSequence {
        ScrollSequence::build(&SequenceConfig::default()).unwrap()
    }

    #[test]
    fn steps_start_one_unit_apart() {
        let seq = sequence();
        let starts: Vec<f32> = seq.steps().iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0.0, 1.0, 2.0, 3.0]);
        for (i, step) in seq.steps().iter().enumerate() {
            assert_eq!(seq.step_start(&step.panel), Some(i as f32));
        }
    }

    #[test]
    fn duration_covers_last_panel_exit() {
        assert_abs_diff_eq!(sequence().duration(), 6.5);
    }

    #[test]
    fn progress_zero_is_the_opening_shot() {
        let frame = sequence().sample(0.0, Vec3::ZERO);
        assert_eq!(frame.camera_position, Vec3::new(0.0, 20.0, 90.0));
        assert_eq!(frame.model_rotation_y, 0.0);
        assert_eq!(frame.aim, Aim::Forward);
        assert!(frame.panels.iter().all(|p| p.opacity == 0.0));
        assert_eq!(frame.panels[0].offset_x, -200.0);
    }

    #[test]
    fn end_of_first_step() {
        let frame = sequence().sample_at_time(1.0, Vec3::ZERO);
        assert_abs_diff_eq!(frame.model_rotation_y, TAU);
        assert!(frame.camera_position.abs_diff_eq(Vec3::new(0.0, 20.0, 90.0), 1e-5));
        assert_abs_diff_eq!(frame.panels[0].opacity, 1.0);
        assert_eq!(frame.panels[1].opacity, 0.0);
        assert_eq!(frame.panels[1].offset_x, -200.0);

        let later = sequence().sample_at_time(1.25, Vec3::ZERO);
        assert!(later.panels[1].opacity > 0.0 && later.panels[1].opacity < 1.0);
    }

    #[test]
    fn quarter_progress_is_early_in_the_second_step() {
        let seq = sequence();
        let frame = seq.sample(0.25, Vec3::ZERO);
        assert_abs_diff_eq!(frame.time, 1.625);
        assert_abs_diff_eq!(frame.model_rotation_y, TAU);

        let start = Vec3::new(0.0, 20.0, 90.0);
        let target = Vec3::new(60.0, 100.0, 16.0);
        let along = (frame.camera_position - start).dot(target - start) / (target - start).length_squared();
        assert!(along > 0.0 && along < 1.0, "camera at {along} of the way");
        assert!(frame.camera_position.distance(target) > 1.0);

        assert_abs_diff_eq!(frame.panels[0].opacity, 1.0);
        assert!(frame.panels[1].opacity > 0.0 && frame.panels[1].opacity < 1.0);
        assert_eq!(frame.panels[2].opacity, 0.0);
    }

    #[test]
    fn panel_envelope_for_every_step() {
        let seq = sequence();
        for (i, step) in seq.steps().iter().enumerate() {
            let s = step.start;
            let at = |t: f32| seq.sample_at_time(t, Vec3::ZERO).panels[i];

            assert_eq!(at(s).opacity, 0.0, "panel {i} visible at its start");
            assert_abs_diff_eq!(at(s + 1.0).opacity, 1.0);
            assert_abs_diff_eq!(at(s + 1.0).offset_x, 0.0);
            assert_abs_diff_eq!(at(s + 2.5).offset_x, 50.0, epsilon = 1e-4);
            assert_abs_diff_eq!(at(s + 2.5).opacity, 1.0);
            assert_abs_diff_eq!(at(s + 3.5).opacity, 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(at(s + 3.5).offset_x, 300.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn camera_reaches_each_vantage_point() {
        let seq = sequence();
        let at = |t: f32| seq.sample_at_time(t, Vec3::ZERO).camera_position;
        assert!(at(2.0).abs_diff_eq(Vec3::new(60.0, 100.0, 16.0), 1e-4));
        assert!(at(3.0).abs_diff_eq(Vec3::new(61.0, 101.0, 16.5), 1e-4));
        assert!(at(4.0).abs_diff_eq(Vec3::new(0.0, 30.0, -85.0), 1e-4));
        assert!(at(6.5).abs_diff_eq(Vec3::new(0.0, 30.0, -85.0), 1e-4));
    }

    #[test]
    fn camera_aims_at_live_model_position() {
        let seq = sequence();
        let frame = seq.sample_at_time(1.5, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(frame.aim, Aim::Model);
        assert_eq!(frame.look_at, Vec3::new(0.0, 5.0, 0.0));

        let moved = seq.sample_at_time(1.5, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(moved.look_at, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(moved.camera_position, frame.camera_position);

        let before = seq.sample_at_time(0.5, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(before.look_at, Vec3::new(0.0, 20.0, 89.0));
    }

    #[test]
    fn rejects_steps_closer_than_one_unit() {
        let mut config = SequenceConfig::default();
        config.steps[2].start = 1.5;
        assert!(matches!(
            ScrollSequence::build(&config),
            Err(SequenceError::StepOrder { index: 2, .. })
        ));
    }

    #[test]
    fn rejects_empty_sequence() {
        let config = SequenceConfig {
            steps: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(ScrollSequence::build(&config), Err(SequenceError::Empty)));
    }

    #[test]
    fn frame_applies_to_camera_and_model() {
        let frame = sequence().sample_at_time(0.25, Vec3::ZERO);
        assert!(frame.model_rotation_y < std::f32::consts::PI);
        let mut camera = Camera::default();
        let mut model = Transform::IDENTITY;
        frame.apply(&mut camera, &mut model);
        assert_eq!(camera.position, frame.camera_position);
        assert_eq!(camera.target, frame.look_at);
        assert_abs_diff_eq!(model.rotation_y(), frame.model_rotation_y, epsilon = 1e-5);
    }
}
