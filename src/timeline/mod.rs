//! Keyframe-free property timeline
//!
//! Tweens are placed at absolute positions on a timeline and sampled as a
//! pure function of time, which is what lets scroll scrub back and forth.

mod ease;
mod track;
mod tween;

pub use ease::Ease;
pub use track::Track;
pub use tween::{Lerp, Tween};

use glam::Vec3;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("unknown ease `{0}`")]
    UnknownEase(String),
    #[error("tween starting at {new} overlaps the tween starting at {existing}")]
    Overlap { existing: f32, new: f32 },
    #[error("invalid tween timing: start {start}, duration {duration}")]
    InvalidTiming { start: f32, duration: f32 },
    #[error("property already animated with a different value type")]
    TypeMismatch,
}

/// Type-erased track storage so one timeline can hold scalar and vector
/// properties side by side.
#[derive(Debug, Clone)]
pub enum AnyTrack {
    Scalar(Track<f32>),
    Vector(Track<Vec3>),
}

impl AnyTrack {
    fn end(&self) -> f32 {
        match self {
            AnyTrack::Scalar(track) => track.end(),
            AnyTrack::Vector(track) => track.end(),
        }
    }
}

pub trait Animatable: Lerp {
    fn wrap(track: Track<Self>) -> AnyTrack;
    fn as_track(track: &AnyTrack) -> Option<&Track<Self>>;
    fn as_track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>>;
}

impl Animatable for f32 {
    fn wrap(track: Track<Self>) -> AnyTrack {
        AnyTrack::Scalar(track)
    }

    fn as_track(track: &AnyTrack) -> Option<&Track<Self>> {
        match track {
            AnyTrack::Scalar(track) => Some(track),
            AnyTrack::Vector(_) => None,
        }
    }

    fn as_track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>> {
        match track {
            AnyTrack::Scalar(track) => Some(track),
            AnyTrack::Vector(_) => None,
        }
    }
}

impl Animatable for Vec3 {
    fn wrap(track: Track<Self>) -> AnyTrack {
        AnyTrack::Vector(track)
    }

    fn as_track(track: &AnyTrack) -> Option<&Track<Self>> {
        match track {
            AnyTrack::Vector(track) => Some(track),
            AnyTrack::Scalar(_) => None,
        }
    }

    fn as_track_mut(track: &mut AnyTrack) -> Option<&mut Track<Self>> {
        match track {
            AnyTrack::Vector(track) => Some(track),
            AnyTrack::Scalar(_) => None,
        }
    }
}

/// Tracks keyed by property, plus named positions.
#[derive(Debug, Clone)]
pub struct Timeline<K: Ord> {
    tracks: BTreeMap<K, AnyTrack>,
    labels: Vec<(String, f32)>,
}

impl<K: Ord> Default for Timeline<K> {
    fn default() -> Self {
        Self {
            tracks: BTreeMap::new(),
            labels: Vec::new(),
        }
    }
}

impl<K: Ord + Copy> Timeline<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the value a property holds before any tween touches it.
    /// Must be called before the first tween on that property.
    pub fn property<T: Animatable>(&mut self, key: K, base: T) -> Result<&mut Self, TimelineError> {
        match self.tracks.get(&key) {
            Some(existing) if T::as_track(existing).is_none() => return Err(TimelineError::TypeMismatch),
            Some(_) => {}
            None => {
                self.tracks.insert(key, T::wrap(Track::new(base)));
            }
        }
        Ok(self)
    }

    pub fn to<T: Animatable>(
        &mut self,
        key: K,
        to: T,
        duration: f32,
        ease: Ease,
        at: f32,
    ) -> Result<&mut Self, TimelineError> {
        self.insert(key, Tween::to(to, at, duration, ease))
    }

    pub fn from_to<T: Animatable>(
        &mut self,
        key: K,
        from: T,
        to: T,
        duration: f32,
        ease: Ease,
        at: f32,
    ) -> Result<&mut Self, TimelineError> {
        self.insert(key, Tween::from_to(from, to, at, duration, ease))
    }

    fn insert<T: Animatable>(&mut self, key: K, tween: Tween<T>) -> Result<&mut Self, TimelineError> {
        let fallback = tween.from.unwrap_or(tween.to);
        let track = self
            .tracks
            .entry(key)
            .or_insert_with(|| T::wrap(Track::new(fallback)));
        T::as_track_mut(track)
            .ok_or(TimelineError::TypeMismatch)?
            .insert(tween)?;
        Ok(self)
    }

    pub fn label(&mut self, name: impl Into<String>, at: f32) -> &mut Self {
        self.labels.push((name.into(), at));
        self
    }

    pub fn label_time(&self, name: &str) -> Option<f32> {
        self.labels.iter().find(|(n, _)| n == name).map(|(_, t)| *t)
    }

    /// End of the last tween on any track.
    pub fn duration(&self) -> f32 {
        self.tracks.values().map(AnyTrack::end).fold(0.0, f32::max)
    }

    pub fn track<T: Animatable>(&self, key: K) -> Option<&Track<T>> {
        self.tracks.get(&key).and_then(T::as_track)
    }

    pub fn sample<T: Animatable>(&self, key: K, t: f32) -> Option<T> {
        self.track::<T>(key).map(|track| track.sample(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Prop {
        Spin,
        Position,
    }

    #[test]
    fn duration_is_latest_tween_end() {
        let mut tl = Timeline::new();
        tl.to(Prop::Spin, 1.0_f32, 1.0, Ease::Linear, 0.0).unwrap();
        tl.to(Prop::Position, Vec3::ONE, 1.5, Ease::Linear, 2.0).unwrap();
        assert_abs_diff_eq!(tl.duration(), 3.5);
    }

    #[test]
    fn base_value_used_by_first_to_tween() {
        let mut tl = Timeline::new();
        tl.property(Prop::Position, Vec3::new(0.0, 20.0, 90.0))
            .unwrap()
            .to(Prop::Position, Vec3::ZERO, 1.0, Ease::Linear, 1.0)
            .unwrap();

        let mid: Vec3 = tl.sample(Prop::Position, 1.5).unwrap();
        assert!(mid.abs_diff_eq(Vec3::new(0.0, 10.0, 45.0), 1e-5));
        let before: Vec3 = tl.sample(Prop::Position, 0.0).unwrap();
        assert_eq!(before, Vec3::new(0.0, 20.0, 90.0));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let mut tl = Timeline::new();
        tl.property(Prop::Spin, 0.0_f32).unwrap();
        let err = tl.to(Prop::Spin, Vec3::ONE, 1.0, Ease::Linear, 0.0).err();
        assert_eq!(err, Some(TimelineError::TypeMismatch));
        assert!(tl.sample::<Vec3>(Prop::Spin, 0.0).is_none());
    }

    #[test]
    fn labels_are_found_by_name() {
        let mut tl: Timeline<Prop> = Timeline::new();
        tl.label("step-1", 0.0).label("step-2", 1.0);
        assert_eq!(tl.label_time("step-2"), Some(1.0));
        assert_eq!(tl.label_time("missing"), None);
    }
}
