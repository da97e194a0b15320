use glam::Vec3;

use super::Ease;

/// Values a tween can blend between.
pub trait Lerp: Copy + PartialEq + std::fmt::Debug {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(self, to: Self, t: f32) -> Self {
        Vec3::lerp(self, to, t)
    }
}

/// A single property animation placed on a timeline.
///
/// `from` is `None` for "to" tweens until the owning track resolves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween<T> {
    pub start: f32,
    pub duration: f32,
    pub from: Option<T>,
    pub to: T,
    pub ease: Ease,
    pub(crate) explicit_from: bool,
}

impl<T: Lerp> Tween<T> {
    pub fn to(to: T, start: f32, duration: f32, ease: Ease) -> Self {
        Self {
            start,
            duration,
            from: None,
            to,
            ease,
            explicit_from: false,
        }
    }

    pub fn from_to(from: T, to: T, start: f32, duration: f32, ease: Ease) -> Self {
        Self {
            start,
            duration,
            from: Some(from),
            to,
            ease,
            explicit_from: true,
        }
    }

    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Eased progress at timeline time `t`; zero-length tweens jump at `start`.
    pub fn progress(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        self.ease.apply((t - self.start) / self.duration)
    }

    pub fn value_at(&self, t: f32, fallback_from: T) -> T {
        let from = self.from.unwrap_or(fallback_from);
        match self.progress(t) {
            p if p >= 1.0 => self.to,
            p if p <= 0.0 => from,
            p => from.lerp(self.to, p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_tween_midpoint() {
        let tween = Tween::from_to(0.0_f32, 10.0, 2.0, 4.0, Ease::Linear);
        assert_abs_diff_eq!(tween.value_at(4.0, 0.0), 5.0);
        assert_eq!(tween.end(), 6.0);
    }

    #[test]
    fn holds_outside_its_window() {
        let tween = Tween::from_to(Vec3::ZERO, Vec3::X, 1.0, 1.0, Ease::default());
        assert_eq!(tween.value_at(0.0, Vec3::ZERO), Vec3::ZERO);
        assert_eq!(tween.value_at(5.0, Vec3::ZERO), Vec3::X);
    }

    #[test]
    fn zero_duration_jumps() {
        let tween = Tween::to(3.0_f32, 1.0, 0.0, Ease::Linear);
        assert_eq!(tween.value_at(0.99, 1.0), 1.0);
        assert_eq!(tween.value_at(1.0, 1.0), 3.0);
    }
}
