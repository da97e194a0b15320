use super::tween::{Lerp, Tween};
use super::TimelineError;

const OVERLAP_EPSILON: f32 = 1e-4;

/// Every tween that animates one property, kept sorted by start time.
#[derive(Debug, Clone)]
pub struct Track<T> {
    base: T,
    tweens: Vec<Tween<T>>,
}

impl<T: Lerp> Track<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            tweens: Vec::new(),
        }
    }

    pub fn base(&self) -> T {
        self.base
    }

    pub fn tweens(&self) -> &[Tween<T>] {
        &self.tweens
    }

    pub fn end(&self) -> f32 {
        self.tweens.iter().map(Tween::end).fold(0.0, f32::max)
    }

    /// Inserts a tween and re-resolves the implicit start value of every
    /// "to" tween, so sampling never depends on what was sampled before.
    pub fn insert(&mut self, tween: Tween<T>) -> Result<(), TimelineError> {
        if tween.duration < 0.0 || !tween.duration.is_finite() || !tween.start.is_finite() {
            return Err(TimelineError::InvalidTiming {
                start: tween.start,
                duration: tween.duration,
            });
        }

        let index = self.tweens.partition_point(|t| t.start <= tween.start);
        if let Some(prev) = index.checked_sub(1).map(|i| &self.tweens[i]) {
            if prev.end() > tween.start + OVERLAP_EPSILON {
                return Err(TimelineError::Overlap {
                    existing: prev.start,
                    new: tween.start,
                });
            }
        }
        if let Some(next) = self.tweens.get(index) {
            if tween.end() > next.start + OVERLAP_EPSILON {
                return Err(TimelineError::Overlap {
                    existing: next.start,
                    new: tween.start,
                });
            }
        }

        self.tweens.insert(index, tween);
        self.resolve();
        Ok(())
    }

    fn resolve(&mut self) {
        let mut held = self.base;
        for tween in &mut self.tweens {
            if !tween.explicit_from {
                tween.from = Some(held);
            }
            held = tween.to;
        }
    }

    /// Value at timeline time `t`.
    ///
    /// The latest tween that has started governs. Before the first tween the
    /// track shows that tween's explicit start value, or the base value.
    pub fn sample(&self, t: f32) -> T {
        let started = self.tweens.partition_point(|tween| tween.start <= t);
        match started.checked_sub(1) {
            Some(i) => self.tweens[i].value_at(t, self.base),
            None => match self.tweens.first() {
                Some(first) if first.explicit_from => first.from.unwrap_or(self.base),
                _ => self.base,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Ease;
    use approx::assert_abs_diff_eq;

    #[test]
    fn to_tweens_chain_from_previous_end() {
        let mut track = Track::new(1.0_f32);
        track.insert(Tween::to(5.0, 0.0, 1.0, Ease::Linear)).unwrap();
        track.insert(Tween::to(9.0, 1.0, 1.0, Ease::Linear)).unwrap();

        assert_abs_diff_eq!(track.sample(0.5), 3.0);
        assert_abs_diff_eq!(track.sample(1.5), 7.0);
        assert_abs_diff_eq!(track.sample(10.0), 9.0);
    }

    #[test]
    fn out_of_order_inserts_resolve_the_same() {
        let mut forward = Track::new(0.0_f32);
        forward.insert(Tween::to(2.0, 0.0, 1.0, Ease::Linear)).unwrap();
        forward.insert(Tween::to(4.0, 2.0, 1.0, Ease::Linear)).unwrap();

        let mut backward = Track::new(0.0_f32);
        backward.insert(Tween::to(4.0, 2.0, 1.0, Ease::Linear)).unwrap();
        backward.insert(Tween::to(2.0, 0.0, 1.0, Ease::Linear)).unwrap();

        for i in 0..=40 {
            let t = i as f32 * 0.1;
            assert_eq!(forward.sample(t), backward.sample(t));
        }
        // gap between tweens holds the previous end value
        assert_abs_diff_eq!(forward.sample(1.5), 2.0);
    }

    #[test]
    fn explicit_from_renders_before_start() {
        let mut track = Track::new(1.0_f32);
        track
            .insert(Tween::from_to(0.0, 1.0, 2.0, 1.0, Ease::Linear))
            .unwrap();
        assert_eq!(track.sample(0.0), 0.0);

        let mut plain = Track::new(1.0_f32);
        plain.insert(Tween::to(0.0, 2.0, 1.0, Ease::Linear)).unwrap();
        assert_eq!(plain.sample(0.0), 1.0);
    }

    #[test]
    fn rejects_overlap() {
        let mut track = Track::new(0.0_f32);
        track.insert(Tween::to(1.0, 0.0, 2.0, Ease::Linear)).unwrap();
        let err = track.insert(Tween::to(2.0, 1.0, 1.0, Ease::Linear));
        assert!(matches!(err, Err(TimelineError::Overlap { .. })));

        let err = track.insert(Tween::to(2.0, -0.5, 1.0, Ease::Linear));
        assert!(matches!(err, Err(TimelineError::Overlap { .. })));
    }

    #[test]
    fn touching_tweens_are_allowed() {
        let mut track = Track::new(0.0_f32);
        track.insert(Tween::to(1.0, 1.0, 1.5, Ease::Linear)).unwrap();
        track.insert(Tween::to(2.0, 2.5, 1.0, Ease::Linear)).unwrap();
        assert_eq!(track.end(), 3.5);
    }

    #[test]
    fn rejects_negative_duration() {
        let mut track = Track::new(0.0_f32);
        assert!(matches!(
            track.insert(Tween::to(1.0, 0.0, -1.0, Ease::Linear)),
            Err(TimelineError::InvalidTiming { .. })
        ));
    }
}
