//! Scroll-to-progress mapping and section pinning

use std::cell::Cell;
use std::rc::Rc;

/// Where the scroll window sits on the page and how it behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTriggerConfig {
    /// Scroll offset at which the section's top meets the viewport's top.
    pub start_offset: f64,
    /// Pixels of scrolling that span the whole timeline.
    pub distance: f64,
    /// Keep the section fixed in the viewport while the window is active.
    pub pin: bool,
    /// Show start/end marker lines.
    pub markers: bool,
}

impl Default for ScrollTriggerConfig {
    fn default() -> Self {
        Self {
            start_offset: 0.0,
            distance: 4000.0,
            pin: true,
            markers: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinState {
    /// Window not reached; the section scrolls normally.
    Before,
    /// Section fixed to the viewport top.
    Pinned,
    /// Window passed; the section sits `offset` pixels below its
    /// original place, on top of the pin spacer.
    After { offset: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Markers {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    config: ScrollTriggerConfig,
}

impl ScrollTrigger {
    pub fn new(config: ScrollTriggerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScrollTriggerConfig {
        &self.config
    }

    pub fn set_start_offset(&mut self, offset: f64) {
        self.config.start_offset = offset;
    }

    pub fn start(&self) -> f64 {
        self.config.start_offset
    }

    pub fn end(&self) -> f64 {
        self.config.start_offset + self.config.distance.max(0.0)
    }

    /// Normalised progress in `[0, 1]` for a page scroll offset.
    pub fn progress(&self, scroll_y: f64) -> f32 {
        let distance = self.config.distance;
        if distance <= 0.0 {
            return if scroll_y >= self.start() { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start()) / distance).clamp(0.0, 1.0) as f32
    }

    pub fn pin_state(&self, scroll_y: f64) -> PinState {
        if !self.config.pin || scroll_y < self.start() {
            PinState::Before
        } else if scroll_y <= self.end() {
            PinState::Pinned
        } else {
            PinState::After {
                offset: self.config.distance,
            }
        }
    }

    /// Extra page height the pin needs so the section can be scrolled
    /// through; zero when not pinning.
    pub fn pin_spacing(&self) -> f64 {
        if self.config.pin {
            self.config.distance.max(0.0)
        } else {
            0.0
        }
    }

    pub fn markers(&self) -> Option<Markers> {
        self.config.markers.then(|| Markers {
            start: self.start(),
            end: self.end(),
        })
    }
}

/// Shared page scroll offset, written by whatever drives scrolling
/// (mouse wheel natively, the page's scroll event on the web).
#[derive(Debug, Clone, Default)]
pub struct ScrollPosition(Rc<Cell<f64>>);

impl ScrollPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, value: f64) {
        self.0.set(value);
    }

    /// Adds `delta` and clamps into `[0, max]`.
    pub fn scroll_by(&self, delta: f64, max: f64) {
        self.0.set((self.0.get() + delta).clamp(0.0, max.max(0.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn trigger() -> ScrollTrigger {
        ScrollTrigger::new(ScrollTriggerConfig {
            start_offset: 500.0,
            ..Default::default()
        })
    }

    #[test]
    fn progress_is_linear_and_clamped() {
        let t = trigger();
        assert_eq!(t.progress(0.0), 0.0);
        assert_eq!(t.progress(500.0), 0.0);
        assert_abs_diff_eq!(t.progress(1500.0), 0.25);
        assert_abs_diff_eq!(t.progress(2500.0), 0.5);
        assert_eq!(t.progress(4500.0), 1.0);
        assert_eq!(t.progress(9000.0), 1.0);
    }

    #[test]
    fn default_window_is_4000px() {
        let t = ScrollTrigger::new(ScrollTriggerConfig::default());
        assert_eq!(t.end() - t.start(), 4000.0);
        assert_eq!(t.pin_spacing(), 4000.0);
    }

    #[test]
    fn pin_states_follow_window() {
        let t = trigger();
        assert_eq!(t.pin_state(100.0), PinState::Before);
        assert_eq!(t.pin_state(500.0), PinState::Pinned);
        assert_eq!(t.pin_state(4500.0), PinState::Pinned);
        assert_eq!(t.pin_state(4501.0), PinState::After { offset: 4000.0 });
    }

    #[test]
    fn no_pin_means_no_spacing() {
        let t = ScrollTrigger::new(ScrollTriggerConfig {
            pin: false,
            ..Default::default()
        });
        assert_eq!(t.pin_state(100.0), PinState::Before);
        assert_eq!(t.pin_spacing(), 0.0);
    }

    #[test]
    fn markers_only_when_enabled() {
        let mut config = ScrollTriggerConfig {
            start_offset: 10.0,
            markers: true,
            ..Default::default()
        };
        let markers = ScrollTrigger::new(config).markers().unwrap();
        assert_eq!(markers, Markers { start: 10.0, end: 4010.0 });

        config.markers = false;
        assert!(ScrollTrigger::new(config).markers().is_none());
    }

    #[test]
    fn scroll_position_clamps() {
        let pos = ScrollPosition::new();
        let shared = pos.clone();
        pos.scroll_by(-50.0, 100.0);
        assert_eq!(shared.get(), 0.0);
        pos.scroll_by(250.0, 100.0);
        assert_eq!(shared.get(), 100.0);
    }
}
