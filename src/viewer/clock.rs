const FIRST_FRAME: f32 = 1.0 / 60.0;
const MAX_STEP: f32 = 0.1;

/// Per-frame delta time, clamped so a stalled tab does not produce one
/// huge step.
pub struct FrameClock {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
    last: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
            last: None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now() / 1000.0)
            .unwrap_or(0.0)
    }

    pub fn tick(&mut self) -> f32 {
        let now = self.now();
        self.step_to(now)
    }

    fn step_to(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => (now - last) as f32,
            None => FIRST_FRAME,
        };
        self.last = Some(now);
        dt.clamp(0.0, MAX_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn first_frame_assumes_sixty_hz() {
        let mut clock = FrameClock::new();
        assert_abs_diff_eq!(clock.step_to(10.0), FIRST_FRAME);
        assert_abs_diff_eq!(clock.step_to(10.02), 0.02, epsilon = 1e-5);
    }

    #[test]
    fn long_stalls_are_clamped() {
        let mut clock = FrameClock::new();
        clock.step_to(0.0);
        assert_eq!(clock.step_to(5.0), MAX_STEP);
        assert_eq!(clock.step_to(4.0), 0.0);
    }
}
