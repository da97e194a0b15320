use crate::timeline::{Ease, TimelineError};

/// Fade-in, drift and fade-out applied to every step's text panel,
/// relative to the step's start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMotion {
    pub hidden_offset: f32,
    pub shown_offset: f32,
    pub drift_offset: f32,
    pub exit_offset: f32,

    pub enter_duration: f32,
    pub enter_ease: Ease,
    pub drift_delay: f32,
    pub drift_duration: f32,
    pub drift_ease: Ease,
    pub exit_delay: f32,
    pub exit_duration: f32,
    pub exit_ease: Ease,
}

impl Default for PanelMotion {
    fn default() -> Self {
        Self {
            hidden_offset: -200.0,
            shown_offset: 0.0,
            drift_offset: 50.0,
            exit_offset: 300.0,
            enter_duration: 1.0,
            enter_ease: Ease::Out(2),
            drift_delay: 1.0,
            drift_duration: 1.5,
            drift_ease: Ease::Linear,
            exit_delay: 2.5,
            exit_duration: 1.0,
            exit_ease: Ease::In(2),
        }
    }
}

impl PanelMotion {
    /// The panel as it looks before its step starts.
    pub fn hidden(&self) -> PanelState {
        PanelState {
            opacity: 0.0,
            offset_x: self.hidden_offset,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TimelineError> {
        let phases = [
            (0.0, self.enter_duration),
            (self.drift_delay, self.drift_duration),
            (self.exit_delay, self.exit_duration),
        ];
        for (start, duration) in phases {
            if !(start >= 0.0 && duration >= 0.0) {
                return Err(TimelineError::InvalidTiming { start, duration });
            }
        }
        Ok(())
    }
}

/// What a page applies to one panel element for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelState {
    pub opacity: f32,
    /// Horizontal translation in CSS pixels.
    pub offset_x: f32,
}

impl PanelState {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.001
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_panel_waits_off_to_the_left() {
        let hidden = PanelMotion::default().hidden();
        assert_eq!(hidden.offset_x, -200.0);
        assert!(!hidden.is_visible());
    }

    #[test]
    fn negative_phase_is_invalid() {
        let motion = PanelMotion {
            drift_duration: -1.0,
            ..Default::default()
        };
        assert!(motion.validate().is_err());
        assert!(PanelMotion::default().validate().is_ok());
    }
}
