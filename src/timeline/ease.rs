use std::fmt;
use std::str::FromStr;

use super::TimelineError;

/// Polynomial easing curves, named the way scroll-animation pages name them
/// (`"power2.out"`, `"linear"`, ...).
///
/// The power number `n` maps to a polynomial of degree `n + 1`, so `power0`
/// is linear and `power1` is quadratic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    In(u8),
    Out(u8),
    InOut(u8),
}

impl Default for Ease {
    fn default() -> Self {
        Self::Out(1)
    }
}

impl Ease {
    pub const MAX_POWER: u8 = 4;

    /// Maps linear progress to eased progress. Input is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::In(n) => t.powi(Self::degree(n)),
            Ease::Out(n) => 1.0 - (1.0 - t).powi(Self::degree(n)),
            Ease::InOut(n) => {
                let p = Self::degree(n);
                if t < 0.5 {
                    (2.0 * t).powi(p) / 2.0
                } else {
                    1.0 - (2.0 * (1.0 - t)).powi(p) / 2.0
                }
            }
        }
    }

    fn degree(power: u8) -> i32 {
        i32::from(power.min(Self::MAX_POWER)) + 1
    }
}

impl FromStr for Ease {
    type Err = TimelineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || TimelineError::UnknownEase(name.to_owned());
        let lower = name.trim().to_ascii_lowercase();

        if lower == "none" || lower == "linear" {
            return Ok(Ease::Linear);
        }

        let (family, direction) = match lower.split_once('.') {
            Some((family, direction)) => (family, direction),
            None => (lower.as_str(), "out"),
        };

        let power = match family {
            "power0" => 0,
            "power1" | "quad" => 1,
            "power2" | "cubic" => 2,
            "power3" | "quart" => 3,
            "power4" | "quint" | "strong" => 4,
            _ => return Err(unknown()),
        };

        if power == 0 {
            return Ok(Ease::Linear);
        }

        match direction {
            "in" => Ok(Ease::In(power)),
            "out" => Ok(Ease::Out(power)),
            "inout" => Ok(Ease::InOut(power)),
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => write!(f, "linear"),
            Ease::In(n) => write!(f, "power{n}.in"),
            Ease::Out(n) => write!(f, "power{n}.out"),
            Ease::InOut(n) => write!(f, "power{n}.inOut"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Ease; 7] = [
        Ease::Linear,
        Ease::In(1),
        Ease::Out(1),
        Ease::InOut(1),
        Ease::In(2),
        Ease::Out(2),
        Ease::InOut(4),
    ];

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert_abs_diff_eq!(ease.apply(0.0), 0.0);
            assert_abs_diff_eq!(ease.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Out(2).apply(-3.0), 0.0);
        assert_eq!(Ease::In(2).apply(7.0), 1.0);
    }

    #[test]
    fn curves_match_their_polynomials() {
        assert_abs_diff_eq!(Ease::Out(1).apply(0.5), 0.75);
        assert_abs_diff_eq!(Ease::Out(2).apply(0.5), 0.875);
        assert_abs_diff_eq!(Ease::In(2).apply(0.5), 0.125);
        assert_abs_diff_eq!(Ease::InOut(1).apply(0.25), 0.125);
        assert_abs_diff_eq!(Ease::InOut(1).apply(0.5), 0.5);
        assert_abs_diff_eq!(Ease::InOut(1).apply(0.75), 0.875);
    }

    #[test]
    fn monotonic() {
        for ease in ALL {
            let mut last = 0.0;
            for i in 1..=100 {
                let v = ease.apply(i as f32 / 100.0);
                assert!(v >= last, "{ease} not monotonic at step {i}");
                last = v;
            }
        }
    }

    #[test]
    fn parses_page_names() {
        assert_eq!("power2.out".parse::<Ease>().unwrap(), Ease::Out(2));
        assert_eq!("power2.in".parse::<Ease>().unwrap(), Ease::In(2));
        assert_eq!("power1.inOut".parse::<Ease>().unwrap(), Ease::InOut(1));
        assert_eq!("linear".parse::<Ease>().unwrap(), Ease::Linear);
        assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
        assert_eq!("cubic.in".parse::<Ease>().unwrap(), Ease::In(2));
        assert_eq!("power3".parse::<Ease>().unwrap(), Ease::Out(3));
        assert_eq!("power0.inOut".parse::<Ease>().unwrap(), Ease::Linear);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(matches!(
            "elastic.out".parse::<Ease>(),
            Err(TimelineError::UnknownEase(name)) if name == "elastic.out"
        ));
        assert!("power2.sideways".parse::<Ease>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for ease in ALL {
            assert_eq!(ease.to_string().parse::<Ease>().unwrap(), ease);
        }
    }
}
