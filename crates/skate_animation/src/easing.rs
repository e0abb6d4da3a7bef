//! Easing curves
//!
//! The cubic curves match the "power2" family used by common web tweening libraries,
//! so durations authored against them produce the same motion.

use std::f32::consts::PI;

/// Maps linear progress in `0..=1` onto eased progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// No easing
    #[default]
    Linear,
    /// Cubic acceleration from zero velocity
    EaseIn,
    /// Cubic deceleration to zero velocity
    EaseOut,
    /// Cubic acceleration then deceleration
    EaseInOut,
    /// Sinusoidal acceleration then deceleration
    SineInOut,
}

impl Easing {
    /// Apply the curve. Input is clamped to `0..=1`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn test_in_lags_and_out_leads() {
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!((Easing::EaseIn.apply(0.5) - 0.125).abs() < 1e-6);
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::EaseOut.apply(3.0), 1.0);
    }
}
