//! Named easing curves.

use std::f32::consts::TAU;

/// A time-remapping curve over the unit interval.
///
/// Every curve maps 0 to 0 and 1 to 1. `ElasticOut` overshoots in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out. The default smooth ease.
    Power1Out,
    /// Quartic ease-in-out.
    Power3InOut,
    /// Exponential ease-in-out.
    ExpoInOut,
    /// Decaying sine that overshoots the target and settles.
    ElasticOut { amplitude: f32, period: f32 },
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Power1Out
    }
}

impl Easing {
    pub const fn elastic_out(amplitude: f32, period: f32) -> Self {
        Easing::ElasticOut { amplitude, period }
    }

    /// Evaluate the curve at progress `t` (clamped to [0, 1]).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::Power1Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv
            }
            Easing::Power3InOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::ExpoInOut => {
                if t < 0.5 {
                    expo_in(t * 2.0) / 2.0
                } else {
                    1.0 - expo_in((1.0 - t) * 2.0) / 2.0
                }
            }
            Easing::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }
}

fn expo_in(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * (t - 1.0))
    }
}

fn elastic_out(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    // Amplitudes below 1 shorten the period instead of damping the swing.
    let a = amplitude.max(1.0);
    let p = period.max(f32::EPSILON) / amplitude.min(1.0).max(f32::EPSILON);
    let shift = p / TAU * (1.0 / a).asin();
    a * 2.0_f32.powf(-10.0 * t) * ((t - shift) * TAU / p).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CURVES: [Easing; 5] = [
        Easing::Linear,
        Easing::Power1Out,
        Easing::Power3InOut,
        Easing::ExpoInOut,
        Easing::ElasticOut { amplitude: 1.0, period: 0.4 },
    ];

    #[test]
    fn test_endpoints() {
        for curve in CURVES {
            assert!(curve.apply(0.0).abs() < 1e-6, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-6, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_in_out_curves_are_symmetric_at_midpoint() {
        assert!((Easing::Power3InOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::ExpoInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots_then_settles() {
        let curve = Easing::elastic_out(1.0, 0.4);
        let peak = (1..100)
            .map(|i| curve.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.1, "peak {peak}");
        assert!((curve.apply(0.95) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_power1_out_is_front_loaded() {
        assert!(Easing::Power1Out.apply(0.25) > 0.25);
        assert!((Easing::Power1Out.apply(0.5) - 0.75).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn monotonic_curves_stay_in_unit_range(t in 0.0f32..=1.0, i in 0usize..4) {
            let v = CURVES[i].apply(t);
            prop_assert!((-1e-6..=1.0 + 1e-6).contains(&v));
        }

        #[test]
        fn input_is_clamped(t in -10.0f32..10.0) {
            for curve in CURVES {
                prop_assert_eq!(curve.apply(t), curve.apply(t.clamp(0.0, 1.0)));
            }
        }
    }
}
