//! Named easing curves.
//!
//! Variants follow the curves web animation libraries name `power2.out`,
//! `power3.in`, `elastic.out(1, 0.3)` and so on.

use crate::constants::{ELASTIC_AMPLITUDE, ELASTIC_PERIOD};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out. Default when nothing else is given.
    Power1Out,
    /// Cubic ease-out.
    Power2Out,
    /// Cubic S-curve.
    Power2InOut,
    /// Quartic ease-out.
    Power3Out,
    /// Quartic ease-in; `Power3Out` played backwards.
    Power3In,
    /// Overshoot-and-settle. `amplitude` >= 1, `period` in (0, 1].
    ElasticOut { amplitude: f64, period: f64 },
}

impl Default for Ease {
    fn default() -> Self {
        Self::Power1Out
    }
}

impl Ease {
    pub const ELASTIC: Ease = Ease::ElasticOut {
        amplitude: ELASTIC_AMPLITUDE,
        period: ELASTIC_PERIOD,
    };

    /// Map linear progress `t` in [0, 1] to eased progress.
    ///
    /// Endpoints are exact: `apply(0) == 0`, `apply(1) == 1`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Self::Linear => t,
            Self::Power1Out => 1.0 - (1.0 - t).powi(2),
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Power3Out => 1.0 - (1.0 - t).powi(4),
            Self::Power3In => t.powi(4),
            Self::ElasticOut { amplitude, period } => {
                let a = amplitude.max(1.0);
                let p = if period > 0.0 { period } else { ELASTIC_PERIOD };
                let s = p / TAU * (1.0 / a).asin();
                a * 2f64.powf(-10.0 * t) * ((t - s) * TAU / p).sin() + 1.0
            }
        }
    }
}
