//! Nonlinear soil resistance curves

use serde::{Deserialize, Serialize};

use crate::error::{PileError, PileResult};

/// Kind of soil spring attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpringKind {
    /// Distributed lateral resistance (p-y)
    Lateral,
    /// Distributed rotational resistance (m-t)
    Rotational,
    /// Shear resistance at the pile toe (Hb)
    BaseShear,
    /// Moment resistance at the pile toe (Mb)
    BaseMoment,
}

/// A monotone resistance curve: displacement (or rotation) to resisting
/// force (or moment)
///
/// Curves are odd-symmetric: `resistance(-u) == -resistance(u)`. The solver
/// relies on the curve being monotone non-decreasing in displacement
/// magnitude, which every variant guarantees by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveData")]
pub enum Curve {
    /// Linear spring with no capacity limit
    Linear { stiffness: f64 },
    /// Hyperbolic-tangent curve with initial tangent stiffness and
    /// asymptotic ultimate resistance (API sand shape)
    Tanh { initial: f64, ultimate: f64 },
    /// Sampled monotone curve, linearly interpolated, flat beyond the last
    /// point; the origin is implicit
    PiecewiseLinear { points: Vec<(f64, f64)> },
}

impl Curve {
    /// Create a validated piecewise-linear curve
    ///
    /// Points are (displacement, resistance) pairs for the positive branch.
    /// Displacements must be strictly increasing and positive; resistances
    /// must be non-negative and non-decreasing.
    pub fn piecewise(points: Vec<(f64, f64)>) -> PileResult<Self> {
        if points.is_empty() {
            return Err(PileError::Configuration(
                "piecewise curve needs at least one point".to_string(),
            ));
        }
        let mut prev = (0.0, 0.0);
        for &(u, p) in &points {
            if u <= prev.0 {
                return Err(PileError::Configuration(format!(
                    "piecewise curve displacements must be strictly increasing (got {} after {})",
                    u, prev.0
                )));
            }
            if p < prev.1 {
                return Err(PileError::Configuration(format!(
                    "piecewise curve resistance must be non-decreasing (got {} after {})",
                    p, prev.1
                )));
            }
            prev = (u, p);
        }
        Ok(Self::PiecewiseLinear { points })
    }

    /// Resistance at the given displacement, odd-symmetric in `u`
    pub fn resistance(&self, u: f64) -> f64 {
        let mag = u.abs();
        let value = match self {
            Self::Linear { stiffness } => stiffness * mag,
            Self::Tanh { initial, ultimate } => {
                if *ultimate <= 0.0 {
                    0.0
                } else {
                    ultimate * (initial * mag / ultimate).tanh()
                }
            }
            Self::PiecewiseLinear { points } => interpolate(points, mag),
        };
        value.copysign(u)
    }

    /// Tangent stiffness at the origin
    pub fn initial_stiffness(&self) -> f64 {
        match self {
            Self::Linear { stiffness } => *stiffness,
            Self::Tanh { initial, ultimate } => {
                if *ultimate <= 0.0 {
                    0.0
                } else {
                    *initial
                }
            }
            Self::PiecewiseLinear { points } => {
                let (u0, p0) = points[0];
                p0 / u0
            }
        }
    }

    /// Ultimate resistance; infinite for an unbounded linear curve
    pub fn ultimate(&self) -> f64 {
        match self {
            Self::Linear { .. } => f64::INFINITY,
            Self::Tanh { ultimate, .. } => *ultimate,
            Self::PiecewiseLinear { points } => points.last().map(|&(_, p)| p).unwrap_or(0.0),
        }
    }

    /// Secant stiffness at the given displacement
    ///
    /// Returns the initial tangent at `u == 0` so the first iteration of the
    /// nonlinear solve never divides by zero. Always non-negative.
    pub fn secant_stiffness(&self, u: f64) -> f64 {
        if u == 0.0 {
            self.initial_stiffness()
        } else {
            self.resistance(u) / u
        }
    }

    /// Fraction of the ultimate resistance engaged at the given displacement
    ///
    /// In [0, 1] for bounded curves; 0.0 for an unbounded linear curve.
    pub fn mobilization(&self, u: f64) -> f64 {
        let ultimate = self.ultimate();
        if !ultimate.is_finite() || ultimate <= 0.0 {
            0.0
        } else {
            (self.resistance(u).abs() / ultimate).min(1.0)
        }
    }
}

/// Mirror of [`Curve`] used during deserialization so sampled points pass
/// the same validation as [`Curve::piecewise`]
#[derive(Deserialize)]
enum CurveData {
    Linear { stiffness: f64 },
    Tanh { initial: f64, ultimate: f64 },
    PiecewiseLinear { points: Vec<(f64, f64)> },
}

impl TryFrom<CurveData> for Curve {
    type Error = PileError;

    fn try_from(data: CurveData) -> Result<Self, Self::Error> {
        match data {
            CurveData::Linear { stiffness } => Ok(Self::Linear { stiffness }),
            CurveData::Tanh { initial, ultimate } => Ok(Self::Tanh { initial, ultimate }),
            CurveData::PiecewiseLinear { points } => Self::piecewise(points),
        }
    }
}

fn interpolate(points: &[(f64, f64)], mag: f64) -> f64 {
    let mut prev = (0.0, 0.0);
    for &(u, p) in points {
        if mag <= u {
            let t = (mag - prev.0) / (u - prev.0);
            return prev.1 + t * (p - prev.1);
        }
        prev = (u, p);
    }
    prev.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_curve() {
        let curve = Curve::Linear { stiffness: 100.0 };
        assert_relative_eq!(curve.resistance(0.01), 1.0);
        assert_relative_eq!(curve.resistance(-0.01), -1.0);
        assert_relative_eq!(curve.secant_stiffness(0.0), 100.0);
        assert_relative_eq!(curve.secant_stiffness(0.5), 100.0);
        assert_eq!(curve.mobilization(1.0), 0.0);
    }

    #[test]
    fn test_tanh_curve_saturates() {
        let curve = Curve::Tanh {
            initial: 1000.0,
            ultimate: 50.0,
        };
        assert_relative_eq!(curve.secant_stiffness(0.0), 1000.0);
        // tanh rounds to 1.0 well before u = 10, so the resistance sits
        // exactly on the asymptote there; it must never exceed it
        assert!(curve.resistance(10.0) <= 50.0);
        assert_relative_eq!(curve.resistance(10.0), 50.0, max_relative = 1e-9);
        // Below saturation the curve is strictly inside the asymptote
        assert!(curve.resistance(0.2) < 50.0);
        assert!(curve.resistance(0.2) > 49.9);
        assert!(curve.mobilization(10.0) <= 1.0);
        // Odd symmetry
        assert_relative_eq!(curve.resistance(-0.02), -curve.resistance(0.02));
    }

    #[test]
    fn test_piecewise_interpolation_and_cap() {
        let curve = Curve::piecewise(vec![(0.01, 5.0), (0.05, 8.0), (0.1, 10.0)]).unwrap();
        assert_relative_eq!(curve.initial_stiffness(), 500.0);
        assert_relative_eq!(curve.resistance(0.005), 2.5);
        assert_relative_eq!(curve.resistance(0.03), 6.5);
        // Flat past the last sampled point
        assert_relative_eq!(curve.resistance(0.5), 10.0);
        assert_relative_eq!(curve.ultimate(), 10.0);
        assert_relative_eq!(curve.mobilization(0.5), 1.0);
    }

    #[test]
    fn test_piecewise_rejects_non_monotone() {
        assert!(Curve::piecewise(vec![(0.02, 5.0), (0.01, 8.0)]).is_err());
        assert!(Curve::piecewise(vec![(0.01, 5.0), (0.02, 4.0)]).is_err());
        assert!(Curve::piecewise(vec![]).is_err());
    }

    #[test]
    fn test_deserialize_rejects_non_monotone_points() {
        let bad = r#"{"PiecewiseLinear":{"points":[[0.02,5.0],[0.01,8.0]]}}"#;
        assert!(serde_json::from_str::<Curve>(bad).is_err());

        let good = r#"{"PiecewiseLinear":{"points":[[0.01,5.0],[0.02,8.0]]}}"#;
        let curve = serde_json::from_str::<Curve>(good).unwrap();
        assert_relative_eq!(curve.resistance(0.01), 5.0);
    }

    #[test]
    fn test_secant_never_negative() {
        let curves = [
            Curve::Linear { stiffness: 10.0 },
            Curve::Tanh {
                initial: 100.0,
                ultimate: 5.0,
            },
            Curve::piecewise(vec![(0.01, 1.0), (0.1, 2.0)]).unwrap(),
        ];
        for curve in &curves {
            for u in [-1.0, -0.01, 0.0, 0.01, 1.0] {
                assert!(curve.secant_stiffness(u) >= 0.0);
            }
        }
    }
}
