//! Soil model catalog - generates resistance curves by spring kind and depth

use serde::{Deserialize, Serialize};

use crate::error::PileResult;
use crate::soil::curve::Curve;

/// Matlock soft-clay backbone, p/pu at multiples of the reference
/// displacement yc (p/pu = 0.5·(y/yc)^(1/3), capped at 8·yc)
const MATLOCK_SHAPE: [(f64, f64); 5] = [
    (0.1, 0.232),
    (0.3, 0.335),
    (1.0, 0.5),
    (3.0, 0.721),
    (8.0, 1.0),
];

/// A soil constitutive model for one layer
///
/// Each variant can generate resistance curves for the spring kinds it
/// supports; kinds a model does not cover return `None` and produce no
/// spring. The kernel only ever sees [`Curve`] values, never the formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SoilModel {
    /// Depth-independent linear springs, mainly for verification against
    /// closed-form beam-on-elastic-foundation solutions
    Elastic {
        /// Lateral subgrade reaction in kN/m² (p per unit y, per m of pile)
        lateral_subgrade: f64,
        /// Rotational subgrade reaction in kN·m/m per rad, if any
        rotational_subgrade: Option<f64>,
        /// Toe shear stiffness in kN/m, if any
        base_shear_stiffness: Option<f64>,
        /// Toe moment stiffness in kN·m/rad, if any
        base_moment_stiffness: Option<f64>,
    },
    /// API RP 2A cyclic-sand p-y curve (hyperbolic tangent)
    ApiSand {
        /// Effective friction angle in degrees
        friction_angle: f64,
        /// Effective unit weight in kN/m³
        effective_unit_weight: f64,
        /// Initial modulus of subgrade reaction k in kN/m³
        initial_modulus: f64,
    },
    /// Matlock soft-clay static p-y curve
    ApiClay {
        /// Undrained shear strength in kPa
        undrained_strength: f64,
        /// Effective unit weight in kN/m³
        effective_unit_weight: f64,
        /// Strain at half the maximum stress in a UU test (typ. 0.005-0.02)
        strain_at_half: f64,
    },
    /// User-supplied sampled curves; positive-branch points, origin implicit
    Custom {
        py_points: Vec<(f64, f64)>,
        mt_points: Option<Vec<(f64, f64)>>,
        base_shear_points: Option<Vec<(f64, f64)>>,
        base_moment_points: Option<Vec<(f64, f64)>>,
    },
}

impl SoilModel {
    /// Lateral p-y curve at the given depth below the soil surface
    ///
    /// Resistance is per unit length of pile (kN/m per m of deflection for
    /// the linear case); the spring evaluator scales by tributary length.
    pub fn py_curve(&self, depth: f64, diameter: f64) -> PileResult<Curve> {
        match self {
            Self::Elastic {
                lateral_subgrade, ..
            } => Ok(Curve::Linear {
                stiffness: *lateral_subgrade,
            }),
            Self::ApiSand {
                friction_angle,
                effective_unit_weight,
                initial_modulus,
            } => Ok(api_sand_py(
                *friction_angle,
                *effective_unit_weight,
                *initial_modulus,
                depth,
                diameter,
            )),
            Self::ApiClay {
                undrained_strength,
                effective_unit_weight,
                strain_at_half,
            } => matlock_clay_py(
                *undrained_strength,
                *effective_unit_weight,
                *strain_at_half,
                depth,
                diameter,
            ),
            Self::Custom { py_points, .. } => Curve::piecewise(py_points.clone()),
        }
    }

    /// Distributed rotational m-t curve, where the model provides one
    pub fn mt_curve(&self, _depth: f64, _diameter: f64) -> PileResult<Option<Curve>> {
        match self {
            Self::Elastic {
                rotational_subgrade: Some(k),
                ..
            } => Ok(Some(Curve::Linear { stiffness: *k })),
            Self::Custom {
                mt_points: Some(points),
                ..
            } => Ok(Some(Curve::piecewise(points.clone())?)),
            _ => Ok(None),
        }
    }

    /// Base shear (Hb) curve at the pile toe, where the model provides one
    pub fn base_shear_curve(&self, _depth: f64, _diameter: f64) -> PileResult<Option<Curve>> {
        match self {
            Self::Elastic {
                base_shear_stiffness: Some(k),
                ..
            } => Ok(Some(Curve::Linear { stiffness: *k })),
            Self::Custom {
                base_shear_points: Some(points),
                ..
            } => Ok(Some(Curve::piecewise(points.clone())?)),
            _ => Ok(None),
        }
    }

    /// Base moment (Mb) curve at the pile toe, where the model provides one
    pub fn base_moment_curve(&self, _depth: f64, _diameter: f64) -> PileResult<Option<Curve>> {
        match self {
            Self::Elastic {
                base_moment_stiffness: Some(k),
                ..
            } => Ok(Some(Curve::Linear { stiffness: *k })),
            Self::Custom {
                base_moment_points: Some(points),
                ..
            } => Ok(Some(Curve::piecewise(points.clone())?)),
            _ => Ok(None),
        }
    }

    /// Linear elastic model with lateral springs only
    pub fn elastic(lateral_subgrade: f64) -> Self {
        Self::Elastic {
            lateral_subgrade,
            rotational_subgrade: None,
            base_shear_stiffness: None,
            base_moment_stiffness: None,
        }
    }
}

/// API sand: p = A·pu·tanh(k·z·y / (A·pu))
fn api_sand_py(phi: f64, gamma: f64, k: f64, z: f64, d: f64) -> Curve {
    // Coefficient fits to the API RP 2A design charts
    let c1 = 0.115 * 10f64.powf(0.0405 * phi);
    let c2 = 0.571 * 10f64.powf(0.022 * phi);
    let c3 = 0.646 * 10f64.powf(0.0555 * phi);

    let pu_shallow = (c1 * z + c2 * d) * gamma * z;
    let pu_deep = c3 * d * gamma * z;
    let pu = pu_shallow.min(pu_deep);

    // Static loading factor, floored at 0.9 for deep springs
    let a = (3.0 - 0.8 * z / d).max(0.9);

    Curve::Tanh {
        initial: k * z,
        ultimate: a * pu,
    }
}

/// Matlock soft clay: pu = min(3 + γ'z/su + J·z/D, 9)·su·D, yc = 2.5·ε50·D
fn matlock_clay_py(su: f64, gamma: f64, eps50: f64, z: f64, d: f64) -> PileResult<Curve> {
    const J: f64 = 0.5;
    let npu = (3.0 + gamma * z / su + J * z / d).min(9.0);
    let pu = npu * su * d;
    let yc = 2.5 * eps50 * d;

    let points = MATLOCK_SHAPE
        .iter()
        .map(|&(y_ratio, p_ratio)| (y_ratio * yc, p_ratio * pu))
        .collect();
    Curve::piecewise(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_elastic_model_curves() {
        let model = SoilModel::elastic(5000.0);
        let py = model.py_curve(3.0, 1.0).unwrap();
        assert_relative_eq!(py.secant_stiffness(0.0), 5000.0);
        assert!(model.mt_curve(3.0, 1.0).unwrap().is_none());
        assert!(model.base_shear_curve(3.0, 1.0).unwrap().is_none());
    }

    #[test]
    fn test_api_sand_ultimate_grows_with_depth() {
        let model = SoilModel::ApiSand {
            friction_angle: 35.0,
            effective_unit_weight: 10.0,
            initial_modulus: 22000.0,
        };
        let shallow = model.py_curve(1.0, 1.0).unwrap();
        let deep = model.py_curve(10.0, 1.0).unwrap();
        assert!(deep.ultimate() > shallow.ultimate());
        // Zero resistance right at the surface
        let surface = model.py_curve(0.0, 1.0).unwrap();
        assert_relative_eq!(surface.resistance(0.1), 0.0);
    }

    #[test]
    fn test_matlock_clay_capacity_cap() {
        let model = SoilModel::ApiClay {
            undrained_strength: 50.0,
            effective_unit_weight: 8.0,
            strain_at_half: 0.01,
        };
        // Deep enough that the bearing factor caps at 9
        let deep = model.py_curve(100.0, 1.0).unwrap();
        assert_relative_eq!(deep.ultimate(), 9.0 * 50.0 * 1.0, max_relative = 1e-9);

        let shallow = model.py_curve(0.0, 1.0).unwrap();
        assert_relative_eq!(shallow.ultimate(), 3.0 * 50.0 * 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_custom_model_all_kinds() {
        let model = SoilModel::Custom {
            py_points: vec![(0.01, 10.0), (0.1, 20.0)],
            mt_points: Some(vec![(0.001, 5.0)]),
            base_shear_points: Some(vec![(0.02, 100.0)]),
            base_moment_points: None,
        };
        assert!(model.py_curve(1.0, 1.0).is_ok());
        assert!(model.mt_curve(1.0, 1.0).unwrap().is_some());
        assert!(model.base_shear_curve(1.0, 1.0).unwrap().is_some());
        assert!(model.base_moment_curve(1.0, 1.0).unwrap().is_none());
    }
}
