//! Applied loads and support conditions

use serde::{Deserialize, Serialize};

/// Concentrated load applied at a node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PointLoad {
    /// Axial force in kN, positive downward
    pub axial: f64,
    /// Lateral force in kN
    pub lateral: f64,
    /// Moment in kN·m
    pub moment: f64,
}

impl PointLoad {
    /// Create a general point load
    pub fn new(axial: f64, lateral: f64, moment: f64) -> Self {
        Self {
            axial,
            lateral,
            moment,
        }
    }

    /// Lateral force only
    pub fn lateral(value: f64) -> Self {
        Self {
            lateral: value,
            ..Default::default()
        }
    }

    /// Axial force only, positive downward
    pub fn axial(value: f64) -> Self {
        Self {
            axial: value,
            ..Default::default()
        }
    }

    /// Moment only
    pub fn moment(value: f64) -> Self {
        Self {
            moment: value,
            ..Default::default()
        }
    }
}

/// Uniform lateral load over a depth range, lumped to nodes at assembly
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UniformLoad {
    /// Top of the loaded range in m
    pub top: f64,
    /// Bottom of the loaded range in m
    pub bottom: f64,
    /// Lateral intensity in kN/m
    pub lateral: f64,
}

impl UniformLoad {
    /// Create a uniform lateral load over `[top, bottom]`
    pub fn lateral(top: f64, bottom: f64, intensity: f64) -> Self {
        Self {
            top,
            bottom,
            lateral: intensity,
        }
    }
}

/// Support conditions at a node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Support {
    /// Restrained in axial translation (settlement)
    pub axial: bool,
    /// Restrained in lateral translation (deflection)
    pub lateral: bool,
    /// Restrained in rotation
    pub rotation: bool,

    /// Prescribed axial displacement in m, if restrained and nonzero
    pub prescribed_axial: Option<f64>,
    /// Prescribed lateral displacement in m
    pub prescribed_lateral: Option<f64>,
    /// Prescribed rotation in rad
    pub prescribed_rotation: Option<f64>,
}

impl Support {
    /// All three DOFs restrained
    pub fn fixed() -> Self {
        Self {
            axial: true,
            lateral: true,
            rotation: true,
            ..Default::default()
        }
    }

    /// Translations restrained, rotation free
    pub fn pinned() -> Self {
        Self {
            axial: true,
            lateral: true,
            ..Default::default()
        }
    }

    /// Lateral translation restrained only
    pub fn lateral_only() -> Self {
        Self {
            lateral: true,
            ..Default::default()
        }
    }

    /// Axial translation restrained only
    pub fn axial_only() -> Self {
        Self {
            axial: true,
            ..Default::default()
        }
    }

    /// Create a support with specific restraints
    pub fn with_restraints(axial: bool, lateral: bool, rotation: bool) -> Self {
        Self {
            axial,
            lateral,
            rotation,
            ..Default::default()
        }
    }

    /// Prescribe a lateral displacement (restrains the DOF)
    pub fn with_prescribed_lateral(mut self, value: f64) -> Self {
        self.prescribed_lateral = Some(value);
        self.lateral = true;
        self
    }

    /// Prescribe an axial displacement (restrains the DOF)
    pub fn with_prescribed_axial(mut self, value: f64) -> Self {
        self.prescribed_axial = Some(value);
        self.axial = true;
        self
    }

    /// Prescribe a rotation (restrains the DOF)
    pub fn with_prescribed_rotation(mut self, value: f64) -> Self {
        self.prescribed_rotation = Some(value);
        self.rotation = true;
        self
    }

    /// Restraint mask in DOF order [axial, lateral, rotation]
    pub fn restraints(&self) -> [bool; 3] {
        [self.axial, self.lateral, self.rotation]
    }

    /// Prescribed displacement values in DOF order
    pub fn prescribed(&self) -> [Option<f64>; 3] {
        [
            self.prescribed_axial,
            self.prescribed_lateral,
            self.prescribed_rotation,
        ]
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.axial || self.lateral || self.rotation
    }
}
