//! One-dimensional pile analysis on a bed of nonlinear Winkler springs.
//!
//! A pile is modelled as a chain of Euler-Bernoulli beam-column elements
//! with three DOFs per node (settlement, deflection, rotation). Soil
//! resistance enters as depth-dependent nonlinear springs: distributed
//! p-y and rotational curves along the shaft plus base shear and base
//! moment springs at the toe. Equilibrium under combined axial and
//! lateral loading is found by secant-stiffness fixed-point iteration
//! with P-delta effects from the element geometric stiffness.
//!
//! # Example
//!
//! ```
//! use pile_solver::prelude::*;
//!
//! let pile = Pile::circular("demo", 15.0, 1.2, 0.025, Material::steel())?;
//! let profile = SoilProfile::new(
//!     "site",
//!     vec![SoilLayer::new("sand", 0.0, 20.0, SoilModel::elastic(5000.0))],
//! )?;
//!
//! let mut model = Model::new("demo", pile, profile);
//! model.add_point_load(0.0, PointLoad::lateral(150.0))?;
//!
//! let report = model.analyze(&SolverOptions::default())?;
//! assert!(report.head_deflection() > 0.0);
//! # Ok::<(), pile_solver::PileError>(())
//! ```

pub mod assembly;
pub mod bc;
pub mod error;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod pile;
pub mod results;
pub mod soil;
pub mod solver;
pub mod springs;

pub use error::{PileError, PileResult};

/// Common imports for building and running pile models
pub mod prelude {
    pub use crate::error::{PileError, PileResult};
    pub use crate::loads::{PointLoad, Support, UniformLoad};
    pub use crate::model::Model;
    pub use crate::pile::{Material, Pile, PileSegment};
    pub use crate::results::AnalysisReport;
    pub use crate::soil::{Curve, SoilLayer, SoilModel, SoilProfile, SpringKind};
    pub use crate::solver::SolverOptions;
}
