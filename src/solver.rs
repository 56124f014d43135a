//! Nonlinear solver - secant stiffness fixed-point iteration with
//! under-relaxation and divergence detection

use serde::{Deserialize, Serialize};

use crate::assembly;
use crate::bc::BoundaryConditions;
use crate::error::{PileError, PileResult};
use crate::math::Vec as FEVec;
use crate::mesh::Mesh;
use crate::springs::Spring;

/// Solver controls with field defaults suitable for routine analyses
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Relative unbalanced-force tolerance
    pub tolerance: f64,
    /// Iteration cap before giving up
    pub max_iterations: usize,
    /// Under-relaxation factor in (0, 1]; 1.0 applies updates in full
    pub relaxation: f64,
    /// Consecutive residual increases before declaring divergence
    pub divergence_streak: usize,
    /// Displacement norm beyond which the solution is considered blown up
    pub displacement_limit: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
            relaxation: 1.0,
            divergence_streak: 3,
            displacement_limit: 1e6,
        }
    }
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }
}

/// Converged state of the equilibrium iteration
#[derive(Debug, Clone)]
pub struct Solution {
    /// Full displacement vector, prescribed values included
    pub displacements: FEVec,
    /// Iterations taken to converge
    pub iterations: usize,
    /// Final relative unbalanced-force residual
    pub residual: f64,
    /// Whether the geometric stiffness clamp engaged on any element
    pub clamp_engaged: bool,
    /// Advisory messages accumulated during the solve
    pub warnings: Vec<String>,
}

/// Run the secant-stiffness fixed-point iteration
///
/// Each pass assembles the stiffness at the current displacement
/// estimate, solves the linearized system, applies under-relaxation, and
/// measures the unbalanced force at the updated state. Linear models
/// converge on the first pass because the initial secant is exact.
pub fn solve(
    mesh: &Mesh,
    springs: &[Spring],
    bc: &BoundaryConditions,
    loads: &FEVec,
    options: &SolverOptions,
    warm_start: Option<&FEVec>,
) -> PileResult<Solution> {
    if options.relaxation <= 0.0 || options.relaxation > 1.0 {
        return Err(PileError::Configuration(format!(
            "relaxation factor must lie in (0, 1] (got {})",
            options.relaxation
        )));
    }
    if options.tolerance <= 0.0 {
        return Err(PileError::Configuration(format!(
            "tolerance must be positive (got {})",
            options.tolerance
        )));
    }

    let mut u = match warm_start {
        Some(start) => {
            if start.len() != mesh.ndof() {
                return Err(PileError::Configuration(format!(
                    "warm start has {} DOFs, model has {}",
                    start.len(),
                    mesh.ndof()
                )));
            }
            start.clone()
        }
        None => FEVec::zeros(mesh.ndof()),
    };

    let load_norm = bc.free_norm(loads).max(1.0);
    let mut clamp_engaged = false;
    let mut warnings = Vec::new();
    let mut previous_residual = f64::INFINITY;
    let mut growth_streak = 0usize;
    let mut residual = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        let axial = assembly::element_axial_forces(mesh, &u);
        let (k, clamped) = assembly::assemble_stiffness(mesh, springs, &u, &axial);
        if clamped && !clamp_engaged {
            clamp_engaged = true;
            let message =
                "geometric stiffness clamp engaged; axial compression exceeds the element \
                 stability limit and P-delta softening is capped"
                    .to_string();
            log::warn!("{}", message);
            warnings.push(message);
        }

        let u_trial = bc.solve(&k, loads)?;
        let u_next = if options.relaxation < 1.0 {
            &u_trial * options.relaxation + &u * (1.0 - options.relaxation)
        } else {
            u_trial
        };

        // Unbalanced force at the updated state, secants re-evaluated there
        let axial_next = assembly::element_axial_forces(mesh, &u_next);
        let (k_next, _) = assembly::assemble_stiffness(mesh, springs, &u_next, &axial_next);
        let unbalanced = loads - &k_next * &u_next;
        residual = bc.free_norm(&unbalanced) / load_norm;

        log::debug!("iteration {}: residual {:.3e}", iteration, residual);

        if residual <= options.tolerance {
            return Ok(Solution {
                displacements: u_next,
                iterations: iteration,
                residual,
                clamp_engaged,
                warnings,
            });
        }

        if !residual.is_finite() || bc.free_norm(&u_next) > options.displacement_limit {
            return Err(PileError::Diverged {
                iteration,
                residual,
            });
        }
        if residual > previous_residual {
            growth_streak += 1;
            if growth_streak >= options.divergence_streak {
                return Err(PileError::Diverged {
                    iteration,
                    residual,
                });
            }
        } else {
            growth_streak = 0;
        }

        previous_residual = residual;
        u = u_next;
    }

    Err(PileError::MaxIterationsExceeded {
        iterations: options.max_iterations,
        residual,
        tolerance: options.tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, DOF_PER_NODE};
    use crate::pile::{Material, Pile};
    use crate::springs::build_springs;
    use crate::soil::{SoilLayer, SoilModel, SoilProfile};

    fn linear_system() -> (Mesh, Vec<Spring>, BoundaryConditions, FEVec) {
        let pile = Pile::circular("P1", 10.0, 1.0, 0.02, Material::steel()).unwrap();
        let profile = SoilProfile::new(
            "site",
            vec![SoilLayer::new("sand", 0.0, 12.0, SoilModel::elastic(5000.0))],
        )
        .unwrap();
        let mesh = Mesh::build(&pile, Some(&profile), &[], 1.0).unwrap();
        let springs = build_springs(&mesh, &profile).unwrap();
        let bc = BoundaryConditions::build(&mesh, &[], false);

        let mut loads = FEVec::zeros(mesh.ndof());
        loads[1] = 100.0;
        (mesh, springs, bc, loads)
    }

    #[test]
    fn test_linear_model_converges_in_one_iteration() {
        let (mesh, springs, bc, loads) = linear_system();
        let solution = solve(
            &mesh,
            &springs,
            &bc,
            &loads,
            &SolverOptions::default(),
            None,
        )
        .unwrap();

        assert_eq!(solution.iterations, 1);
        assert!(solution.residual <= 1e-6);
        assert!(!solution.clamp_engaged);
        assert!(solution.displacements[1] > 0.0);
    }

    #[test]
    fn test_under_relaxation_still_converges() {
        let (mesh, springs, bc, loads) = linear_system();
        let options = SolverOptions::default().with_relaxation(0.5);
        let solution = solve(&mesh, &springs, &bc, &loads, &options, None).unwrap();

        assert!(solution.iterations > 1);
        assert!(solution.residual <= options.tolerance);
    }

    #[test]
    fn test_warm_start_accepted() {
        let (mesh, springs, bc, loads) = linear_system();
        let first = solve(
            &mesh,
            &springs,
            &bc,
            &loads,
            &SolverOptions::default(),
            None,
        )
        .unwrap();
        let again = solve(
            &mesh,
            &springs,
            &bc,
            &loads,
            &SolverOptions::default(),
            Some(&first.displacements),
        )
        .unwrap();
        assert_eq!(again.iterations, 1);
    }

    #[test]
    fn test_warm_start_wrong_length_rejected() {
        let (mesh, springs, bc, loads) = linear_system();
        let bad = FEVec::zeros(3);
        let err = solve(
            &mesh,
            &springs,
            &bc,
            &loads,
            &SolverOptions::default(),
            Some(&bad),
        )
        .unwrap_err();
        assert!(matches!(err, PileError::Configuration(_)));
    }

    #[test]
    fn test_invalid_relaxation_rejected() {
        let (mesh, springs, bc, loads) = linear_system();
        let options = SolverOptions::default().with_relaxation(1.5);
        let err = solve(&mesh, &springs, &bc, &loads, &options, None).unwrap_err();
        assert!(matches!(err, PileError::Configuration(_)));
    }

    fn clay_system() -> (Mesh, Vec<Spring>, BoundaryConditions, FEVec) {
        let pile = Pile::circular("P1", 10.0, 1.0, 0.02, Material::steel()).unwrap();
        let profile = SoilProfile::new(
            "site",
            vec![SoilLayer::new(
                "clay",
                0.0,
                12.0,
                SoilModel::ApiClay {
                    undrained_strength: 50.0,
                    effective_unit_weight: 8.0,
                    strain_at_half: 0.01,
                },
            )],
        )
        .unwrap();
        let mesh = Mesh::build(&pile, Some(&profile), &[], 1.0).unwrap();
        let springs = build_springs(&mesh, &profile).unwrap();
        let bc = BoundaryConditions::build(&mesh, &[], false);
        let mut loads = FEVec::zeros(mesh.ndof());
        loads[1] = 500.0;
        (mesh, springs, bc, loads)
    }

    #[test]
    fn test_max_iterations_exceeded() {
        let (mesh, springs, bc, loads) = clay_system();
        let options = SolverOptions::default()
            .with_tolerance(1e-16)
            .with_max_iterations(2);
        let err = solve(&mesh, &springs, &bc, &loads, &options, None).unwrap_err();
        assert!(matches!(
            err,
            PileError::MaxIterationsExceeded { iterations: 2, .. }
        ));
    }

    #[test]
    fn test_displacement_blowup_reported_as_divergence() {
        // Nonlinear system whose first estimate already exceeds the limit:
        // the unbalanced residual cannot have converged yet, so the guard
        // must report divergence with the iteration it tripped at
        let (mesh, springs, bc, loads) = clay_system();
        let options = SolverOptions {
            displacement_limit: 1e-6,
            ..SolverOptions::default()
        };
        let err = solve(&mesh, &springs, &bc, &loads, &options, None).unwrap_err();
        assert!(matches!(err, PileError::Diverged { iteration: 1, .. }));
    }

    #[test]
    fn test_head_deflection_positive_under_lateral_load() {
        let (mesh, springs, bc, loads) = linear_system();
        let solution = solve(
            &mesh,
            &springs,
            &bc,
            &loads,
            &SolverOptions::default(),
            None,
        )
        .unwrap();

        // Deflection decays with depth under a head load
        let head = solution.displacements[1];
        let toe = solution.displacements[mesh.toe() * DOF_PER_NODE + 1];
        assert!(head > toe.abs());
    }
}
