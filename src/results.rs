//! Result extractor - turns the converged displacement vector into
//! engineering quantities along the pile

use serde::{Deserialize, Serialize};

use crate::assembly;
use crate::math::{self, Vec6};
use crate::mesh::{Mesh, DOF_PER_NODE};
use crate::solver::Solution;
use crate::soil::SpringKind;
use crate::springs::Spring;

/// Nodal displacements at one depth
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodeResult {
    pub depth: f64,
    /// Axial settlement in m, positive downward
    pub settlement: f64,
    /// Lateral deflection in m
    pub deflection: f64,
    /// Rotation in rad
    pub rotation: f64,
}

/// Internal forces at both ends of one element
///
/// Tension-positive axial force; shear and moment follow the beam sign
/// convention, so a continuous bending moment diagram reads `moment_top`
/// of each element going down.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ElementForces {
    pub depth_top: f64,
    pub depth_bottom: f64,
    pub axial_top: f64,
    pub shear_top: f64,
    pub moment_top: f64,
    pub axial_bottom: f64,
    pub shear_bottom: f64,
    pub moment_bottom: f64,
}

/// State of one soil spring at convergence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpringResult {
    pub depth: f64,
    pub kind: SpringKind,
    /// Displacement along the spring DOF (m or rad)
    pub displacement: f64,
    /// Mobilized resistance (kN or kN·m)
    pub resistance: f64,
    /// Fraction of ultimate capacity in [0, 1]; 0 for unbounded curves
    pub mobilization: f64,
}

/// Reaction forces at a supported node
///
/// `K·u - F` at the node's restrained DOFs. Soil springs co-located with
/// the support carry their mobilized resistance in that balance, so the
/// reaction is the external force the support itself must supply on top
/// of the soil; applying it back as a nodal load reproduces the same
/// displacement state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reaction {
    pub node: usize,
    pub depth: f64,
    pub axial: f64,
    pub lateral: f64,
    pub moment: f64,
}

/// Full output of one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub nodes: Vec<NodeResult>,
    pub forces: Vec<ElementForces>,
    pub springs: Vec<SpringResult>,
    pub reactions: Vec<Reaction>,
    pub iterations: usize,
    pub residual: f64,
    pub clamp_engaged: bool,
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    /// Lateral deflection at the pile head in m
    pub fn head_deflection(&self) -> f64 {
        self.nodes[0].deflection
    }

    /// Rotation at the pile head in rad
    pub fn head_rotation(&self) -> f64 {
        self.nodes[0].rotation
    }

    /// Settlement at the pile head in m
    pub fn head_settlement(&self) -> f64 {
        self.nodes[0].settlement
    }

    /// Largest absolute bending moment along the pile in kN·m
    pub fn max_abs_moment(&self) -> f64 {
        self.forces
            .iter()
            .flat_map(|f| [f.moment_top.abs(), f.moment_bottom.abs()])
            .fold(0.0, f64::max)
    }

    /// Highest mobilization across the lateral springs
    pub fn max_mobilization(&self) -> f64 {
        self.springs
            .iter()
            .filter(|s| s.kind == SpringKind::Lateral)
            .map(|s| s.mobilization)
            .fold(0.0, f64::max)
    }
}

/// Build the report from a converged solution
///
/// `dof_reactions` come from the boundary-condition handler;
/// `reaction_nodes` limits the report to nodes the caller actually
/// supported, so the internal axial auto-restraint does not leak out.
pub fn extract(
    mesh: &Mesh,
    springs: &[Spring],
    solution: &Solution,
    dof_reactions: &[(usize, f64)],
    reaction_nodes: &[usize],
) -> AnalysisReport {
    let u = &solution.displacements;

    let nodes = mesh
        .nodes
        .iter()
        .map(|n| {
            let base = n.index * DOF_PER_NODE;
            NodeResult {
                depth: n.depth,
                settlement: u[base],
                deflection: u[base + 1],
                rotation: u[base + 2],
            }
        })
        .collect();

    let axial = assembly::element_axial_forces(mesh, u);
    let forces = mesh
        .elements
        .iter()
        .map(|e| {
            let (n_eff, _) = math::clamped_axial_force(axial[e.index], e.ei, e.length);
            let k_local = math::beam_local_stiffness(e.ei, e.ea, e.length)
                + math::beam_geometric_stiffness(n_eff, e.length);

            let t = e.top * DOF_PER_NODE;
            let b = e.bottom * DOF_PER_NODE;
            let d = Vec6::from_row_slice(&[u[t], u[t + 1], u[t + 2], u[b], u[b + 1], u[b + 2]]);
            let q = k_local * d;

            ElementForces {
                depth_top: mesh.nodes[e.top].depth,
                depth_bottom: mesh.nodes[e.bottom].depth,
                axial_top: -q[0],
                shear_top: -q[1],
                moment_top: -q[2],
                axial_bottom: q[3],
                shear_bottom: q[4],
                moment_bottom: q[5],
            }
        })
        .collect();

    let spring_results = springs
        .iter()
        .map(|s| {
            let displacement = u[s.dof()];
            SpringResult {
                depth: s.depth,
                kind: s.kind,
                displacement,
                resistance: s.resistance(displacement),
                mobilization: s.mobilization(displacement),
            }
        })
        .collect();

    let mut reactions: Vec<Reaction> = reaction_nodes
        .iter()
        .map(|&node| Reaction {
            node,
            depth: mesh.nodes[node].depth,
            axial: 0.0,
            lateral: 0.0,
            moment: 0.0,
        })
        .collect();
    for &(dof, value) in dof_reactions {
        let node = dof / DOF_PER_NODE;
        if let Some(reaction) = reactions.iter_mut().find(|r| r.node == node) {
            match dof % DOF_PER_NODE {
                0 => reaction.axial = value,
                1 => reaction.lateral = value,
                _ => reaction.moment = value,
            }
        }
    }

    AnalysisReport {
        nodes,
        forces,
        springs: spring_results,
        reactions,
        iterations: solution.iterations,
        residual: solution.residual,
        clamp_engaged: solution.clamp_engaged,
        warnings: solution.warnings.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BoundaryConditions;
    use crate::loads::Support;
    use crate::math::Vec as FEVec;
    use crate::mesh::Mesh;
    use crate::pile::{Material, Pile};
    use crate::solver::{solve, SolverOptions};
    use approx::assert_relative_eq;

    #[test]
    fn test_cantilever_moment_diagram() {
        // Head fixed, tip loaded: moment varies linearly from P·L to zero
        let pile = Pile::circular("P1", 6.0, 1.0, 0.02, Material::steel()).unwrap();
        let mesh = Mesh::build(&pile, None, &[], 1.5).unwrap();
        let bc = BoundaryConditions::build(&mesh, &[(0, Support::fixed())], false);

        let mut loads = FEVec::zeros(mesh.ndof());
        let tip = mesh.toe() * DOF_PER_NODE + 1;
        loads[tip] = 20.0;

        let solution = solve(&mesh, &[], &bc, &loads, &SolverOptions::default(), None).unwrap();
        let reactions = Vec::new();
        let report = extract(&mesh, &[], &solution, &reactions, &[0]);

        assert_relative_eq!(
            report.forces[0].moment_top.abs(),
            20.0 * 6.0,
            max_relative = 1e-6
        );
        assert_relative_eq!(
            report.forces.last().unwrap().moment_bottom,
            0.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(report.max_abs_moment(), 120.0, max_relative = 1e-6);
    }

    #[test]
    fn test_shear_continuity_without_springs() {
        let pile = Pile::circular("P1", 6.0, 1.0, 0.02, Material::steel()).unwrap();
        let mesh = Mesh::build(&pile, None, &[], 1.5).unwrap();
        let bc = BoundaryConditions::build(&mesh, &[(0, Support::fixed())], false);

        let mut loads = FEVec::zeros(mesh.ndof());
        loads[mesh.toe() * DOF_PER_NODE + 1] = 20.0;

        let solution = solve(&mesh, &[], &bc, &loads, &SolverOptions::default(), None).unwrap();
        let report = extract(&mesh, &[], &solution, &[], &[]);

        // No distributed resistance, so shear is constant along the pile
        for f in &report.forces {
            assert_relative_eq!(f.shear_top, f.shear_bottom, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_reactions_grouped_by_node() {
        let pile = Pile::circular("P1", 6.0, 1.0, 0.02, Material::steel()).unwrap();
        let mesh = Mesh::build(&pile, None, &[], 1.5).unwrap();

        let solution = Solution {
            displacements: FEVec::zeros(mesh.ndof()),
            iterations: 1,
            residual: 0.0,
            clamp_engaged: false,
            warnings: Vec::new(),
        };
        let dof_reactions = [(0, 1.0), (1, 2.0), (2, 3.0), (3, 99.0)];
        let report = extract(&mesh, &[], &solution, &dof_reactions, &[0]);

        assert_eq!(report.reactions.len(), 1);
        assert_relative_eq!(report.reactions[0].axial, 1.0);
        assert_relative_eq!(report.reactions[0].lateral, 2.0);
        assert_relative_eq!(report.reactions[0].moment, 3.0);
    }
}
