//! Global stiffness and load assembly
//!
//! Pure functions of the current displacement estimate; the nonlinear
//! solver calls them once per iteration.

use crate::loads::{PointLoad, UniformLoad};
use crate::math::{self, Mat, Vec as FEVec};
use crate::mesh::{Mesh, DOF_PER_NODE};
use crate::springs::Spring;

/// Recover element axial forces from the current displacement estimate
///
/// Tension positive: N = EA/L · (w_bottom - w_top).
pub fn element_axial_forces(mesh: &Mesh, u: &FEVec) -> Vec<f64> {
    mesh.elements
        .iter()
        .map(|e| {
            let w_top = u[e.top * DOF_PER_NODE];
            let w_bottom = u[e.bottom * DOF_PER_NODE];
            e.ea / e.length * (w_bottom - w_top)
        })
        .collect()
}

/// Assemble the global stiffness matrix
///
/// `K = K_elastic + K_geometric + K_springs`, with the geometric
/// contribution clamped per element so no diagonal entry goes negative
/// under compressive axial force. Returns the matrix and whether the clamp
/// engaged on any element.
pub fn assemble_stiffness(
    mesh: &Mesh,
    springs: &[Spring],
    u: &FEVec,
    axial_forces: &[f64],
) -> (Mat, bool) {
    let ndof = mesh.ndof();
    let mut k_global = Mat::zeros(ndof, ndof);
    let mut clamp_engaged = false;

    for element in &mesh.elements {
        let k_elastic = math::beam_local_stiffness(element.ei, element.ea, element.length);

        let n = axial_forces[element.index];
        let (n_eff, engaged) = math::clamped_axial_force(n, element.ei, element.length);
        clamp_engaged |= engaged;
        let k_geometric = math::beam_geometric_stiffness(n_eff, element.length);

        let k_local = k_elastic + k_geometric;

        let top_dof = element.top * DOF_PER_NODE;
        let bottom_dof = element.bottom * DOF_PER_NODE;
        for a in 0..DOF_PER_NODE {
            for b in 0..DOF_PER_NODE {
                k_global[(top_dof + a, top_dof + b)] += k_local[(a, b)];
                k_global[(top_dof + a, bottom_dof + b)] += k_local[(a, b + 3)];
                k_global[(bottom_dof + a, top_dof + b)] += k_local[(a + 3, b)];
                k_global[(bottom_dof + a, bottom_dof + b)] += k_local[(a + 3, b + 3)];
            }
        }
    }

    for spring in springs {
        let dof = spring.dof();
        k_global[(dof, dof)] += spring.secant_stiffness(u[dof]);
    }

    (k_global, clamp_engaged)
}

/// Assemble the global load vector
///
/// Point loads map directly to nodal DOFs; uniform lateral loads and
/// self-weight are lumped to the nodes of the elements they cover.
pub fn assemble_loads(
    mesh: &Mesh,
    point_loads: &[(usize, PointLoad)],
    uniform_loads: &[UniformLoad],
    self_weight: bool,
) -> FEVec {
    let mut f = FEVec::zeros(mesh.ndof());

    for &(node, load) in point_loads {
        let dof = node * DOF_PER_NODE;
        f[dof] += load.axial;
        f[dof + 1] += load.lateral;
        f[dof + 2] += load.moment;
    }

    for load in uniform_loads {
        for element in &mesh.elements {
            let top = mesh.nodes[element.top].depth;
            let bottom = mesh.nodes[element.bottom].depth;
            let overlap = bottom.min(load.bottom) - top.max(load.top);
            if overlap <= 0.0 {
                continue;
            }
            let nodal = 0.5 * load.lateral * overlap;
            f[element.top * DOF_PER_NODE + 1] += nodal;
            f[element.bottom * DOF_PER_NODE + 1] += nodal;
        }
    }

    if self_weight {
        for element in &mesh.elements {
            let nodal = 0.5 * element.weight_per_length * element.length;
            f[element.top * DOF_PER_NODE] += nodal;
            f[element.bottom * DOF_PER_NODE] += nodal;
        }
    }

    f
}
