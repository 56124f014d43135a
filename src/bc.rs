//! Boundary condition handler - restraint masks, partitioned solve,
//! and reaction recovery

use crate::error::{PileError, PileResult};
use crate::loads::Support;
use crate::math::{Mat, Vec as FEVec};
use crate::mesh::{Mesh, DOF_PER_NODE};

/// Restraint state for every DOF of a mesh
///
/// Built once per analysis; the solver reuses it every iteration. When
/// `axial_active` is false (no axial loads, self-weight, or axial
/// restraints in the model) every axial DOF is pinned to zero so the
/// axial block cannot render the system singular.
#[derive(Debug, Clone)]
pub struct BoundaryConditions {
    restrained: Vec<bool>,
    prescribed: Vec<f64>,
    free: Vec<usize>,
}

impl BoundaryConditions {
    /// Build the restraint mask from nodal supports
    pub fn build(mesh: &Mesh, supports: &[(usize, Support)], axial_active: bool) -> Self {
        let ndof = mesh.ndof();
        let mut restrained = vec![false; ndof];
        let mut prescribed = vec![0.0; ndof];

        if !axial_active {
            for node in 0..mesh.nodes.len() {
                restrained[node * DOF_PER_NODE] = true;
            }
        }

        for &(node, support) in supports {
            let base = node * DOF_PER_NODE;
            let mask = support.restraints();
            let values = support.prescribed();
            for i in 0..DOF_PER_NODE {
                if mask[i] {
                    restrained[base + i] = true;
                    prescribed[base + i] = values[i].unwrap_or(0.0);
                }
            }
        }

        let free = (0..ndof).filter(|&d| !restrained[d]).collect();
        Self {
            restrained,
            prescribed,
            free,
        }
    }

    /// Whether a DOF is restrained
    pub fn is_restrained(&self, dof: usize) -> bool {
        self.restrained[dof]
    }

    /// Indices of the free DOFs
    pub fn free_dofs(&self) -> &[usize] {
        &self.free
    }

    /// Whether any prescribed displacement is nonzero
    pub fn has_prescribed(&self) -> bool {
        self.prescribed.iter().any(|&v| v != 0.0)
    }

    /// Solve `K·u = F` with restrained DOFs eliminated
    ///
    /// Prescribed displacements are enforced by moving their stiffness
    /// coupling to the right-hand side. The returned vector has the full
    /// DOF count with prescribed values filled in. A singular reduced
    /// system means the model has a rigid-body mode.
    pub fn solve(&self, k: &Mat, f: &FEVec) -> PileResult<FEVec> {
        let n_free = self.free.len();
        let mut k_ff = Mat::zeros(n_free, n_free);
        let mut f_f = FEVec::zeros(n_free);

        for (i, &di) in self.free.iter().enumerate() {
            let mut rhs = f[di];
            for (dj, &value) in self.prescribed.iter().enumerate() {
                if self.restrained[dj] && value != 0.0 {
                    rhs -= k[(di, dj)] * value;
                }
            }
            f_f[i] = rhs;
            for (j, &dj) in self.free.iter().enumerate() {
                k_ff[(i, j)] = k[(di, dj)];
            }
        }

        let u_f = crate::math::solve_linear_system(&k_ff, &f_f).ok_or_else(|| {
            PileError::UnderconstrainedModel(
                "stiffness matrix is singular; the pile has a rigid-body mode \
                 (no soil springs or supports restrain it)"
                    .to_string(),
            )
        })?;

        let mut u = FEVec::zeros(k.nrows());
        for (dof, &value) in self.prescribed.iter().enumerate() {
            if self.restrained[dof] {
                u[dof] = value;
            }
        }
        for (i, &di) in self.free.iter().enumerate() {
            u[di] = u_f[i];
        }
        Ok(u)
    }

    /// Recover reactions at restrained DOFs: `R = K·u - F`
    pub fn reactions(&self, k: &Mat, u: &FEVec, f: &FEVec) -> Vec<(usize, f64)> {
        let internal = k * u;
        self.restrained
            .iter()
            .enumerate()
            .filter(|(_, &r)| r)
            .map(|(dof, _)| (dof, internal[dof] - f[dof]))
            .collect()
    }

    /// Euclidean norm of a vector over the free DOFs only
    pub fn free_norm(&self, v: &FEVec) -> f64 {
        self.free
            .iter()
            .map(|&d| v[d] * v[d])
            .sum::<f64>()
            .sqrt()
    }
}
