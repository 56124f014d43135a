//! Mathematical utilities: beam-column element matrices and linear solve

use nalgebra::{DMatrix, DVector, SMatrix, SVector};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 6x6 matrix for a two-node beam-column element
/// (DOF order: settlement, deflection, rotation at each node)
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for element forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Compute the local stiffness matrix for an Euler-Bernoulli beam-column
///
/// # Arguments
/// * `ei` - Bending stiffness in kN·m²
/// * `ea` - Axial stiffness in kN
/// * `length` - Element length in m
pub fn beam_local_stiffness(ei: f64, ea: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = ea / l;
    let ei_l3 = ei / l3;
    let ei_l2 = ei / l2;
    let ei_l = ei / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at top
        ea_l,   0.0,           0.0,          -ea_l,  0.0,           0.0,
        // Row 1: shear at top
        0.0,    12.0*ei_l3,    6.0*ei_l2,    0.0,    -12.0*ei_l3,   6.0*ei_l2,
        // Row 2: moment at top
        0.0,    6.0*ei_l2,     4.0*ei_l,     0.0,    -6.0*ei_l2,    2.0*ei_l,
        // Row 3: axial at bottom
        -ea_l,  0.0,           0.0,          ea_l,   0.0,           0.0,
        // Row 4: shear at bottom
        0.0,    -12.0*ei_l3,   -6.0*ei_l2,   0.0,    12.0*ei_l3,    -6.0*ei_l2,
        // Row 5: moment at bottom
        0.0,    6.0*ei_l2,     2.0*ei_l,     0.0,    -6.0*ei_l2,    4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the consistent geometric stiffness matrix for an element
///
/// # Arguments
/// * `n` - Axial force (positive = tension, negative = compression)
/// * `length` - Element length in m
pub fn beam_geometric_stiffness(n: f64, length: f64) -> Mat6 {
    if n.abs() < 1e-10 {
        return Mat6::zeros();
    }

    let l = length;
    let l2 = l * l;
    let n_l = n / l;

    #[rustfmt::skip]
    let data = [
        0.0,  0.0,            0.0,               0.0,  0.0,            0.0,
        0.0,  6.0*n_l/5.0,    n_l*l/10.0,        0.0,  -6.0*n_l/5.0,   n_l*l/10.0,
        0.0,  n_l*l/10.0,     2.0*n_l*l2/15.0,   0.0,  -n_l*l/10.0,    -n_l*l2/30.0,
        0.0,  0.0,            0.0,               0.0,  0.0,            0.0,
        0.0,  -6.0*n_l/5.0,   -n_l*l/10.0,       0.0,  6.0*n_l/5.0,    -n_l*l/10.0,
        0.0,  n_l*l/10.0,     -n_l*l2/30.0,      0.0,  -n_l*l/10.0,    2.0*n_l*l2/15.0,
    ];

    Mat6::from_row_slice(&data)
}

/// Clamp a compressive axial force so the combined elastic + geometric
/// lateral diagonal term stays non-negative
///
/// Invariant: for N >= -10·EI/L², 12EI/L³ + (6/5)·N/L >= 0. Returns the
/// clamped force and whether the clamp engaged.
pub fn clamped_axial_force(n: f64, ei: f64, length: f64) -> (f64, bool) {
    let limit = -10.0 * ei / (length * length);
    if n < limit {
        (limit, true)
    } else {
        (n, false)
    }
}

/// Solve a linear system using LU decomposition
///
/// Returns `None` for singular and numerically rank-deficient matrices;
/// round-off can leave a tiny pivot where an exact factorization would
/// produce zero, so pivots are checked relative to the largest one.
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    let lu = a.clone().lu();
    let u = lu.u();

    let mut max_pivot = 0.0f64;
    let mut min_pivot = f64::INFINITY;
    for i in 0..u.nrows().min(u.ncols()) {
        let pivot = u[(i, i)].abs();
        max_pivot = max_pivot.max(pivot);
        min_pivot = min_pivot.min(pivot);
    }
    if min_pivot <= max_pivot * 1e-12 {
        return None;
    }

    lu.solve(b)
}
