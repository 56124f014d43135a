//! Mesh builder - discretizes the pile into nodes and beam-column elements

use serde::{Deserialize, Serialize};

use crate::error::{PileError, PileResult};
use crate::pile::Pile;
use crate::soil::SoilProfile;

/// Number of degrees of freedom per node (settlement, deflection, rotation)
pub const DOF_PER_NODE: usize = 3;

/// Tolerance for merging coincident depths
const DEPTH_TOL: f64 = 1e-6;

/// A node on the pile axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    /// Index into the mesh node list
    pub index: usize,
    /// Depth below the pile head in m
    pub depth: f64,
}

/// A two-node beam-column element, owned exclusively by the mesh
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Element {
    /// Index into the mesh element list
    pub index: usize,
    /// Upper node index
    pub top: usize,
    /// Lower node index
    pub bottom: usize,
    /// Element length in m
    pub length: f64,
    /// Bending stiffness EI in kN·m²
    pub ei: f64,
    /// Axial stiffness EA in kN
    pub ea: f64,
    /// Pile diameter at this element in m
    pub diameter: f64,
    /// Self-weight per unit length in kN/m
    pub weight_per_length: f64,
}

/// Ordered node and element lists discretizing the pile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
}

impl Mesh {
    /// Build a mesh from the pile, the optional soil profile, and any
    /// depths that must coincide with a node (loads, supports)
    ///
    /// Element boundaries land on every pile segment boundary, every soil
    /// layer interface inside the pile, and every entry of `extra_depths`;
    /// intervals longer than `element_size` are subdivided.
    pub fn build(
        pile: &Pile,
        profile: Option<&SoilProfile>,
        extra_depths: &[f64],
        element_size: f64,
    ) -> PileResult<Mesh> {
        if element_size <= 0.0 {
            return Err(PileError::Configuration(format!(
                "element size must be positive (got {})",
                element_size
            )));
        }

        let total = pile.total_length();

        if let Some(profile) = profile {
            if total > profile.bottom() + DEPTH_TOL {
                return Err(PileError::Configuration(format!(
                    "pile toe at {} m extends below the soil profile bottom at {} m",
                    total,
                    profile.bottom()
                )));
            }
            if profile.top() < -DEPTH_TOL {
                return Err(PileError::Configuration(format!(
                    "soil surface at {} m lies above the pile head",
                    profile.top()
                )));
            }
        }

        let mut breakpoints = pile.boundaries();
        if let Some(profile) = profile {
            for depth in profile.boundaries() {
                if depth > DEPTH_TOL && depth < total - DEPTH_TOL {
                    breakpoints.push(depth);
                }
            }
        }
        for &depth in extra_depths {
            if depth < -DEPTH_TOL || depth > total + DEPTH_TOL {
                return Err(PileError::DepthOutsidePile {
                    depth,
                    pile_length: total,
                });
            }
            breakpoints.push(depth.clamp(0.0, total));
        }

        breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
        breakpoints.dedup_by(|a, b| (*a - *b).abs() < DEPTH_TOL);

        // Subdivide long intervals to the target element size
        let mut depths = Vec::new();
        for pair in breakpoints.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let span = end - start;
            if span <= 0.0 {
                return Err(PileError::Configuration(format!(
                    "degenerate element between {} m and {} m",
                    start, end
                )));
            }
            let n = (span / element_size).ceil().max(1.0) as usize;
            for i in 0..n {
                depths.push(start + span * i as f64 / n as f64);
            }
        }
        depths.push(total);

        let nodes: Vec<Node> = depths
            .iter()
            .enumerate()
            .map(|(index, &depth)| Node { index, depth })
            .collect();

        let mut elements = Vec::with_capacity(nodes.len() - 1);
        for i in 0..nodes.len() - 1 {
            let top = nodes[i].depth;
            let bottom = nodes[i + 1].depth;
            let length = bottom - top;
            if length <= 0.0 {
                return Err(PileError::Configuration(format!(
                    "element {} has non-positive length {}",
                    i, length
                )));
            }
            let segment = pile.segment_at(0.5 * (top + bottom))?;
            elements.push(Element {
                index: i,
                top: i,
                bottom: i + 1,
                length,
                ei: segment.ei,
                ea: segment.ea,
                diameter: segment.diameter,
                weight_per_length: segment.weight_per_length,
            });
        }

        Ok(Mesh { nodes, elements })
    }

    /// Total number of degrees of freedom
    pub fn ndof(&self) -> usize {
        self.nodes.len() * DOF_PER_NODE
    }

    /// Index of the node at the given depth, if one exists
    pub fn node_at(&self, depth: f64) -> Option<usize> {
        self.nodes
            .iter()
            .find(|n| (n.depth - depth).abs() < DEPTH_TOL)
            .map(|n| n.index)
    }

    /// Index of the toe node
    pub fn toe(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Half the length of the elements adjacent to a node
    pub fn tributary_length(&self, node: usize) -> f64 {
        let mut length = 0.0;
        if node > 0 {
            length += self.elements[node - 1].length;
        }
        if node < self.elements.len() {
            length += self.elements[node].length;
        }
        0.5 * length
    }

    /// Pile diameter at a node, taken from the adjacent element below
    /// (above for the toe)
    pub fn diameter_at(&self, node: usize) -> f64 {
        if node < self.elements.len() {
            self.elements[node].diameter
        } else {
            self.elements[node - 1].diameter
        }
    }
}
