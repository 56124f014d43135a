//! Analysis model - ties the pile, soil profile, loads, and supports
//! together and drives the solution pipeline

use serde::{Deserialize, Serialize};

use crate::assembly;
use crate::bc::BoundaryConditions;
use crate::error::{PileError, PileResult};
use crate::loads::{PointLoad, Support, UniformLoad};
use crate::mesh::Mesh;
use crate::pile::Pile;
use crate::results::{self, AnalysisReport};
use crate::soil::SoilProfile;
use crate::solver::{self, SolverOptions};
use crate::springs;

const DEFAULT_ELEMENT_SIZE: f64 = 0.5;

/// A single-pile analysis model
///
/// Depth coordinates are measured from the pile head, positive downward.
/// Loads and supports are anchored by depth; the mesh builder guarantees
/// a node at each anchored depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub pile: Pile,
    pub soil: Option<SoilProfile>,
    supports: Vec<(f64, Support)>,
    point_loads: Vec<(f64, PointLoad)>,
    uniform_loads: Vec<UniformLoad>,
    self_weight: bool,
    element_size: f64,
}

impl Model {
    /// Create a model of a pile embedded in a soil profile
    pub fn new(name: &str, pile: Pile, soil: SoilProfile) -> Self {
        Self {
            name: name.to_string(),
            pile,
            soil: Some(soil),
            supports: Vec::new(),
            point_loads: Vec::new(),
            uniform_loads: Vec::new(),
            self_weight: false,
            element_size: DEFAULT_ELEMENT_SIZE,
        }
    }

    /// Create a model of a bare pile with no soil; it must be supported
    pub fn without_soil(name: &str, pile: Pile) -> Self {
        Self {
            name: name.to_string(),
            pile,
            soil: None,
            supports: Vec::new(),
            point_loads: Vec::new(),
            uniform_loads: Vec::new(),
            self_weight: false,
            element_size: DEFAULT_ELEMENT_SIZE,
        }
    }

    /// Add a support at a depth along the pile
    pub fn add_support(&mut self, depth: f64, support: Support) -> PileResult<&mut Self> {
        self.check_depth(depth)?;
        self.supports.push((depth, support));
        Ok(self)
    }

    /// Add a concentrated load at a depth along the pile
    pub fn add_point_load(&mut self, depth: f64, load: PointLoad) -> PileResult<&mut Self> {
        self.check_depth(depth)?;
        self.point_loads.push((depth, load));
        Ok(self)
    }

    /// Add a uniform lateral load over a depth range
    pub fn add_uniform_load(&mut self, load: UniformLoad) -> PileResult<&mut Self> {
        if load.bottom <= load.top {
            return Err(PileError::Configuration(format!(
                "uniform load range [{}, {}] is empty",
                load.top, load.bottom
            )));
        }
        self.check_depth(load.top)?;
        self.check_depth(load.bottom)?;
        self.uniform_loads.push(load);
        Ok(self)
    }

    /// Include the pile self-weight as a distributed axial load
    pub fn set_self_weight(&mut self, enabled: bool) -> &mut Self {
        self.self_weight = enabled;
        self
    }

    /// Override the target element size in m
    pub fn set_element_size(&mut self, size: f64) -> PileResult<&mut Self> {
        if size <= 0.0 {
            return Err(PileError::Configuration(format!(
                "element size must be positive (got {})",
                size
            )));
        }
        self.element_size = size;
        Ok(self)
    }

    fn check_depth(&self, depth: f64) -> PileResult<()> {
        let total = self.pile.total_length();
        if depth < 0.0 || depth > total {
            return Err(PileError::DepthOutsidePile {
                depth,
                pile_length: total,
            });
        }
        Ok(())
    }

    /// Whether any axial behavior is present; when absent the axial DOFs
    /// are pinned so free-head lateral analyses stay well-posed
    fn axial_active(&self) -> bool {
        self.self_weight
            || self.point_loads.iter().any(|(_, l)| l.axial != 0.0)
            || self.supports.iter().any(|(_, s)| s.axial)
    }

    /// Run the analysis and return the full report
    pub fn analyze(&self, options: &SolverOptions) -> PileResult<AnalysisReport> {
        if self.soil.is_none() && self.supports.is_empty() {
            return Err(PileError::UnderconstrainedModel(format!(
                "model '{}' has neither soil springs nor supports",
                self.name
            )));
        }

        let mut anchored: Vec<f64> = self.supports.iter().map(|(d, _)| *d).collect();
        anchored.extend(self.point_loads.iter().map(|(d, _)| *d));
        // Uniform load bounds must land on element boundaries: each element
        // is then fully covered or untouched, and half-and-half lumping
        // preserves both the resultant and its centroid.
        for load in &self.uniform_loads {
            anchored.push(load.top);
            anchored.push(load.bottom);
        }

        let mesh = Mesh::build(&self.pile, self.soil.as_ref(), &anchored, self.element_size)?;

        let springs = match &self.soil {
            Some(profile) => springs::build_springs(&mesh, profile)?,
            None => Vec::new(),
        };

        let node_of = |depth: f64| -> PileResult<usize> {
            mesh.node_at(depth).ok_or_else(|| {
                PileError::Configuration(format!("no mesh node at anchored depth {} m", depth))
            })
        };

        let mut node_supports = Vec::with_capacity(self.supports.len());
        for &(depth, support) in &self.supports {
            node_supports.push((node_of(depth)?, support));
        }
        let mut node_loads = Vec::with_capacity(self.point_loads.len());
        for &(depth, load) in &self.point_loads {
            node_loads.push((node_of(depth)?, load));
        }

        let bc = BoundaryConditions::build(&mesh, &node_supports, self.axial_active());
        let loads =
            assembly::assemble_loads(&mesh, &node_loads, &self.uniform_loads, self.self_weight);

        log::info!(
            "analyzing '{}': {} nodes, {} springs",
            self.name,
            mesh.nodes.len(),
            springs.len()
        );

        let solution = solver::solve(&mesh, &springs, &bc, &loads, options, None)?;

        // Reactions from the stiffness at the converged state
        let axial = assembly::element_axial_forces(&mesh, &solution.displacements);
        let (k, _) = assembly::assemble_stiffness(&mesh, &springs, &solution.displacements, &axial);
        let dof_reactions = bc.reactions(&k, &solution.displacements, &loads);
        let reaction_nodes: Vec<usize> = node_supports
            .iter()
            .filter(|(_, s)| s.is_supported())
            .map(|(n, _)| *n)
            .collect();

        Ok(results::extract(
            &mesh,
            &springs,
            &solution,
            &dof_reactions,
            &reaction_nodes,
        ))
    }

    /// Serialize the model to pretty JSON
    pub fn to_json(&self) -> PileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a model from JSON
    pub fn from_json(json: &str) -> PileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
