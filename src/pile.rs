//! Pile geometry and structural properties

use serde::{Deserialize, Serialize};

use crate::error::{PileError, PileResult};

/// Pile material properties
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Material {
    /// Young's modulus in kN/m²
    pub e: f64,
    /// Unit weight in kN/m³
    pub unit_weight: f64,
}

impl Material {
    /// Create a material with arbitrary properties
    pub fn new(e: f64, unit_weight: f64) -> Self {
        Self { e, unit_weight }
    }

    /// Structural steel (E = 210 GPa, 78 kN/m³)
    pub fn steel() -> Self {
        Self {
            e: 210.0e6,
            unit_weight: 78.0,
        }
    }
}

/// A uniform stretch of pile with constant cross-sectional properties
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PileSegment {
    /// Segment length in m
    pub length: f64,
    /// Outer diameter (or width) in m, used to generate soil springs
    pub diameter: f64,
    /// Bending stiffness EI in kN·m²
    pub ei: f64,
    /// Axial stiffness EA in kN
    pub ea: f64,
    /// Self-weight per unit length in kN/m
    pub weight_per_length: f64,
}

impl PileSegment {
    /// Create a hollow circular segment from diameter and wall thickness
    pub fn circular(length: f64, diameter: f64, wall_thickness: f64, material: Material) -> Self {
        let d = diameter;
        let di = d - 2.0 * wall_thickness;
        let a = std::f64::consts::PI / 4.0 * (d.powi(2) - di.powi(2));
        let i = std::f64::consts::PI / 64.0 * (d.powi(4) - di.powi(4));

        Self {
            length,
            diameter,
            ei: material.e * i,
            ea: material.e * a,
            weight_per_length: material.unit_weight * a,
        }
    }

    /// Create a segment with user-defined stiffnesses
    pub fn with_stiffness(length: f64, diameter: f64, ei: f64, ea: f64) -> Self {
        Self {
            length,
            diameter,
            ei,
            ea,
            weight_per_length: 0.0,
        }
    }
}

/// A pile described as an ordered top-down list of segments
///
/// Depth runs positive downward with the pile head at 0 m.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pile {
    /// Name used in result reports
    pub name: String,
    /// Segments ordered from head to toe
    pub segments: Vec<PileSegment>,
}

impl Pile {
    /// Create a pile from ordered segments
    pub fn new(name: &str, segments: Vec<PileSegment>) -> PileResult<Self> {
        if segments.is_empty() {
            return Err(PileError::Configuration(
                "pile must have at least one segment".to_string(),
            ));
        }
        for (i, seg) in segments.iter().enumerate() {
            if seg.length <= 0.0 {
                return Err(PileError::Configuration(format!(
                    "segment {} has non-positive length {}",
                    i, seg.length
                )));
            }
            if seg.ei <= 0.0 || seg.ea <= 0.0 {
                return Err(PileError::Configuration(format!(
                    "segment {} has non-positive stiffness (EI = {}, EA = {})",
                    i, seg.ei, seg.ea
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    /// Create a uniform hollow circular pile
    pub fn circular(
        name: &str,
        length: f64,
        diameter: f64,
        wall_thickness: f64,
        material: Material,
    ) -> PileResult<Self> {
        Self::new(
            name,
            vec![PileSegment::circular(
                length,
                diameter,
                wall_thickness,
                material,
            )],
        )
    }

    /// Total pile length in m
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Depths of segment boundaries, head and toe included
    pub fn boundaries(&self) -> Vec<f64> {
        let mut depths = Vec::with_capacity(self.segments.len() + 1);
        let mut depth = 0.0;
        depths.push(depth);
        for seg in &self.segments {
            depth += seg.length;
            depths.push(depth);
        }
        depths
    }

    /// Segment covering the given depth
    pub fn segment_at(&self, depth: f64) -> PileResult<&PileSegment> {
        let total = self.total_length();
        if depth < -1e-9 || depth > total + 1e-9 {
            return Err(PileError::DepthOutsidePile {
                depth,
                pile_length: total,
            });
        }
        let mut bottom = 0.0;
        for seg in &self.segments {
            bottom += seg.length;
            if depth <= bottom + 1e-9 {
                return Ok(seg);
            }
        }
        Ok(self.segments.last().unwrap())
    }
}
