//! Soil stratigraphy: layers, profiles and resistance curves

pub mod curve;
pub mod models;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{PileError, PileResult};

pub use curve::{Curve, SpringKind};
pub use models::SoilModel;

/// A pure function of depth used to rescale curve output
pub type DepthMultiplier = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// One soil layer over a depth range
///
/// Depths are measured positive downward from the pile head; `top < bottom`.
#[derive(Clone, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Layer name for reporting
    pub name: String,
    /// Top of the layer in m
    pub top: f64,
    /// Bottom of the layer in m
    pub bottom: f64,
    /// Constitutive model generating resistance curves for this layer
    pub model: SoilModel,
    /// Optional multiplier on lateral (p-y) resistance, by depth
    #[serde(skip)]
    pub p_multiplier: Option<DepthMultiplier>,
    /// Optional multiplier on rotational (m-t) resistance, by depth
    #[serde(skip)]
    pub m_multiplier: Option<DepthMultiplier>,
}

impl SoilLayer {
    /// Create a layer over `[top, bottom]` with the given model
    pub fn new(name: &str, top: f64, bottom: f64, model: SoilModel) -> Self {
        Self {
            name: name.to_string(),
            top,
            bottom,
            model,
            p_multiplier: None,
            m_multiplier: None,
        }
    }

    /// Attach a p-y multiplier function of depth
    pub fn with_p_multiplier(mut self, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.p_multiplier = Some(Arc::new(f));
        self
    }

    /// Attach an m-t multiplier function of depth
    pub fn with_m_multiplier(mut self, f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        self.m_multiplier = Some(Arc::new(f));
        self
    }

    /// Evaluate the p-y multiplier at a depth; negative values clamp to zero
    pub fn p_multiplier_at(&self, depth: f64) -> f64 {
        self.p_multiplier
            .as_ref()
            .map(|f| f(depth).max(0.0))
            .unwrap_or(1.0)
    }

    /// Evaluate the m-t multiplier at a depth; negative values clamp to zero
    pub fn m_multiplier_at(&self, depth: f64) -> f64 {
        self.m_multiplier
            .as_ref()
            .map(|f| f(depth).max(0.0))
            .unwrap_or(1.0)
    }
}

impl fmt::Debug for SoilLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoilLayer")
            .field("name", &self.name)
            .field("top", &self.top)
            .field("bottom", &self.bottom)
            .field("model", &self.model)
            .field("p_multiplier", &self.p_multiplier.is_some())
            .field("m_multiplier", &self.m_multiplier.is_some())
            .finish()
    }
}

/// An ordered stack of soil layers
///
/// Read-only input to the kernel; never mutated during a solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilProfile {
    /// Profile name for reporting
    pub name: String,
    /// Layers ordered by increasing depth, contiguous
    pub layers: Vec<SoilLayer>,
}

impl SoilProfile {
    /// Create a validated profile
    ///
    /// Layers must be ordered top-down, contiguous and of positive
    /// thickness.
    pub fn new(name: &str, layers: Vec<SoilLayer>) -> PileResult<Self> {
        if layers.is_empty() {
            return Err(PileError::Configuration(
                "soil profile must have at least one layer".to_string(),
            ));
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.bottom <= layer.top {
                return Err(PileError::Configuration(format!(
                    "layer '{}' has non-positive thickness ({} m to {} m)",
                    layer.name, layer.top, layer.bottom
                )));
            }
            if i > 0 && (layer.top - layers[i - 1].bottom).abs() > 1e-9 {
                return Err(PileError::Configuration(format!(
                    "gap or overlap between layers '{}' and '{}' at {} m",
                    layers[i - 1].name,
                    layer.name,
                    layer.top
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            layers,
        })
    }

    /// Depth of the soil surface in m
    pub fn top(&self) -> f64 {
        self.layers[0].top
    }

    /// Depth of the deepest layer bottom in m
    pub fn bottom(&self) -> f64 {
        self.layers.last().unwrap().bottom
    }

    /// Depths of all layer interfaces, surface and bottom included
    pub fn boundaries(&self) -> Vec<f64> {
        let mut depths: Vec<f64> = self.layers.iter().map(|l| l.top).collect();
        depths.push(self.bottom());
        depths
    }

    /// Layer covering the given depth
    ///
    /// Fails with [`PileError::SpringEvaluation`] when the depth lies
    /// outside the profile's covered range.
    pub fn layer_at(&self, depth: f64) -> PileResult<&SoilLayer> {
        if depth < self.top() - 1e-9 || depth > self.bottom() + 1e-9 {
            return Err(PileError::SpringEvaluation {
                depth,
                top: self.top(),
                bottom: self.bottom(),
            });
        }
        for layer in &self.layers {
            if depth <= layer.bottom + 1e-9 {
                return Ok(layer);
            }
        }
        Ok(self.layers.last().unwrap())
    }
}
