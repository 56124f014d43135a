//! Error types for pile analysis

use thiserror::Error;

/// Main error type for pile analysis operations
#[derive(Error, Debug)]
pub enum PileError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Depth {depth} m is outside the pile (0 m to {pile_length} m)")]
    DepthOutsidePile { depth: f64, pile_length: f64 },

    #[error("No soil spring available at depth {depth} m - profile covers {top} m to {bottom} m")]
    SpringEvaluation { depth: f64, top: f64, bottom: f64 },

    #[error("Model is underconstrained - no unique equilibrium exists: {0}")]
    UnderconstrainedModel(String),

    #[error("Solution diverged at iteration {iteration} (residual {residual:.3e})")]
    Diverged { iteration: usize, residual: f64 },

    #[error("No convergence after {iterations} iterations (residual {residual:.3e}, tolerance {tolerance:.3e})")]
    MaxIterationsExceeded {
        iterations: usize,
        residual: f64,
        tolerance: f64,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for pile analysis operations
pub type PileResult<T> = Result<T, PileError>;
