//! Error type for wind shear computations.

use thiserror::Error;

/// Error type for constructing and invoking the wind shear solver.
#[derive(Debug, Error)]
pub enum ShearError {
    /// Coordinate and elevation arrays do not share the same shape
    #[error("grid shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape of the x-coordinate array, (ny, nx)
        expected: (usize, usize),
        /// Offending shape
        found: (usize, usize),
    },

    /// Computational grid spacing must be strictly positive
    #[error("grid spacing must be positive, got {0}")]
    InvalidSpacing(f64),

    /// Buffer relaxation length must be strictly positive
    #[error("buffer relaxation must be positive, got {0}")]
    InvalidRelaxation(f64),

    /// Free-stream wind speed must be non-negative
    #[error("free-stream wind speed must be non-negative, got {0}")]
    NegativeSpeed(f64),

    /// The final projection onto the input grid left cells uncovered.
    ///
    /// By construction the computational grid encloses the input grid, so
    /// this indicates a degenerate input geometry rather than normal
    /// operation; it fails loudly instead of returning NaN silently.
    #[error("interpolation coverage failure: {missing} input cells received no value")]
    InterpolationCoverage {
        /// Number of input-grid cells that interpolated to NaN
        missing: usize,
    },

    /// Shear accessor called before the first invocation
    #[error("no shear result available; call update() first")]
    ResultNotReady,
}
