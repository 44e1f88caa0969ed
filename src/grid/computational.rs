//! Derived equidistant computational grid.
//!
//! The spectral solve requires an axis-aligned equidistant grid with wind
//! along one principal axis. Instead of re-deriving the spectral kernel per
//! wind direction, the grid itself is rotated about a fixed pivot (the input
//! grid centroid) and the resulting vector field is rotated back afterwards.
//!
//! The grid is square with side length equal to the diagonal of the input
//! grid's bounding box plus twice the buffer width, so it covers the input
//! grid for every wind direction with buffer to spare.
//!
//! Lifecycle: the unrotated reference coordinates `(xi, yi)` are built once
//! at construction and never change. The working layers `(x, y, z, dtaux,
//! dtauy)` are overwritten on every invocation; only the current generation
//! is kept.

use super::field::Field2;
use super::input::InputGrid;

/// The solver-internal equidistant square grid.
#[derive(Debug, Clone)]
pub struct ComputationalGrid {
    /// Grid spacing in x
    pub dx: f64,
    /// Grid spacing in y
    pub dy: f64,
    /// Rotation pivot: centroid of the input grid, fixed for the lifetime
    /// of the solver regardless of wind direction
    pub pivot: (f64, f64),
    /// Side length of the square domain
    pub side: f64,
    /// Unrotated reference x-coordinates, built once
    pub xi: Field2,
    /// Unrotated reference y-coordinates, built once
    pub yi: Field2,
    /// Working x-coordinates (rotated to the current wind direction)
    pub x: Field2,
    /// Working y-coordinates (rotated to the current wind direction)
    pub y: Field2,
    /// Elevation interpolated/extrapolated onto the working coordinates
    pub z: Field2,
    /// Raw streamwise shear perturbation (wind frame until rotated back)
    pub dtaux: Field2,
    /// Raw cross-stream shear perturbation (wind frame until rotated back)
    pub dtauy: Field2,
}

impl ComputationalGrid {
    /// Build the grid for a given input grid, spacing and buffer width.
    ///
    /// The square spans `[x0 - D/2, x0 + D/2] x [y0 - D/2, y0 + D/2]` with
    /// `D` the bounding-box diagonal plus `2 * buffer_width`; bounds are
    /// snapped outward to multiples of the spacing (floor low, ceil high,
    /// high bound exclusive) so the axes are reproducible regardless of the
    /// exact centroid value.
    pub fn build(input: &InputGrid, dx: f64, dy: f64, buffer_width: f64) -> Self {
        let (x0, y0) = input.centroid();
        let side = input.bbox_diagonal() + 2.0 * buffer_width;

        let xs = snapped_axis(x0 - side / 2.0, x0 + side / 2.0, dx);
        let ys = snapped_axis(y0 - side / 2.0, y0 + side / 2.0, dy);
        let (nx, ny) = (xs.len(), ys.len());

        let xi = Field2::from_fn(ny, nx, |_, i| xs[i]);
        let yi = Field2::from_fn(ny, nx, |j, _| ys[j]);

        Self {
            dx,
            dy,
            pivot: (x0, y0),
            side,
            x: xi.clone(),
            y: yi.clone(),
            z: Field2::zeros(ny, nx),
            dtaux: Field2::zeros(ny, nx),
            dtauy: Field2::zeros(ny, nx),
            xi,
            yi,
        }
    }

    /// Grid shape `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        self.xi.shape()
    }
}

/// Equidistant axis from `min` to `max` snapped outward to multiples of
/// `step`; the snapped upper bound is exclusive.
fn snapped_axis(min: f64, max: f64, step: f64) -> Vec<f64> {
    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;
    let n = ((stop - start) / step).round() as usize;
    (0..n).map(|k| start + k as f64 * step).collect()
}
