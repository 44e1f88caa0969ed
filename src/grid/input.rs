//! Caller-supplied input grid.
//!
//! The input grid is a logically rectangular, possibly curvilinear grid:
//! coordinate fields `x`, `y` and elevation `z`, all of shape `(ny, nx)`.
//! It is created once and never mutated; the two shear perturbation result
//! fields are attached after each invocation and overwritten by the next.

use super::field::Field2;

/// Input grid owned by the solver.
#[derive(Debug, Clone)]
pub struct InputGrid {
    /// x-coordinates, (ny, nx)
    pub x: Field2,
    /// y-coordinates, (ny, nx)
    pub y: Field2,
    /// Elevation, (ny, nx)
    pub z: Field2,
    /// Streamwise shear perturbation from the latest invocation
    pub dtaux: Option<Field2>,
    /// Cross-stream shear perturbation from the latest invocation
    pub dtauy: Option<Field2>,
}

impl InputGrid {
    /// Wrap coordinate and elevation fields. Shapes are validated by the
    /// solver constructor, not here.
    pub fn new(x: Field2, y: Field2, z: Field2) -> Self {
        Self {
            x,
            y,
            z,
            dtaux: None,
            dtauy: None,
        }
    }

    /// Grid shape `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        self.x.shape()
    }

    /// Centroid of the grid coordinates, used as the fixed rotation pivot.
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.x.len() as f64;
        let sx: f64 = self.x.data.iter().sum();
        let sy: f64 = self.y.data.iter().sum();
        (sx / n, sy / n)
    }

    /// Diagonal of the axis-aligned bounding box of the grid coordinates.
    pub fn bbox_diagonal(&self) -> f64 {
        let w = self.x.max() - self.x.min();
        let h = self.y.max() - self.y.min();
        w.hypot(h)
    }

    /// Extract the border of a same-shaped field as a closed 1D polyline.
    ///
    /// Ordering: top row left to right, right column rows `1..ny-1` top to
    /// bottom, bottom row right to left, left column rows `ny-1` down to 2
    /// bottom to top, closed with the first point repeated. The left edge
    /// quirks (duplicated bottom-left corner, skipped row 1) reproduce the
    /// historical extraction exactly so nearest-border lookups agree
    /// numerically.
    pub fn border_of(&self, field: &Field2) -> Vec<f64> {
        let (ny, nx) = field.shape();
        let mut out = Vec::with_capacity(2 * (nx + ny));
        for i in 0..nx {
            out.push(field.get(0, i));
        }
        for j in 1..ny.saturating_sub(1) {
            out.push(field.get(j, nx - 1));
        }
        for i in (0..nx).rev() {
            out.push(field.get(ny - 1, i));
        }
        for j in (2..ny).rev() {
            out.push(field.get(j, 0));
        }
        out.push(field.get(0, 0));
        out
    }
}
