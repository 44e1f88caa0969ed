//! Planar rotation of coordinate field pairs.
//!
//! The solver rotates the computational grid into the wind frame before the
//! spectral solve and re-expresses the resulting vector field in world axes
//! afterwards. Both use the same transform with the *same* angle: the grid
//! moved, the vectors did not.
//!
//! # Sign convention
//!
//! Angles are in degrees. A positive angle maps `(1, 0)` to `(0, -1)`, i.e.
//! it turns the +x axis toward −y. This is the compass-like convention the
//! whole pipeline is built around; callers supply wind directions already
//! expressed in it. Periodicity over 360° falls out of sin/cos, so any real
//! angle is accepted without normalization.

use std::f64::consts::PI;

use super::field::Field2;

/// Degrees-to-radians conversion factor.
pub const DEG_TO_RAD: f64 = PI / 180.0;

/// Rotate a pair of coordinate fields by `angle_deg` about `origin`.
///
/// Pure function: returns new fields of the same shape. Applied to result
/// vector components, `origin` is `(0, 0)`.
pub fn rotate(x: &Field2, y: &Field2, angle_deg: f64, origin: (f64, f64)) -> (Field2, Field2) {
    debug_assert_eq!(x.shape(), y.shape());

    let a = angle_deg * DEG_TO_RAD;
    let (sin_a, cos_a) = a.sin_cos();
    let (ox, oy) = origin;

    let mut xr = Field2::zeros(x.ny, x.nx);
    let mut yr = Field2::zeros(y.ny, y.nx);
    for idx in 0..x.len() {
        let dx = x.data[idx] - ox;
        let dy = y.data[idx] - oy;
        xr.data[idx] = dx * cos_a + dy * sin_a + ox;
        yr.data[idx] = -dx * sin_a + dy * cos_a + oy;
    }
    (xr, yr)
}
