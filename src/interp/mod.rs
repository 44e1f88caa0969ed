//! Structured scattered-data interpolation between grids.
//!
//! Both interpolation directions in the shear pipeline have a logically
//! rectangular source: the (possibly curvilinear) input grid, or the
//! rotated equidistant computational grid. The interpolator exploits that
//! structure: destination points are located in a source quad via a
//! uniform-bin cell index and an inverse-bilinear solve, then evaluated
//! with a Catmull-Rom bicubic over the surrounding 4x4 stencil in index
//! space, falling back to bilinear where the stencil would leave the grid.
//!
//! Destination points outside source coverage evaluate to NaN; the buffer
//! extrapolation stage owns those cells in the forward direction, and the
//! orchestrator treats them as a hard error in the reverse direction.

mod locator;

use crate::grid::Field2;
use locator::CellLocator;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Interpolator bound to one source grid.
///
/// Owns copies of the source coordinates plus the cell index, so it can be
/// built once and reused across invocations when the source grid does not
/// move (the input grid never does).
#[derive(Debug, Clone)]
pub struct GridInterpolator {
    x: Field2,
    y: Field2,
    locator: CellLocator,
}

impl GridInterpolator {
    /// Build an interpolator over a structured source grid.
    pub fn new(x: &Field2, y: &Field2) -> Self {
        debug_assert_eq!(x.shape(), y.shape());
        let locator = CellLocator::build(x, y);
        Self {
            x: x.clone(),
            y: y.clone(),
            locator,
        }
    }

    /// Interpolate `values` (same shape as the source grid) onto the
    /// destination coordinates. Returns a field shaped like `xd`; cells
    /// outside source coverage are NaN.
    pub fn interpolate(&self, values: &Field2, xd: &Field2, yd: &Field2) -> Field2 {
        debug_assert_eq!(values.shape(), self.x.shape());
        debug_assert_eq!(xd.shape(), yd.shape());

        let mut out = Field2::zeros(xd.ny, xd.nx);

        #[cfg(feature = "parallel")]
        out.data
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, cell)| {
                *cell = self.sample(values, xd.data[idx], yd.data[idx]);
            });

        #[cfg(not(feature = "parallel"))]
        for (idx, cell) in out.data.iter_mut().enumerate() {
            *cell = self.sample(values, xd.data[idx], yd.data[idx]);
        }

        out
    }

    /// Evaluate the source field at one physical point.
    pub fn sample(&self, values: &Field2, px: f64, py: f64) -> f64 {
        match self.locator.locate(&self.x, &self.y, px, py) {
            Some((ci, cj, u, v)) => self.evaluate(values, ci, cj, u, v),
            None => f64::NAN,
        }
    }

    /// Cubic evaluation at local coordinates `(u, v)` inside quad
    /// `(ci, cj)`, with bilinear fallback at the grid rim where the 4x4
    /// stencil is unavailable.
    fn evaluate(&self, values: &Field2, ci: usize, cj: usize, u: f64, v: f64) -> f64 {
        let (ny, nx) = values.shape();
        if ci >= 1 && ci + 2 < nx && cj >= 1 && cj + 2 < ny {
            let wx = [
                cubic_weight(1.0 + u),
                cubic_weight(u),
                cubic_weight(1.0 - u),
                cubic_weight(2.0 - u),
            ];
            let wy = [
                cubic_weight(1.0 + v),
                cubic_weight(v),
                cubic_weight(1.0 - v),
                cubic_weight(2.0 - v),
            ];
            let mut acc = 0.0;
            for (n, &wyn) in wy.iter().enumerate() {
                let j = cj - 1 + n;
                for (m, &wxm) in wx.iter().enumerate() {
                    acc += wxm * wyn * values.get(j, ci - 1 + m);
                }
            }
            acc
        } else {
            let z00 = values.get(cj, ci);
            let z10 = values.get(cj, ci + 1);
            let z01 = values.get(cj + 1, ci);
            let z11 = values.get(cj + 1, ci + 1);
            (1.0 - u) * (1.0 - v) * z00 + u * (1.0 - v) * z10 + (1.0 - u) * v * z01 + u * v * z11
        }
    }
}

/// Catmull-Rom cubic kernel (tension -1/2).
#[inline]
fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        (1.5 * t - 2.5) * t * t + 1.0
    } else if t <= 2.0 {
        ((-0.5 * t + 2.5) * t - 4.0) * t + 2.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn uniform_grid(ny: usize, nx: usize, spacing: f64) -> (Field2, Field2) {
        let x = Field2::from_fn(ny, nx, |_, i| i as f64 * spacing);
        let y = Field2::from_fn(ny, nx, |j, _| j as f64 * spacing);
        (x, y)
    }

    #[test]
    fn test_cubic_weight_partition_of_unity() {
        for k in 0..=20 {
            let u = k as f64 / 20.0;
            let sum = cubic_weight(1.0 + u) + cubic_weight(u) + cubic_weight(1.0 - u)
                + cubic_weight(2.0 - u);
            assert!((sum - 1.0).abs() < TOL, "weights must sum to 1 at u={u}");
        }
    }

    #[test]
    fn test_constant_field_reproduced() {
        let (x, y) = uniform_grid(8, 8, 1.0);
        let z = Field2::filled(8, 8, 4.25);
        let interp = GridInterpolator::new(&x, &y);

        let xd = Field2::from_vec(vec![0.5, 3.3, 6.9], 1, 3);
        let yd = Field2::from_vec(vec![0.5, 2.7, 6.1], 1, 3);
        let out = interp.interpolate(&z, &xd, &yd);
        for &v in &out.data {
            assert!((v - 4.25).abs() < TOL);
        }
    }

    #[test]
    fn test_linear_field_reproduced() {
        let (x, y) = uniform_grid(10, 10, 1.0);
        let z = Field2::from_fn(10, 10, |j, i| 2.0 * i as f64 - 3.0 * j as f64 + 1.0);
        let interp = GridInterpolator::new(&x, &y);

        let xd = Field2::from_vec(vec![2.5, 4.1, 7.8], 1, 3);
        let yd = Field2::from_vec(vec![3.5, 5.9, 2.2], 1, 3);
        let out = interp.interpolate(&z, &xd, &yd);
        for (idx, &v) in out.data.iter().enumerate() {
            let expected = 2.0 * xd.data[idx] - 3.0 * yd.data[idx] + 1.0;
            assert!(
                (v - expected).abs() < 1e-8,
                "linear field not reproduced: got {v}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_exact_at_grid_nodes() {
        let (x, y) = uniform_grid(6, 6, 2.0);
        let z = Field2::from_fn(6, 6, |j, i| ((j * 7 + i * 3) % 11) as f64);
        let interp = GridInterpolator::new(&x, &y);

        for j in 0..6 {
            for i in 0..6 {
                let got = interp.sample(&z, i as f64 * 2.0, j as f64 * 2.0);
                assert!(
                    (got - z.get(j, i)).abs() < 1e-8,
                    "node ({j}, {i}): got {got}, expected {}",
                    z.get(j, i)
                );
            }
        }
    }

    #[test]
    fn test_outside_coverage_is_nan() {
        let (x, y) = uniform_grid(5, 5, 1.0);
        let z = Field2::zeros(5, 5);
        let interp = GridInterpolator::new(&x, &y);

        assert!(interp.sample(&z, -1.0, 2.0).is_nan());
        assert!(interp.sample(&z, 2.0, 10.0).is_nan());
        assert!(interp.sample(&z, 100.0, 100.0).is_nan());
    }

    #[test]
    fn test_rotated_source_grid() {
        // A rotated equidistant grid is still structured; the locator must
        // handle it, since the computational grid is rotated every call.
        let (xi, yi) = uniform_grid(12, 12, 1.0);
        let (x, y) = crate::grid::rotate(&xi, &yi, 30.0, (5.5, 5.5));
        let z = Field2::from_fn(12, 12, |j, i| i as f64 + j as f64);
        let interp = GridInterpolator::new(&x, &y);

        // Sample at a rotated node: must reproduce the nodal value
        let got = interp.sample(&z, x.get(4, 7), y.get(4, 7));
        assert!((got - 11.0).abs() < 1e-8);
    }

    #[test]
    fn test_smooth_field_accuracy() {
        let (x, y) = uniform_grid(21, 21, 1.0);
        let gauss = |px: f64, py: f64| (-((px - 10.0).powi(2) + (py - 10.0).powi(2)) / 18.0).exp();
        let z = Field2::from_fn(21, 21, |j, i| gauss(i as f64, j as f64));
        let interp = GridInterpolator::new(&x, &y);

        // Off-node destinations well inside coverage
        let mut max_err = 0.0_f64;
        for j in 0..15 {
            for i in 0..15 {
                let px = 3.0 + i as f64 * 0.9;
                let py = 3.0 + j as f64 * 0.9;
                let err = (interp.sample(&z, px, py) - gauss(px, py)).abs();
                max_err = max_err.max(err);
            }
        }
        assert!(max_err < 2e-2, "cubic error too large: {max_err}");
    }
}
