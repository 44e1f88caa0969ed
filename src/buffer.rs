//! Buffer region extrapolation.
//!
//! The computational grid extends beyond the input grid on all sides. Cells
//! outside input coverage are filled with synthetic topography: the
//! elevation of the nearest point on the input-grid border, scaled by a
//! sigmoid of the distance to that point. The blend is 1 at the border and
//! decays smoothly to 0 deep into the buffer, which keeps the elevation
//! field free of discontinuities at the synthetic boundary. Spectral
//! methods ring badly on sharp edges, so this smoothness is load-bearing.

use crate::error::ShearError;
use crate::grid::Field2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Buffer geometry: how far synthetic topography extends and how fast it
/// decays.
#[derive(Debug, Clone, Copy)]
pub struct BufferSpec {
    /// Distance beyond the input bounding box before synthetic topography
    /// is fully suppressed
    pub width: f64,
    /// Decay length of the sigmoid blend
    pub relaxation: f64,
}

impl BufferSpec {
    /// Create a buffer specification. When `relaxation` is `None` it
    /// defaults to `width / 4`. The relaxation must be strictly positive.
    pub fn new(width: f64, relaxation: Option<f64>) -> Result<Self, ShearError> {
        let relaxation = relaxation.unwrap_or(width / 4.0);
        if relaxation <= 0.0 {
            return Err(ShearError::InvalidRelaxation(relaxation));
        }
        Ok(Self { width, relaxation })
    }

    /// Sigmoid blend factor for a given distance to the input-grid border.
    ///
    /// `factor(d) = 1 / (1 + exp(-(width - d) / relaxation))`
    ///
    /// Monotonically decreasing in `d`; approaches 1 at the border,
    /// crosses 0.5 at `d = width`, and tends to 0 far into the buffer.
    pub fn blend_factor(&self, distance: f64) -> f64 {
        1.0 / (1.0 + (-(self.width - distance) / self.relaxation).exp())
    }
}

/// Border polyline of the input grid: coordinates and elevations in
/// matching order, precomputed once since the input grid never moves.
#[derive(Debug, Clone)]
pub struct BorderPolyline {
    /// Border x-coordinates
    pub x: Vec<f64>,
    /// Border y-coordinates
    pub y: Vec<f64>,
    /// Border elevations
    pub z: Vec<f64>,
}

impl BorderPolyline {
    /// Index and distance of the border point nearest to `(px, py)`.
    fn nearest(&self, px: f64, py: f64) -> (usize, f64) {
        let mut best = 0;
        let mut best_d2 = f64::INFINITY;
        for (i, (&bx, &by)) in self.x.iter().zip(self.y.iter()).enumerate() {
            let d2 = (bx - px) * (bx - px) + (by - py) * (by - py);
            if d2 < best_d2 {
                best_d2 = d2;
                best = i;
            }
        }
        (best, best_d2.sqrt())
    }
}

/// Fill every NaN cell of `z` with the nearest border elevation scaled by
/// the sigmoid blend of the distance.
///
/// `x` and `y` are the working coordinates of the computational grid. When
/// the input grid already covers the whole computational grid there are no
/// NaN cells and this is a no-op.
pub fn fill_uncovered(
    z: &mut Field2,
    x: &Field2,
    y: &Field2,
    border: &BorderPolyline,
    spec: &BufferSpec,
) {
    let holes: Vec<usize> = z
        .data
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| v.is_nan().then_some(idx))
        .collect();

    #[cfg(feature = "parallel")]
    let filled: Vec<(usize, f64)> = holes
        .par_iter()
        .map(|&idx| (idx, extrapolated_value(x.data[idx], y.data[idx], border, spec)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let filled: Vec<(usize, f64)> = holes
        .iter()
        .map(|&idx| (idx, extrapolated_value(x.data[idx], y.data[idx], border, spec)))
        .collect();

    for (idx, value) in filled {
        z.data[idx] = value;
    }
}

fn extrapolated_value(px: f64, py: f64, border: &BorderPolyline, spec: &BufferSpec) -> f64 {
    let (i, d) = border.nearest(px, py);
    border.z[i] * spec.blend_factor(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_default_relaxation() {
        let spec = BufferSpec::new(100.0, None).unwrap();
        assert!((spec.relaxation - 25.0).abs() < TOL);
    }

    #[test]
    fn test_rejects_non_positive_relaxation() {
        assert!(BufferSpec::new(100.0, Some(0.0)).is_err());
        assert!(BufferSpec::new(100.0, Some(-1.0)).is_err());
        // width = 0 with no explicit relaxation derives 0, also rejected
        assert!(BufferSpec::new(0.0, None).is_err());
    }

    #[test]
    fn test_blend_factor_boundary_values() {
        let spec = BufferSpec::new(100.0, Some(25.0)).unwrap();
        // Near 1 at the border, exactly 0.5 at d = width, near 0 far out
        assert!(spec.blend_factor(0.0) > 0.98);
        assert!((spec.blend_factor(100.0) - 0.5).abs() < TOL);
        assert!(spec.blend_factor(1e6) < 1e-12);
    }

    #[test]
    fn test_blend_factor_monotone() {
        let spec = BufferSpec::new(50.0, Some(10.0)).unwrap();
        let mut prev = spec.blend_factor(0.0);
        for k in 1..200 {
            let f = spec.blend_factor(k as f64);
            assert!(f < prev, "sigmoid must decrease with distance");
            prev = f;
        }
    }

    #[test]
    fn test_fill_uncovered_uses_nearest_border_point() {
        let border = BorderPolyline {
            x: vec![0.0, 10.0],
            y: vec![0.0, 0.0],
            z: vec![2.0, 8.0],
        };
        let spec = BufferSpec::new(100.0, Some(25.0)).unwrap();

        let x = Field2::from_vec(vec![1.0, 9.0], 1, 2);
        let y = Field2::from_vec(vec![0.0, 0.0], 1, 2);
        let mut z = Field2::from_vec(vec![f64::NAN, f64::NAN], 1, 2);

        fill_uncovered(&mut z, &x, &y, &border, &spec);

        assert!((z.get(0, 0) - 2.0 * spec.blend_factor(1.0)).abs() < TOL);
        assert!((z.get(0, 1) - 8.0 * spec.blend_factor(1.0)).abs() < TOL);
    }

    #[test]
    fn test_fill_uncovered_leaves_covered_cells_alone() {
        let border = BorderPolyline {
            x: vec![0.0],
            y: vec![0.0],
            z: vec![5.0],
        };
        let spec = BufferSpec::new(10.0, Some(2.0)).unwrap();

        let x = Field2::from_vec(vec![0.0, 1.0], 1, 2);
        let y = Field2::zeros(1, 2);
        let mut z = Field2::from_vec(vec![3.5, f64::NAN], 1, 2);

        fill_uncovered(&mut z, &x, &y, &border, &spec);

        assert!((z.get(0, 0) - 3.5).abs() < TOL);
        assert!(!z.get(0, 1).is_nan());
    }

    #[test]
    fn test_fill_uncovered_noop_without_nans() {
        let border = BorderPolyline {
            x: vec![0.0],
            y: vec![0.0],
            z: vec![5.0],
        };
        let spec = BufferSpec::new(10.0, Some(2.0)).unwrap();

        let x = Field2::zeros(2, 2);
        let y = Field2::zeros(2, 2);
        let mut z = Field2::filled(2, 2, 1.25);
        let before = z.clone();

        fill_uncovered(&mut z, &x, &y, &border, &spec);
        assert_eq!(z, before);
    }
}
