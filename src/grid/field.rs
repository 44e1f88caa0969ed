//! Dense 2D scalar field storage.
//!
//! All grids in this crate store coordinates and values as flat row-major
//! arrays with an explicit `(ny, nx)` shape.
//! Layout: `data[j * nx + i]` for row j, column i.

/// A dense 2D field of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Field2 {
    /// Flat row-major values
    pub data: Vec<f64>,
    /// Number of rows
    pub ny: usize,
    /// Number of columns
    pub nx: usize,
}

impl Field2 {
    /// Create a field filled with zeros.
    pub fn zeros(ny: usize, nx: usize) -> Self {
        Self {
            data: vec![0.0; ny * nx],
            ny,
            nx,
        }
    }

    /// Create a field filled with a constant value.
    pub fn filled(ny: usize, nx: usize, value: f64) -> Self {
        Self {
            data: vec![value; ny * nx],
            ny,
            nx,
        }
    }

    /// Create a field by evaluating `f(j, i)` at every cell.
    pub fn from_fn<F>(ny: usize, nx: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(ny * nx);
        for j in 0..ny {
            for i in 0..nx {
                data.push(f(j, i));
            }
        }
        Self { data, ny, nx }
    }

    /// Build a field from an existing flat row-major buffer.
    ///
    /// # Panics
    /// Panics if `data.len() != ny * nx`.
    pub fn from_vec(data: Vec<f64>, ny: usize, nx: usize) -> Self {
        assert_eq!(data.len(), ny * nx, "flat buffer does not match shape");
        Self { data, ny, nx }
    }

    /// Shape as `(ny, nx)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has zero cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at row j, column i.
    #[inline]
    pub fn get(&self, j: usize, i: usize) -> f64 {
        self.data[j * self.nx + i]
    }

    /// Set value at row j, column i.
    #[inline]
    pub fn set(&mut self, j: usize, i: usize, value: f64) {
        self.data[j * self.nx + i] = value;
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Minimum value over the field.
    pub fn min(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    /// Maximum value over the field.
    pub fn max(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Maximum absolute value over the field.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }

    /// Number of NaN cells.
    pub fn nan_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_zeros_shape() {
        let f = Field2::zeros(3, 5);
        assert_eq!(f.shape(), (3, 5));
        assert_eq!(f.len(), 15);
        assert!(f.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_fn_indexing() {
        let f = Field2::from_fn(4, 3, |j, i| (j * 10 + i) as f64);
        assert!((f.get(0, 0) - 0.0).abs() < TOL);
        assert!((f.get(2, 1) - 21.0).abs() < TOL);
        assert!((f.get(3, 2) - 32.0).abs() < TOL);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut f = Field2::zeros(2, 2);
        f.set(1, 0, 7.5);
        assert!((f.get(1, 0) - 7.5).abs() < TOL);
        assert!((f.get(0, 1)).abs() < TOL);
    }

    #[test]
    fn test_min_max() {
        let f = Field2::from_fn(3, 3, |j, i| (j as f64) - (i as f64));
        assert!((f.min() + 2.0).abs() < TOL);
        assert!((f.max() - 2.0).abs() < TOL);
        assert!((f.max_abs() - 2.0).abs() < TOL);
    }

    #[test]
    fn test_nan_count() {
        let mut f = Field2::zeros(2, 3);
        assert_eq!(f.nan_count(), 0);
        f.set(0, 1, f64::NAN);
        f.set(1, 2, f64::NAN);
        assert_eq!(f.nan_count(), 2);
    }

    #[test]
    #[should_panic]
    fn test_from_vec_shape_mismatch_panics() {
        let _ = Field2::from_vec(vec![0.0; 5], 2, 3);
    }
}
