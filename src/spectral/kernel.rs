//! The closed-form shear-perturbation kernel.
//!
//! Linearized turbulent-boundary-layer theory gives the shear perturbation
//! as a wavenumber-domain transfer function applied to the topography
//! spectrum, with Bessel functions of complex argument encoding the
//! inner/outer layer coupling. The solve runs entirely on the computational
//! grid, with the wind blowing along +x of the rotated frame.
//!
//! The divisions by `kx` and `k` are deliberately unguarded: the wavenumber
//! axes are built with the zero frequency dropped (`fft::wavenumber_axis`),
//! so neither ever contains 0 and the singular line of the continuous
//! formula never materializes on the discrete grid.

use num_complex::Complex64;

use super::bessel::{bessel_j0, bessel_j1};
use super::fft::{fft2, ifft2_real, wavenumber_axis};
use crate::grid::ComputationalGrid;

/// Physical parameters of the perturbation formula, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct SpectralParams {
    /// Characteristic length scale of topographic features
    pub length_scale: f64,
    /// Aerodynamic roughness length
    pub roughness: f64,
    /// Inner layer height
    pub inner_layer_height: f64,
}

/// Compute the shear perturbation on the computational grid for the given
/// free-stream wind speed, overwriting `grid.dtaux` and `grid.dtauy`.
///
/// Zero speed is a defined degenerate case: both fields are set to zero,
/// which keeps the `2 / u0^2` factor finite by never evaluating it.
pub fn compute_shear(grid: &mut ComputationalGrid, params: &SpectralParams, u0: f64) {
    let (ny, nx) = grid.shape();

    if u0 == 0.0 {
        grid.dtaux = crate::grid::Field2::zeros(ny, nx);
        grid.dtauy = crate::grid::Field2::zeros(ny, nx);
        return;
    }

    let kx_axis = wavenumber_axis(nx, grid.dx);
    let ky_axis = wavenumber_axis(ny, grid.dy);

    // hs = -FFT2(z)
    let mut hs = fft2(&grid.z);
    for c in hs.iter_mut() {
        *c = -*c;
    }

    let l = params.inner_layer_height;
    let z0 = params.roughness;
    let big_l = params.length_scale;
    let log_ratio = 2.0 * (l / z0).ln();
    let speed_factor = 2.0 / (u0 * u0);
    let sigma_coeff = big_l / 4.0 * z0 / l;
    let two_sqrt2 = 2.0 * std::f64::consts::SQRT_2;

    let mut dtaux_hat = vec![Complex64::new(0.0, 0.0); ny * nx];
    let mut dtauy_hat = vec![Complex64::new(0.0, 0.0); ny * nx];

    for j in 0..ny {
        let ky = ky_axis[j];
        for i in 0..nx {
            let kx = kx_axis[i];
            let idx = j * nx + i;

            let k = kx.hypot(ky);
            let sigma = (Complex64::new(0.0, sigma_coeff * kx)).sqrt();
            let two_sigma = sigma * 2.0;

            let bracket = Complex64::new(-1.0, 0.0)
                + (log_ratio + (k * k) / (kx * kx)) * sigma * bessel_j1(two_sigma)
                    / bessel_j0(two_sigma);
            dtaux_hat[idx] = hs[idx] * (kx * kx / k * speed_factor) * bracket;

            dtauy_hat[idx] = hs[idx]
                * (kx * ky / k * speed_factor)
                * (two_sqrt2 * sigma * bessel_j1(two_sqrt2 * sigma));
        }
    }

    grid.dtaux = ifft2_real(dtaux_hat, ny, nx);
    grid.dtauy = ifft2_real(dtauy_hat, ny, nx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Field2, InputGrid};

    fn default_params() -> SpectralParams {
        SpectralParams {
            length_scale: 100.0,
            roughness: 0.001,
            inner_layer_height: 10.0,
        }
    }

    fn grid_with_elevation<F>(n: usize, f: F) -> ComputationalGrid
    where
        F: Fn(f64, f64) -> f64,
    {
        let x = Field2::from_fn(n, n, |_, i| i as f64);
        let y = Field2::from_fn(n, n, |j, _| j as f64);
        let z = Field2::zeros(n, n);
        let input = InputGrid::new(x, y, z);
        let mut grid = ComputationalGrid::build(&input, 1.0, 1.0, 0.0);
        let (ny, nx) = grid.shape();
        let zc = Field2::from_fn(ny, nx, |j, i| f(grid.xi.get(j, i), grid.yi.get(j, i)));
        grid.z = zc;
        grid
    }

    #[test]
    fn test_zero_speed_gives_zero_fields() {
        let mut grid = grid_with_elevation(16, |x, y| (x * 0.3).sin() + (y * 0.2).cos());
        compute_shear(&mut grid, &default_params(), 0.0);
        assert!(grid.dtaux.max_abs() == 0.0);
        assert!(grid.dtauy.max_abs() == 0.0);
    }

    #[test]
    fn test_zero_elevation_gives_zero_perturbation() {
        let mut grid = grid_with_elevation(16, |_, _| 0.0);
        compute_shear(&mut grid, &default_params(), 10.0);
        assert!(grid.dtaux.max_abs() < 1e-12);
        assert!(grid.dtauy.max_abs() < 1e-12);
    }

    #[test]
    fn test_output_is_finite_for_bumpy_topography() {
        let mut grid = grid_with_elevation(24, |x, y| {
            3.0 * (-((x - 12.0).powi(2) + (y - 12.0).powi(2)) / 8.0).exp()
        });
        compute_shear(&mut grid, &default_params(), 10.0);
        assert!(grid.dtaux.data.iter().all(|v| v.is_finite()));
        assert!(grid.dtauy.data.iter().all(|v| v.is_finite()));
        assert!(grid.dtaux.max_abs() > 0.0);
    }

    #[test]
    fn test_perturbation_scales_inverse_square_of_speed() {
        let hill = |x: f64, y: f64| 2.0 * (-((x - 10.0).powi(2) + (y - 10.0).powi(2)) / 6.0).exp();

        let mut g1 = grid_with_elevation(20, hill);
        compute_shear(&mut g1, &default_params(), 5.0);
        let mut g2 = grid_with_elevation(20, hill);
        compute_shear(&mut g2, &default_params(), 10.0);

        // dtau ~ 2 / u0^2, so doubling the speed divides the field by 4
        for idx in 0..g1.dtaux.len() {
            assert!((g1.dtaux.data[idx] - 4.0 * g2.dtaux.data[idx]).abs() < 1e-9);
        }
    }
}
