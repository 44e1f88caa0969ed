//! Spectral shear solver: FFT plumbing, complex Bessel functions and the
//! closed-form perturbation kernel.

mod bessel;
mod fft;
mod kernel;

pub use bessel::{bessel_j0, bessel_j1};
pub use fft::{fft2, ifft2_real, wavenumber_axis};
pub use kernel::{compute_shear, SpectralParams};
