//! # windshear-rs
//!
//! Spectral solver for the 2D perturbation of aerodynamic surface shear
//! stress caused by topography (e.g. dunes), for use by aeolian
//! sediment-transport simulators.
//!
//! The linearized turbulent-boundary-layer perturbation equations have
//! closed-form solutions in the wavenumber domain involving Bessel
//! functions, but only on an equidistant grid aligned with the wind. The
//! solver therefore maintains a rotating computational grid: per
//! invocation it rotates the grid to the wind direction, fills it from the
//! (possibly curvilinear) input grid with sigmoid-blended buffer
//! extrapolation, runs the spectral kernel, rotates the resulting vector
//! field back to world axes and projects it onto the input grid.
//!
//! Building blocks:
//! - 2D field and grid geometry ([`grid`])
//! - Buffer extrapolation with sigmoid blending ([`buffer`])
//! - FFT / Bessel spectral kernel ([`spectral`])
//! - Structured scattered-data interpolation ([`interp`])
//! - The [`WindShear`] orchestrator ([`shear`])
//!
//! # Example
//!
//! ```
//! use windshear_rs::{Field2, WindShear, WindShearConfig};
//!
//! let n = 32;
//! let x = Field2::from_fn(n, n, |_, i| i as f64);
//! let y = Field2::from_fn(n, n, |j, _| j as f64);
//! let z = Field2::from_fn(n, n, |j, i| {
//!     let (dx, dy) = (i as f64 - 16.0, j as f64 - 16.0);
//!     2.0 * (-(dx * dx + dy * dy) / 18.0).exp()
//! });
//!
//! let config = WindShearConfig::default().with_buffer_width(10.0);
//! let mut solver = WindShear::new(x, y, z, config)?;
//! solver.update(10.0, 30.0)?;
//! let (dtaux, dtauy) = solver.shear()?;
//! assert_eq!(dtaux.shape(), (n, n));
//! assert_eq!(dtauy.shape(), (n, n));
//! # Ok::<(), windshear_rs::ShearError>(())
//! ```

pub mod buffer;
pub mod error;
pub mod grid;
pub mod interp;
pub mod shear;
pub mod spectral;

pub use buffer::{BorderPolyline, BufferSpec};
pub use error::ShearError;
pub use grid::{rotate, ComputationalGrid, Field2, InputGrid, DEG_TO_RAD};
pub use interp::GridInterpolator;
pub use shear::{WindShear, WindShearConfig};
pub use spectral::{bessel_j0, bessel_j1, compute_shear, SpectralParams};
