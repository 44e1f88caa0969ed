//! 2D FFT plumbing and wavenumber axes.
//!
//! Thin wrappers over `rustfft`: the 2D transform runs the planned 1D FFT
//! over the rows, then over gathered columns. Spectra are kept as flat
//! row-major `Vec<Complex64>` matching the `Field2` layout.

use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

use crate::grid::Field2;

/// Forward 2D FFT of a real field. Returns the complex spectrum in flat
/// row-major order with the field's shape.
pub fn fft2(field: &Field2) -> Vec<Complex64> {
    let mut data: Vec<Complex64> = field
        .data
        .iter()
        .map(|&v| Complex64::new(v, 0.0))
        .collect();
    transform2(&mut data, field.ny, field.nx, true);
    data
}

/// Inverse 2D FFT; returns the real part, normalized by `1 / (nx * ny)`.
pub fn ifft2_real(mut spectrum: Vec<Complex64>, ny: usize, nx: usize) -> Field2 {
    transform2(&mut spectrum, ny, nx, false);
    let norm = 1.0 / (ny * nx) as f64;
    Field2::from_vec(spectrum.iter().map(|c| c.re * norm).collect(), ny, nx)
}

/// Run 1D FFTs over rows, then over columns.
fn transform2(data: &mut [Complex64], ny: usize, nx: usize, forward: bool) {
    let mut planner = FftPlanner::new();
    let row_fft = if forward {
        planner.plan_fft_forward(nx)
    } else {
        planner.plan_fft_inverse(nx)
    };
    let col_fft = if forward {
        planner.plan_fft_forward(ny)
    } else {
        planner.plan_fft_inverse(ny)
    };

    for row in data.chunks_exact_mut(nx) {
        row_fft.process(row);
    }

    let mut column = vec![Complex64::new(0.0, 0.0); ny];
    for i in 0..nx {
        for j in 0..ny {
            column[j] = data[j * nx + i];
        }
        col_fft.process(&mut column);
        for j in 0..ny {
            data[j * nx + i] = column[j];
        }
    }
}

/// Wavenumber axis for `n` samples at the given spacing.
///
/// Built as the discrete-Fourier-frequency axis of `n + 1` points with
/// sample spacing `2*pi / (spacing * n)`, with the zero-frequency entry
/// dropped. Discarding index 0 removes the singular k = 0 term from the
/// spectral kernel at the cost of a slight resolution asymmetry versus the
/// canonical n-point frequency grid; this is an intentional approximation
/// carried over from the model formulation, not a bug to fix. The returned
/// axis has length `n` and contains no zero.
pub fn wavenumber_axis(n: usize, spacing: f64) -> Vec<f64> {
    let m = n + 1;
    let d = 2.0 * PI / (spacing * n as f64);
    let val = 1.0 / (d * m as f64);

    // fftfreq(m, d) layout: [0, 1, .., ceil(m/2)-1, -(m/2), .., -1] * val
    let n_half = m.div_ceil(2);
    let mut freqs: Vec<f64> = (0..n_half).map(|k| k as f64 * val).collect();
    freqs.extend((1..=m / 2).rev().map(|k| -(k as f64) * val));
    freqs.remove(0);
    freqs
}
