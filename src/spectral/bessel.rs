//! Bessel functions of the first kind at complex argument.
//!
//! The spectral kernel evaluates J0 and J1 at `2 * sigma` where
//! `sigma = sqrt(i * L/4 * kx * z0 / l)`; for physical parameter ranges the
//! argument magnitude stays of order one, well inside the region where the
//! ascending power series is exact to f64 round-off. The series is
//!
//! `J_n(z) = sum_m (-1)^m / (m! (m + n)!) * (z/2)^(2m + n)`
//!
//! evaluated with a term recurrence and a relative cutoff.

use num_complex::Complex64;

/// Hard cap on series terms; the cutoff triggers far earlier for the
/// argument magnitudes the kernel produces.
const MAX_TERMS: usize = 64;

/// Relative magnitude at which the series is truncated.
const SERIES_EPS: f64 = 1e-17;

/// J0 at complex argument.
pub fn bessel_j0(z: Complex64) -> Complex64 {
    bessel_j_series(0, z)
}

/// J1 at complex argument.
pub fn bessel_j1(z: Complex64) -> Complex64 {
    bessel_j_series(1, z)
}

fn bessel_j_series(order: u32, z: Complex64) -> Complex64 {
    let half = z * 0.5;
    let half_sq = half * half;

    // Leading term (z/2)^n / n!
    let mut term = match order {
        0 => Complex64::new(1.0, 0.0),
        1 => half,
        n => {
            let mut t = Complex64::new(1.0, 0.0);
            let mut fact = 1.0;
            for k in 1..=n {
                t *= half;
                fact *= k as f64;
            }
            t / fact
        }
    };

    let mut sum = term;
    for m in 1..MAX_TERMS {
        term *= -half_sq / (m as f64 * (m as f64 + order as f64));
        sum += term;
        if term.norm() < SERIES_EPS * sum.norm() {
            break;
        }
    }
    sum
}
