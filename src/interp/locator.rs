//! Point location in a structured quad grid.
//!
//! A uniform-bin index over the source quads answers "which quad contains
//! this point" without walking the whole grid; the local coordinates inside
//! the quad come from an inverse-bilinear Newton solve. Bins are stored in
//! compressed (CSR) form since the index is built once per source grid and
//! queried for every destination point.

use crate::grid::Field2;

/// Newton iterations for the inverse-bilinear solve. Quads are mildly
/// curvilinear at worst, so convergence is fast from the cell center.
const MAX_NEWTON_ITERS: usize = 15;

/// Acceptance slack on local coordinates, in units of the cell.
const UV_SLACK: f64 = 1e-9;

/// Uniform-bin spatial index over the quads of a structured grid.
#[derive(Debug, Clone)]
pub struct CellLocator {
    /// Bin grid dimensions
    nbx: usize,
    nby: usize,
    /// Index bounding box
    min_x: f64,
    min_y: f64,
    /// Reciprocal bin sizes
    inv_bw: f64,
    inv_bh: f64,
    /// CSR offsets, length nbx * nby + 1
    offsets: Vec<u32>,
    /// Quad ids, `q = cj * (nx - 1) + ci`
    ids: Vec<u32>,
    /// Source grid columns (for decoding quad ids)
    nx: usize,
}

impl CellLocator {
    /// Build the index for a source grid. Bin resolution tracks the quad
    /// count so a query inspects only a handful of candidates.
    pub fn build(x: &Field2, y: &Field2) -> Self {
        let (ny, nx) = x.shape();
        let qx = nx.saturating_sub(1).max(1);
        let qy = ny.saturating_sub(1).max(1);
        let nbx = qx.min(512);
        let nby = qy.min(512);

        let min_x = x.min();
        let max_x = x.max();
        let min_y = y.min();
        let max_y = y.max();
        let span_x = (max_x - min_x).max(f64::MIN_POSITIVE);
        let span_y = (max_y - min_y).max(f64::MIN_POSITIVE);
        let inv_bw = nbx as f64 / span_x;
        let inv_bh = nby as f64 / span_y;

        let mut locator = Self {
            nbx,
            nby,
            min_x,
            min_y,
            inv_bw,
            inv_bh,
            offsets: vec![0; nbx * nby + 1],
            ids: Vec::new(),
            nx,
        };

        // Counting pass, prefix sum, fill pass
        let mut counts = vec![0u32; nbx * nby];
        locator.for_each_quad_bin(x, y, |bin, _| counts[bin] += 1);

        let mut offsets = vec![0u32; nbx * nby + 1];
        for (b, &c) in counts.iter().enumerate() {
            offsets[b + 1] = offsets[b] + c;
        }
        let total = offsets[nbx * nby] as usize;

        let mut ids = vec![0u32; total];
        let mut cursor = offsets.clone();
        locator.for_each_quad_bin(x, y, |bin, q| {
            ids[cursor[bin] as usize] = q;
            cursor[bin] += 1;
        });

        locator.offsets = offsets;
        locator.ids = ids;
        locator
    }

    /// Visit every (bin, quad id) incidence.
    fn for_each_quad_bin<F>(&self, x: &Field2, y: &Field2, mut visit: F)
    where
        F: FnMut(usize, u32),
    {
        let (ny, nx) = x.shape();
        for cj in 0..ny.saturating_sub(1) {
            for ci in 0..nx.saturating_sub(1) {
                let corners_x = [
                    x.get(cj, ci),
                    x.get(cj, ci + 1),
                    x.get(cj + 1, ci),
                    x.get(cj + 1, ci + 1),
                ];
                let corners_y = [
                    y.get(cj, ci),
                    y.get(cj, ci + 1),
                    y.get(cj + 1, ci),
                    y.get(cj + 1, ci + 1),
                ];
                let qmin_x = corners_x.iter().cloned().fold(f64::INFINITY, f64::min);
                let qmax_x = corners_x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let qmin_y = corners_y.iter().cloned().fold(f64::INFINITY, f64::min);
                let qmax_y = corners_y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

                let b0 = self.bin_x(qmin_x);
                let b1 = self.bin_x(qmax_x);
                let c0 = self.bin_y(qmin_y);
                let c1 = self.bin_y(qmax_y);
                let q = (cj * (nx - 1) + ci) as u32;
                for by in c0..=c1 {
                    for bx in b0..=b1 {
                        visit(by * self.nbx + bx, q);
                    }
                }
            }
        }
    }

    #[inline]
    fn bin_x(&self, px: f64) -> usize {
        (((px - self.min_x) * self.inv_bw) as isize).clamp(0, self.nbx as isize - 1) as usize
    }

    #[inline]
    fn bin_y(&self, py: f64) -> usize {
        (((py - self.min_y) * self.inv_bh) as isize).clamp(0, self.nby as isize - 1) as usize
    }

    /// Find the quad containing `(px, py)` and the local coordinates
    /// `(u, v)` in `[0, 1]^2` inside it. `None` when the point is outside
    /// source coverage.
    pub fn locate(
        &self,
        x: &Field2,
        y: &Field2,
        px: f64,
        py: f64,
    ) -> Option<(usize, usize, f64, f64)> {
        if px < self.min_x - UV_SLACK || py < self.min_y - UV_SLACK {
            return None;
        }
        let bin = self.bin_y(py) * self.nbx + self.bin_x(px);
        let start = self.offsets[bin] as usize;
        let end = self.offsets[bin + 1] as usize;

        for &q in &self.ids[start..end] {
            let ci = q as usize % (self.nx - 1);
            let cj = q as usize / (self.nx - 1);
            if let Some((u, v)) = invert_bilinear(x, y, ci, cj, px, py) {
                return Some((ci, cj, u, v));
            }
        }
        None
    }
}

/// Solve the bilinear map of quad `(ci, cj)` for the local coordinates of
/// `(px, py)` by Newton iteration from the cell center. Returns `None` when
/// the point lies outside the quad or the quad is degenerate.
fn invert_bilinear(
    x: &Field2,
    y: &Field2,
    ci: usize,
    cj: usize,
    px: f64,
    py: f64,
) -> Option<(f64, f64)> {
    let x00 = x.get(cj, ci);
    let x10 = x.get(cj, ci + 1);
    let x01 = x.get(cj + 1, ci);
    let x11 = x.get(cj + 1, ci + 1);
    let y00 = y.get(cj, ci);
    let y10 = y.get(cj, ci + 1);
    let y01 = y.get(cj + 1, ci);
    let y11 = y.get(cj + 1, ci + 1);

    // P(u, v) = p00 + u*a + v*b + u*v*c
    let ax = x10 - x00;
    let ay = y10 - y00;
    let bx = x01 - x00;
    let by = y01 - y00;
    let cx = x11 - x10 - x01 + x00;
    let cy = y11 - y10 - y01 + y00;

    let scale = ax.hypot(ay).max(bx.hypot(by));
    if scale <= 0.0 {
        return None;
    }
    let tol = 1e-12 * scale;

    let mut u = 0.5;
    let mut v = 0.5;
    for _ in 0..MAX_NEWTON_ITERS {
        let fx = x00 + u * ax + v * bx + u * v * cx - px;
        let fy = y00 + u * ay + v * by + u * v * cy - py;
        if fx.hypot(fy) < tol {
            break;
        }
        // Jacobian columns: dP/du, dP/dv
        let jxu = ax + v * cx;
        let jyu = ay + v * cy;
        let jxv = bx + u * cx;
        let jyv = by + u * cy;
        let det = jxu * jyv - jxv * jyu;
        if det.abs() < 1e-300 {
            return None;
        }
        u -= (fx * jyv - fy * jxv) / det;
        v -= (jxu * fy - jyu * fx) / det;
        // Diverging iterates mean the point is in some other quad
        if !(-2.0..=3.0).contains(&u) || !(-2.0..=3.0).contains(&v) {
            return None;
        }
    }

    let fx = x00 + u * ax + v * bx + u * v * cx - px;
    let fy = y00 + u * ay + v * by + u * v * cy - py;
    if fx.hypot(fy) > 1e-9 * scale {
        return None;
    }
    if (-UV_SLACK..=1.0 + UV_SLACK).contains(&u) && (-UV_SLACK..=1.0 + UV_SLACK).contains(&v) {
        Some((u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)))
    } else {
        None
    }
}
