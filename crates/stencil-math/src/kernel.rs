//! The stencil compute kernel and the field init/check sweeps.
//!
//! `apply_stencil` is shared by the interior and boundary code paths: a
//! pure function of its views, accumulating into the output. The inner
//! loop applies the vertical arm first, then the negative and positive
//! halves of the horizontal arm; validation against the reference error
//! threshold relies on this accumulation order, do not reorder it.

use ndarray::{ArrayView2, ArrayViewMut2};
use stencil_types::constants::{COEF_X, COEF_Y};

use crate::rect::Rect;
use crate::weights::WeightTable;

/// Accumulate one stencil application over `target` into `output`.
///
/// `input` covers the whole halo tile and is indexed directly in
/// tile-local coordinates. `output` may be a band of the tile; `origin`
/// is the tile-local coordinate of its `[[0, 0]]` element. `target` is
/// tile-local and must already be clamped so that every read stays
/// inside the tile.
pub fn apply_stencil(
    input: &ArrayView2<f64>,
    output: &mut ArrayViewMut2<f64>,
    origin: (usize, usize),
    target: Rect,
    weights: &WeightTable,
) {
    let r = weights.radius() as isize;
    let (ox, oy) = origin;
    for y in target.y0..target.y1 {
        for x in target.x0..target.x1 {
            let mut acc = output[[y - oy, x - ox]];
            for dy in -r..=r {
                acc += weights.at(0, dy) * input[[(y as isize + dy) as usize, x]];
            }
            for dx in -r..0 {
                acc += weights.at(dx, 0) * input[[y, (x as isize + dx) as usize]];
            }
            for dx in 1..=r {
                acc += weights.at(dx, 0) * input[[y, (x as isize + dx) as usize]];
            }
            output[[y - oy, x - ox]] = acc;
        }
    }
}

/// Seed a tile plane with the linear ramp `COEF_X * x + COEF_Y * y` in
/// global coordinates. `frame` is the global rect the plane covers.
pub fn fill_linear(plane: &mut ArrayViewMut2<f64>, frame: Rect) {
    for ly in 0..frame.height() {
        let gy = (frame.y0 + ly) as f64;
        for lx in 0..frame.width() {
            let gx = (frame.x0 + lx) as f64;
            plane[[ly, lx]] = COEF_X * gx + COEF_Y * gy;
        }
    }
}

/// Accumulated absolute deviation of the output plane from the expected
/// value `iterations * (COEF_X + COEF_Y)`, over the private cells that
/// lie in the global core (at least `radius` away from every border).
pub fn accumulated_error(
    output: &ArrayView2<f64>,
    frame: Rect,
    private: Rect,
    n: usize,
    radius: usize,
    iterations: usize,
) -> f64 {
    let norm = iterations as f64 * (COEF_X + COEF_Y);
    let mut abserr = 0.0;
    for gy in private.y0..private.y1 {
        if gy < radius || gy >= n - radius {
            continue;
        }
        for gx in private.x0..private.x1 {
            if gx < radius || gx >= n - radius {
                continue;
            }
            let value = output[[gy - frame.y0, gx - frame.x0]];
            abserr += (value - norm).abs();
        }
    }
    abserr
}
