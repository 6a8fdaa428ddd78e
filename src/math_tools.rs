//! This module provides the small numeric building blocks of the spectral engine: the spectral
//! center shift (checkerboard sign flip or quadrant swap), the distance of a frequency cell from
//! the spectrum center and the log scaling used for display.

use ndarray::{Array2, Zip};
use num_complex::Complex64;
use std::fmt::{Display, Formatter};

/// Strategy used to move the zero-frequency term to the grid center.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CenterShift {
    /// Multiply sample `(x, y)` by `(-1)^(x + y)` before the transform.
    /// Only centers correctly when both dimensions are even.
    Checkerboard,
    /// Swap the spectrum quadrants after the transform (`fftshift`) and undo it before the
    /// inverse (`ifftshift`). Works for any dimensions.
    QuadrantSwap,
}

impl CenterShift {
    /// Picks the checkerboard flip for even dimensions and the quadrant swap otherwise.
    pub fn for_dimensions(width: usize, height: usize) -> CenterShift {
        if width % 2 == 0 && height % 2 == 0 {
            CenterShift::Checkerboard
        } else {
            CenterShift::QuadrantSwap
        }
    }
}

impl Display for CenterShift {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CenterShift::Checkerboard => write!(f, "Checkerboard"),
            CenterShift::QuadrantSwap => write!(f, "Quadrant Swap"),
        }
    }
}

/// Multiplies every sample by `(-1)^(x + y)`. The operation is its own inverse.
pub fn checkerboard_flip(grid: &mut Array2<Complex64>) {
    for ((y, x), value) in grid.indexed_iter_mut() {
        if (x + y) % 2 == 1 {
            *value = -*value;
        }
    }
}

/// Rolls both axes forward by `n / 2`, moving index `0` to `n / 2`.
pub fn fftshift<T: Clone>(grid: &Array2<T>) -> Array2<T> {
    let (height, width) = grid.dim();
    roll(grid, width / 2, height / 2)
}

/// Inverse of [`fftshift`]. Differs from it when a dimension is odd.
pub fn ifftshift<T: Clone>(grid: &Array2<T>) -> Array2<T> {
    let (height, width) = grid.dim();
    roll(grid, width - width / 2, height - height / 2)
}

/// Circular shift: output `(y, x)` takes input `(y - shift_y, x - shift_x)` (modulo size).
fn roll<T: Clone>(grid: &Array2<T>, shift_x: usize, shift_y: usize) -> Array2<T> {
    let (height, width) = grid.dim();
    if width == 0 || height == 0 {
        return grid.clone();
    }
    Array2::from_shape_fn((height, width), |(y, x)| {
        grid[((y + height - shift_y % height) % height, (x + width - shift_x % width) % width)]
            .clone()
    })
}

/// Euclidean distance of frequency cell `(u, v)` from the centered zero frequency
/// `(width / 2, height / 2)`.
pub fn center_distance(u: usize, v: usize, width: usize, height: usize) -> f64 {
    let du = u as f64 - (width / 2) as f64;
    let dv = v as f64 - (height / 2) as f64;
    du.hypot(dv)
}

/// Largest distance any cell of a `width x height` grid has from the center.
pub fn max_center_distance(width: usize, height: usize) -> f64 {
    let du = (width / 2).max(width.saturating_sub(1) - width / 2) as f64;
    let dv = (height / 2).max(height.saturating_sub(1) - height / 2) as f64;
    du.hypot(dv)
}

/// Scales a non-negative value into `[0, 255]` on a `ln(1 + x)` curve whose top end is `max`.
///
/// Returns `0.0` when `max` is zero so that an all-zero input maps to black.
pub fn log_scale(value: f64, max: f64) -> f64 {
    let scale = max.ln_1p() / 255.0;
    if scale <= 0.0 || !scale.is_finite() {
        return 0.0;
    }
    value.ln_1p() / scale
}

/// Min-max normalizes the values into `[0, 255]`.
///
/// A grid whose spread is within floating point noise counts as constant and maps to `255` if its
/// value is positive and to `0` otherwise.
pub fn normalize_to_display(values: &Array2<f64>) -> Array2<f64> {
    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let tolerance = 1e-9 * (1.0 + min.abs().max(max.abs()));
    let span = max - min;
    if !(span > tolerance) {
        let level = if min > tolerance { 255.0 } else { 0.0 };
        return Array2::from_elem(values.dim(), level);
    }
    let mut output = Array2::zeros(values.dim());
    Zip::from(&mut output)
        .and(values)
        .for_each(|o, &v| *o = (v - min) / span * 255.0);
    output
}
