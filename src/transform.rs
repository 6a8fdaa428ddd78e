//! Forward and inverse 2D discrete Fourier transform between real sample grids and centered
//! spectral grids.
//!
//! Rows are transformed first, then columns. Transform lengths are arbitrary: `rustfft` plans a
//! mixed-radix, Rader or Bluestein algorithm for each length, so images are never padded and the
//! spectral grid always has the exact dimensions of its source.
//!
//! Every call builds its own planner and scratch buffers; nothing is shared between calls, so
//! transforms of different images can run on different threads.

use crate::data_container::{try_alloc_grid, ComplexSample, RealGrid, SampleGrid, SpectralGrid};
use crate::error::{FilterError, FilterResult};
use crate::math_tools::{checkerboard_flip, fftshift, ifftshift, CenterShift};
use ndarray::{Array2, Axis};
use rustfft::{FftDirection, FftPlanner};

/// Forward/inverse spectral transform with a fixed centering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpectralTransform {
    /// `None` picks [`CenterShift::for_dimensions`] on every call.
    center_shift: Option<CenterShift>,
}

impl SpectralTransform {
    /// Transform choosing the centering policy from the image dimensions.
    pub fn new() -> Self {
        SpectralTransform { center_shift: None }
    }

    /// Transform that always uses `center_shift`.
    ///
    /// [`CenterShift::Checkerboard`] on an image with an odd dimension still round-trips exactly,
    /// but the spectrum is then offset by half a frequency cell and is not centered.
    pub fn with_center_shift(center_shift: CenterShift) -> Self {
        SpectralTransform {
            center_shift: Some(center_shift),
        }
    }

    /// Policy used for a `width x height` image.
    pub fn center_shift(&self, width: usize, height: usize) -> CenterShift {
        self.center_shift
            .unwrap_or_else(|| CenterShift::for_dimensions(width, height))
    }

    /// Transforms an 8-bit sample grid into a centered spectrum.
    pub fn forward(&self, samples: &SampleGrid) -> FilterResult<SpectralGrid> {
        samples.ensure_not_empty()?;
        let (width, height) = samples.dimensions();
        let mut data = try_alloc_grid(width, height, ComplexSample::new(0.0, 0.0))?;
        data.zip_mut_with(samples.as_array(), |c, &s| *c = ComplexSample::new(f64::from(s), 0.0));
        self.forward_complex(data)
    }

    /// Transforms a real-valued grid (e.g. log intensities) into a centered spectrum.
    pub fn forward_real(&self, samples: &RealGrid) -> FilterResult<SpectralGrid> {
        let (height, width) = samples.dim();
        if width == 0 || height == 0 {
            return Err(FilterError::UnsupportedInput(format!(
                "grid of size {width}x{height} has no samples"
            )));
        }
        let mut data = try_alloc_grid(width, height, ComplexSample::new(0.0, 0.0))?;
        data.zip_mut_with(samples, |c, &s| *c = ComplexSample::new(s, 0.0));
        self.forward_complex(data)
    }

    /// Inverse transform, rounded to the nearest integer and clipped to `[0, 255]`.
    pub fn inverse(&self, grid: SpectralGrid) -> FilterResult<SampleGrid> {
        Ok(SampleGrid::from_real(&self.inverse_real(grid)?))
    }

    /// Inverse transform returning the real part without rounding or clipping.
    pub fn inverse_real(&self, grid: SpectralGrid) -> FilterResult<RealGrid> {
        let (width, height) = grid.dimensions();
        if width == 0 || height == 0 {
            return Err(FilterError::UnsupportedInput(format!(
                "spectrum of size {width}x{height} has no samples"
            )));
        }
        let shift = self.center_shift(width, height);
        let mut data = match shift {
            CenterShift::Checkerboard => grid.into_array(),
            CenterShift::QuadrantSwap => ifftshift(grid.as_array()),
        };

        fft_2d(&mut data, FftDirection::Inverse);

        if shift == CenterShift::Checkerboard {
            checkerboard_flip(&mut data);
        }
        let norm = 1.0 / (width * height) as f64;
        Ok(data.mapv(|c| c.re * norm))
    }

    fn forward_complex(&self, mut data: Array2<ComplexSample>) -> FilterResult<SpectralGrid> {
        let (height, width) = data.dim();
        let shift = self.center_shift(width, height);
        log::debug!("forward transform of {width}x{height} samples, centering: {shift}");

        if shift == CenterShift::Checkerboard {
            checkerboard_flip(&mut data);
        }
        fft_2d(&mut data, FftDirection::Forward);

        Ok(match shift {
            CenterShift::Checkerboard => SpectralGrid::from_array(data),
            CenterShift::QuadrantSwap => SpectralGrid::from_array(fftshift(&data)),
        })
    }
}

/// Unnormalized 2D FFT in place: every row, then every column.
fn fft_2d(data: &mut Array2<ComplexSample>, direction: FftDirection) {
    let (height, width) = data.dim();
    let mut planner = FftPlanner::<f64>::new();

    let row_fft = planner.plan_fft(width, direction);
    let mut scratch = vec![ComplexSample::default(); row_fft.get_inplace_scratch_len()];
    let mut line = vec![ComplexSample::default(); width.max(height)];
    for mut row in data.axis_iter_mut(Axis(0)) {
        let buffer = &mut line[..width];
        for (b, v) in buffer.iter_mut().zip(row.iter()) {
            *b = *v;
        }
        row_fft.process_with_scratch(buffer, &mut scratch);
        row.iter_mut().zip(buffer.iter()).for_each(|(v, b)| *v = *b);
    }

    let column_fft = planner.plan_fft(height, direction);
    scratch.resize(column_fft.get_inplace_scratch_len(), ComplexSample::default());
    for mut column in data.axis_iter_mut(Axis(1)) {
        let buffer = &mut line[..height];
        for (b, v) in buffer.iter_mut().zip(column.iter()) {
            *b = *v;
        }
        column_fft.process_with_scratch(buffer, &mut scratch);
        column.iter_mut().zip(buffer.iter()).for_each(|(v, b)| *v = *b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pattern(width: usize, height: usize) -> SampleGrid {
        SampleGrid::from_fn(width, height, |x, y| ((x * 37 + y * 91 + x * y * 13) % 256) as u8)
    }

    fn assert_within_one_level(a: &SampleGrid, b: &SampleGrid) {
        assert_eq!(a.dimensions(), b.dimensions());
        for (p, q) in a.as_array().iter().zip(b.as_array().iter()) {
            assert!((*p as i32 - *q as i32).abs() <= 1, "{p} vs {q}");
        }
    }

    #[test]
    fn test_round_trip_even_dimensions() {
        let transform = SpectralTransform::new();
        for (w, h) in [(8, 8), (16, 4), (6, 10)] {
            let input = pattern(w, h);
            let output = transform.inverse(transform.forward(&input).unwrap()).unwrap();
            assert_within_one_level(&input, &output);
        }
    }

    #[test]
    fn test_round_trip_odd_and_prime_dimensions() {
        let transform = SpectralTransform::new();
        for (w, h) in [(7, 5), (13, 8), (1, 9), (11, 1)] {
            let input = pattern(w, h);
            let output = transform.inverse(transform.forward(&input).unwrap()).unwrap();
            assert_within_one_level(&input, &output);
        }
    }

    #[test]
    fn test_forced_checkerboard_round_trips_odd_dimensions() {
        let transform = SpectralTransform::with_center_shift(CenterShift::Checkerboard);
        let input = pattern(9, 7);
        let output = transform.inverse(transform.forward(&input).unwrap()).unwrap();
        assert_within_one_level(&input, &output);
    }

    #[test]
    fn test_constant_grid_has_only_dc_term() {
        let transform = SpectralTransform::new();
        let input = SampleGrid::filled(4, 4, 128);
        let spectrum = transform.forward(&input).unwrap();
        let (cu, cv) = spectrum.center();
        assert_eq!((cu, cv), (2, 2));
        for ((v, u), c) in spectrum.as_array().indexed_iter() {
            if (u, v) == (cu, cv) {
                assert_abs_diff_eq!(c.re, 128.0 * 16.0, epsilon = 1e-9);
                assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-9);
            } else {
                assert_abs_diff_eq!(c.norm(), 0.0, epsilon = 1e-9);
            }
        }
        let output = transform.inverse(spectrum).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_both_policies_center_dc_for_even_dimensions() {
        let input = pattern(8, 6);
        let checkerboard = SpectralTransform::with_center_shift(CenterShift::Checkerboard)
            .forward(&input)
            .unwrap();
        let swapped = SpectralTransform::with_center_shift(CenterShift::QuadrantSwap)
            .forward(&input)
            .unwrap();
        for (a, b) in checkerboard.as_array().iter().zip(swapped.as_array().iter()) {
            assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-6);
            assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_dc_term_is_sum_for_odd_dimensions() {
        let input = pattern(5, 3);
        let sum: f64 = input.as_array().iter().map(|&v| f64::from(v)).sum();
        let spectrum = SpectralTransform::new().forward(&input).unwrap();
        let (cu, cv) = spectrum.center();
        assert_abs_diff_eq!(spectrum.get(cu, cv).re, sum, epsilon = 1e-9);
    }

    #[test]
    fn test_real_round_trip_keeps_fractional_values() {
        let transform = SpectralTransform::new();
        let input = RealGrid::from_shape_fn((4, 6), |(y, x)| (x as f64 * 0.3 - y as f64).sin());
        let output = transform
            .inverse_real(transform.forward_real(&input).unwrap())
            .unwrap();
        for (a, b) in input.iter().zip(output.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let transform = SpectralTransform::new();
        assert!(matches!(
            transform.forward(&SampleGrid::new(0, 3)),
            Err(FilterError::UnsupportedInput(_))
        ));
    }
}
