//! This module implements the frequency filter pipeline: forward transform, multiplication with a
//! transfer mask and inverse transform.
//!
//! The homomorphic and Laplacian variants live in their own modules and extend
//! [`FrequencyFilter`] with further `apply_*` methods.

use crate::data_container::{try_alloc_grid, Raster, SampleGrid, SpectralGrid};
use crate::error::FilterResult;
use crate::filters::filter::{FilterConfig, TransferFunctionParameter};
use crate::filters::laplacian::{laplacian_mask, LaplacianOutput};
use crate::math_tools::center_distance;
use crate::transform::SpectralTransform;
use ndarray::Array2;

/// A transfer function evaluated over every cell of a `width x height` spectrum.
///
/// A mask can be reused for any number of spectra of the same size.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferMask {
    values: Array2<f64>,
}

impl TransferMask {
    /// Evaluates `config` at the distance of every cell from the spectrum center.
    pub fn new(config: &FilterConfig, width: usize, height: usize) -> FilterResult<Self> {
        Self::from_fn(width, height, |u, v| {
            config.response(center_distance(u, v, width, height))
        })
    }

    /// Evaluates `f(u, v)` for every frequency column `u` and row `v`.
    pub fn from_fn<F: Fn(usize, usize) -> f64>(
        width: usize,
        height: usize,
        f: F,
    ) -> FilterResult<Self> {
        let mut values = try_alloc_grid(width, height, 0.0)?;
        for ((v, u), value) in values.indexed_iter_mut() {
            *value = f(u, v);
        }
        Ok(TransferMask { values })
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Gain at frequency column `u` and row `v`.
    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.values[(v, u)]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }

    /// Multiplies the real and imaginary part of every coefficient by its gain.
    ///
    /// Fails with
    /// [`FilterError::DimensionMismatch`](crate::error::FilterError::DimensionMismatch)
    /// if the spectrum has another size.
    pub fn apply(&self, mut grid: SpectralGrid) -> FilterResult<SpectralGrid> {
        grid.ensure_dimensions(self.width(), self.height())?;
        grid.as_array_mut()
            .zip_mut_with(&self.values, |c, &h| *c = *c * h);
        Ok(grid)
    }
}

/// Runs images through the spectral transform and a transfer function.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyFilter {
    transform: SpectralTransform,
}

impl FrequencyFilter {
    pub fn new() -> Self {
        FrequencyFilter {
            transform: SpectralTransform::new(),
        }
    }

    pub fn with_transform(transform: SpectralTransform) -> Self {
        FrequencyFilter { transform }
    }

    pub fn transform(&self) -> &SpectralTransform {
        &self.transform
    }

    /// Filters `image` with the transfer function of `config`, evaluated at the distance of each
    /// frequency cell from the spectrum center. The input is not modified.
    pub fn apply_distance_filter<R: Raster>(
        &self,
        image: &R,
        config: &FilterConfig,
    ) -> FilterResult<R> {
        let samples = SampleGrid::from_raster(image);
        samples.ensure_not_empty()?;
        let (width, height) = samples.dimensions();
        log::debug!("applying {} to a {width}x{height} image", config.name());
        let mask = TransferMask::new(config, width, height)?;
        self.filter_samples(&samples, &mask)?.to_raster(image)
    }

    /// Filters `image` with a precomputed mask.
    ///
    /// Fails with
    /// [`FilterError::DimensionMismatch`](crate::error::FilterError::DimensionMismatch)
    /// if the mask was built for another size.
    pub fn apply_mask<R: Raster>(&self, image: &R, mask: &TransferMask) -> FilterResult<R> {
        let samples = SampleGrid::from_raster(image);
        self.filter_samples(&samples, mask)?.to_raster(image)
    }

    fn filter_samples(
        &self,
        samples: &SampleGrid,
        mask: &TransferMask,
    ) -> FilterResult<SampleGrid> {
        let spectrum = self.transform.forward(samples)?;
        self.transform.inverse(mask.apply(spectrum)?)
    }
}

/// One fully validated engine operation, as selected by a front end.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOperation {
    Distance(FilterConfig),
    Homomorphic(FilterConfig),
    Laplacian(LaplacianOutput),
}

impl FilterOperation {
    /// Homomorphic operations must carry a homomorphic transfer function.
    pub fn homomorphic(config: FilterConfig) -> FilterResult<Self> {
        crate::filters::homomorphic::ensure_homomorphic(&config)?;
        Ok(FilterOperation::Homomorphic(config))
    }

    pub fn apply<R: Raster>(&self, filter: &FrequencyFilter, image: &R) -> FilterResult<R> {
        match self {
            FilterOperation::Distance(config) => filter.apply_distance_filter(image, config),
            FilterOperation::Homomorphic(config) => filter.apply_homomorphic_filter(image, config),
            FilterOperation::Laplacian(output) => filter.apply_laplacian_filter(image, *output),
        }
    }

    pub fn name(&self) -> String {
        match self {
            FilterOperation::Distance(config) | FilterOperation::Homomorphic(config) => {
                config.name()
            }
            FilterOperation::Laplacian(output) => format!("Laplacian ({output})"),
        }
    }

    /// Parameter descriptors; the Laplacian has none.
    pub fn parameters(&self) -> &[TransferFunctionParameter] {
        match self {
            FilterOperation::Distance(config) | FilterOperation::Homomorphic(config) => {
                config.parameters()
            }
            FilterOperation::Laplacian(_) => &[],
        }
    }

    /// The transfer mask this operation applies to a `width x height` spectrum.
    pub fn mask(&self, width: usize, height: usize) -> FilterResult<TransferMask> {
        match self {
            FilterOperation::Distance(config) | FilterOperation::Homomorphic(config) => {
                TransferMask::new(config, width, height)
            }
            FilterOperation::Laplacian(_) => laplacian_mask(width, height),
        }
    }
}

impl From<FilterConfig> for FilterOperation {
    fn from(config: FilterConfig) -> Self {
        FilterOperation::Distance(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::filters::filter::{PassMode, TransferFunction};
    use crate::math_tools::max_center_distance;
    use image::GrayImage;

    fn pattern(width: usize, height: usize) -> SampleGrid {
        SampleGrid::from_fn(width, height, |x, y| ((x * 53 + y * 29 + (x ^ y) * 7) % 256) as u8)
    }

    fn max_abs_difference(a: &SampleGrid, b: &SampleGrid) -> i32 {
        a.as_array()
            .iter()
            .zip(b.as_array().iter())
            .map(|(p, q)| (*p as i32 - *q as i32).abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_ideal_low_pass_with_large_cutoff_is_identity() {
        let input = pattern(10, 8);
        let cutoff = max_center_distance(10, 8);
        let config = FilterConfig::new(TransferFunction::ideal(cutoff).unwrap(), PassMode::LowPass)
            .unwrap();
        let output = FrequencyFilter::new().apply_distance_filter(&input, &config).unwrap();
        assert!(max_abs_difference(&input, &output) <= 1);
    }

    #[test]
    fn test_ideal_low_pass_with_zero_cutoff_keeps_mean() {
        let input = pattern(8, 6);
        let config = FilterConfig::new(TransferFunction::ideal(0.0).unwrap(), PassMode::LowPass)
            .unwrap();
        let output = FrequencyFilter::new().apply_distance_filter(&input, &config).unwrap();
        let mean = input.mean().round() as u8;
        assert!(output.as_array().iter().all(|&v| v == mean));
    }

    #[test]
    fn test_butterworth_with_huge_cutoff_is_identity() {
        let input = pattern(8, 8);
        let config = FilterConfig::new(
            TransferFunction::butterworth(1.0, 1000.0).unwrap(),
            PassMode::LowPass,
        )
        .unwrap();
        let output = FrequencyFilter::new().apply_distance_filter(&input, &config).unwrap();
        assert!(max_abs_difference(&input, &output) <= 1);
    }

    #[test]
    fn test_high_pass_removes_mean() {
        let input = SampleGrid::filled(8, 8, 200);
        let config = FilterConfig::new(TransferFunction::gaussian(2.0).unwrap(), PassMode::HighPass)
            .unwrap();
        let output = FrequencyFilter::new().apply_distance_filter(&input, &config).unwrap();
        assert!(output.as_array().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_low_pass_smooths_checkerboard() {
        let input = SampleGrid::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { 0 } else { 200 });
        let config = FilterConfig::new(TransferFunction::gaussian(1.5).unwrap(), PassMode::LowPass)
            .unwrap();
        let output = FrequencyFilter::new().apply_distance_filter(&input, &config).unwrap();
        // the checkerboard is the highest frequency and is almost fully removed
        assert!(output.as_array().iter().all(|&v| (v as i32 - 100).abs() <= 2));
    }

    #[test]
    fn test_filter_works_on_gray_images_and_leaves_input_alone() {
        let grid = pattern(6, 4);
        let gray = GrayImage::from(&grid);
        let config = FilterConfig::new(
            TransferFunction::butterworth(2.0, 1.0).unwrap(),
            PassMode::LowPass,
        )
        .unwrap();
        let output: GrayImage = FrequencyFilter::new().apply_distance_filter(&gray, &config)
            .unwrap();
        assert_eq!(output.dimensions(), (6, 4));
        assert_eq!(SampleGrid::from_raster(&gray), grid);
    }

    #[test]
    fn test_mask_with_other_dimensions_is_rejected() {
        let config = FilterConfig::new(TransferFunction::gaussian(3.0).unwrap(), PassMode::LowPass)
            .unwrap();
        let mask = TransferMask::new(&config, 8, 8).unwrap();
        let err = FrequencyFilter::new()
            .apply_mask(&pattern(8, 6), &mask)
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::DimensionMismatch {
                expected: (8, 8),
                found: (8, 6)
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_mask_is_centered() {
        let config = FilterConfig::new(TransferFunction::ideal(1.0).unwrap(), PassMode::LowPass)
            .unwrap();
        let mask = TransferMask::new(&config, 6, 4).unwrap();
        assert_eq!(mask.get(3, 2), 1.0);
        assert_eq!(mask.get(4, 2), 1.0);
        assert_eq!(mask.get(4, 3), 0.0);
        assert_eq!(mask.as_array().sum(), 5.0);
    }

    #[test]
    fn test_operation_delegates_to_filter() {
        let input = pattern(8, 8);
        let config = FilterConfig::new(TransferFunction::ideal(100.0).unwrap(), PassMode::LowPass)
            .unwrap();
        let operation = FilterOperation::from(config);
        let output = operation.apply(&FrequencyFilter::new(), &input).unwrap();
        assert!(max_abs_difference(&input, &output) <= 1);
        assert_eq!(operation.parameters().len(), 1);
        assert_eq!(operation.mask(8, 8).unwrap().dimensions(), (8, 8));
    }
}
