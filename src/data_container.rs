//! This module defines the grids the engine works on: the 8-bit `SampleGrid` read from an image,
//! the complex `SpectralGrid` produced by the forward transform, and the `Raster` capability
//! through which the engine talks to external image types.

use crate::error::{FilterError, FilterResult};
use image::{DynamicImage, GrayImage, Luma};
use ndarray::Array2;
use num_complex::Complex64;

/// A single spectral coefficient.
pub type ComplexSample = Complex64;

/// Real-valued intermediate grid, indexed `[row, column]`.
pub type RealGrid = Array2<f64>;

/// Capability the engine needs from an image implementation.
///
/// Coordinates are `(x, y)` = `(column, row)`. Color images must be reduced to a single
/// gray channel by the caller before they reach the engine.
pub trait Raster: Sized {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn get_pixel(&self, x: usize, y: usize) -> u8;
    fn set_pixel(&mut self, x: usize, y: usize, value: u8);
    /// Creates a new, black image with the same dimensions.
    fn new_same_size(&self) -> Self;
}

/// Allocates a `width x height` array filled with `fill`, reporting allocation failure
/// as [`FilterError::ResourceExhaustion`] instead of aborting.
pub fn try_alloc_grid<T: Clone>(width: usize, height: usize, fill: T) -> FilterResult<Array2<T>> {
    let exhausted = || FilterError::ResourceExhaustion { width, height };
    let len = width.checked_mul(height).ok_or_else(exhausted)?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| exhausted())?;
    buffer.resize(len, fill);
    Array2::from_shape_vec((height, width), buffer).map_err(|_| exhausted())
}

/// 8-bit intensity matrix.
///
/// # Fields
/// - `data`: Pixel intensities, indexed `[row, column]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleGrid {
    data: Array2<u8>,
}

impl SampleGrid {
    /// Creates a black grid.
    pub fn new(width: usize, height: usize) -> SampleGrid {
        SampleGrid {
            data: Array2::zeros((height, width)),
        }
    }

    /// Creates a grid filled with a single intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> SampleGrid {
        SampleGrid {
            data: Array2::from_elem((height, width), value),
        }
    }

    /// Creates a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F: FnMut(usize, usize) -> u8>(
        width: usize,
        height: usize,
        mut f: F,
    ) -> SampleGrid {
        SampleGrid {
            data: Array2::from_shape_fn((height, width), |(y, x)| f(x, y)),
        }
    }

    pub fn from_array(data: Array2<u8>) -> SampleGrid {
        SampleGrid { data }
    }

    /// Copies any `Raster` into a grid.
    pub fn from_raster<R: Raster>(image: &R) -> SampleGrid {
        SampleGrid::from_fn(image.width(), image.height(), |x, y| image.get_pixel(x, y))
    }

    /// Writes the grid into a new image of the same kind and size as `template`.
    pub fn to_raster<R: Raster>(&self, template: &R) -> FilterResult<R> {
        if (template.width(), template.height()) != self.dimensions() {
            return Err(FilterError::DimensionMismatch {
                expected: (template.width(), template.height()),
                found: self.dimensions(),
            });
        }
        let mut output = template.new_same_size();
        for ((y, x), value) in self.data.indexed_iter() {
            output.set_pixel(x, y, *value);
        }
        Ok(output)
    }

    /// Builds a grid from real values by rounding to the nearest integer and clipping to
    /// `[0, 255]`.
    pub fn from_real(values: &RealGrid) -> SampleGrid {
        SampleGrid {
            data: values.mapv(round_clip),
        }
    }

    pub fn to_real(&self) -> RealGrid {
        self.data.mapv(f64::from)
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[(y, x)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[(y, x)] = value;
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }

    /// Average intensity; `0.0` for an empty grid.
    pub fn mean(&self) -> f64 {
        self.data.iter().map(|&v| f64::from(v)).sum::<f64>() / self.data.len().max(1) as f64
    }

    /// Fails with [`FilterError::UnsupportedInput`] if the grid has no pixels.
    pub fn ensure_not_empty(&self) -> FilterResult<()> {
        if self.data.is_empty() {
            return Err(FilterError::UnsupportedInput(format!(
                "image of size {}x{} has no pixels",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }
}

/// Rounds to the nearest integer and clips to the 8-bit display range.
pub fn round_clip(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.round().clamp(0.0, 255.0) as u8
    }
}

impl Raster for SampleGrid {
    fn width(&self) -> usize {
        SampleGrid::width(self)
    }

    fn height(&self) -> usize {
        SampleGrid::height(self)
    }

    fn get_pixel(&self, x: usize, y: usize) -> u8 {
        self.get(x, y)
    }

    fn set_pixel(&mut self, x: usize, y: usize, value: u8) {
        self.set(x, y, value);
    }

    fn new_same_size(&self) -> Self {
        SampleGrid::new(self.width(), self.height())
    }
}

impl Raster for GrayImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn get_pixel(&self, x: usize, y: usize) -> u8 {
        image::ImageBuffer::get_pixel(self, x as u32, y as u32).0[0]
    }

    fn set_pixel(&mut self, x: usize, y: usize, value: u8) {
        self.put_pixel(x as u32, y as u32, Luma([value]));
    }

    fn new_same_size(&self) -> Self {
        let (width, height) = self.dimensions();
        GrayImage::new(width, height)
    }
}

impl TryFrom<&DynamicImage> for SampleGrid {
    type Error = FilterError;

    /// Only 8-bit luma images are accepted; converting color or wide pixel formats
    /// is the caller's job.
    fn try_from(image: &DynamicImage) -> FilterResult<Self> {
        match image {
            DynamicImage::ImageLuma8(gray) => {
                let grid = SampleGrid::from_raster(gray);
                grid.ensure_not_empty()?;
                Ok(grid)
            }
            other => Err(FilterError::UnsupportedInput(format!(
                "expected an 8-bit gray image, got {:?}",
                other.color()
            ))),
        }
    }
}

impl From<&SampleGrid> for GrayImage {
    fn from(grid: &SampleGrid) -> Self {
        GrayImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
            Luma([grid.get(x as usize, y as usize)])
        })
    }
}

/// Complex spectrum with the same dimensions as the image it was computed from.
///
/// The zero-frequency term sits at `(width / 2, height / 2)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralGrid {
    data: Array2<ComplexSample>,
}

impl SpectralGrid {
    /// Allocates an all-zero grid.
    pub fn zeros(width: usize, height: usize) -> FilterResult<SpectralGrid> {
        Ok(SpectralGrid {
            data: try_alloc_grid(width, height, ComplexSample::new(0.0, 0.0))?,
        })
    }

    pub fn from_array(data: Array2<ComplexSample>) -> SpectralGrid {
        SpectralGrid { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Coefficient at frequency column `u` and row `v`.
    pub fn get(&self, u: usize, v: usize) -> ComplexSample {
        self.data[(v, u)]
    }

    /// Position of the zero-frequency term.
    pub fn center(&self) -> (usize, usize) {
        (self.width() / 2, self.height() / 2)
    }

    pub fn as_array(&self) -> &Array2<ComplexSample> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array2<ComplexSample> {
        &mut self.data
    }

    pub fn into_array(self) -> Array2<ComplexSample> {
        self.data
    }

    /// Fails with [`FilterError::DimensionMismatch`] unless the grid is `width x height`.
    pub fn ensure_dimensions(&self, width: usize, height: usize) -> FilterResult<()> {
        if self.dimensions() != (width, height) {
            return Err(FilterError::DimensionMismatch {
                expected: (width, height),
                found: self.dimensions(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_clip_saturates() {
        assert_eq!(round_clip(-3.2), 0);
        assert_eq!(round_clip(127.5), 128);
        assert_eq!(round_clip(254.4), 254);
        assert_eq!(round_clip(300.0), 255);
        assert_eq!(round_clip(f64::NAN), 0);
    }

    #[test]
    fn test_sample_grid_uses_xy_coordinates() {
        let grid = SampleGrid::from_fn(3, 2, |x, y| (10 * y + x) as u8);
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.get(2, 1), 12);
        assert_eq!(grid.as_array()[(1, 2)], 12);
    }

    #[test]
    fn test_gray_image_round_trip_through_raster() {
        let grid = SampleGrid::from_fn(4, 3, |x, y| (x * 20 + y * 50) as u8);
        let gray = GrayImage::from(&grid);
        assert_eq!(SampleGrid::from_raster(&gray), grid);

        let copy: GrayImage = grid.to_raster(&gray).unwrap();
        assert_eq!(copy, gray);
    }

    #[test]
    fn test_to_raster_rejects_other_size() {
        let grid = SampleGrid::new(4, 4);
        let template = GrayImage::new(5, 4);
        let err = grid.to_raster(&template).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_dynamic_image_must_be_luma8() {
        let rgb = DynamicImage::new_rgb8(4, 4);
        assert!(matches!(
            SampleGrid::try_from(&rgb),
            Err(FilterError::UnsupportedInput(_))
        ));

        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 2, Luma([9])));
        let grid = SampleGrid::try_from(&gray).unwrap();
        assert_eq!(grid, SampleGrid::filled(4, 2, 9));

        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        assert!(matches!(
            SampleGrid::try_from(&empty),
            Err(FilterError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_oversized_allocation_is_reported() {
        let err = SpectralGrid::zeros(usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            FilterError::ResourceExhaustion {
                width: usize::MAX,
                height: 2
            }
        );
    }

    #[test]
    fn test_spectral_grid_dimension_check() {
        let grid = SpectralGrid::zeros(4, 2).unwrap();
        assert_eq!(grid.center(), (2, 1));
        assert!(grid.ensure_dimensions(4, 2).is_ok());
        assert_eq!(
            grid.ensure_dimensions(2, 4),
            Err(FilterError::DimensionMismatch {
                expected: (2, 4),
                found: (4, 2)
            })
        );
    }
}
