//! Renders spectra and transfer masks as 8-bit images for display next to the filtered image.

use crate::data_container::{round_clip, SampleGrid, SpectralGrid};
use crate::filters::frequency_filter::TransferMask;
use crate::math_tools::{log_scale, normalize_to_display};

/// Turns spectral data into viewable gray images.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectrumVisualizer;

impl SpectrumVisualizer {
    pub fn new() -> Self {
        SpectrumVisualizer
    }

    /// Log-scaled magnitude spectrum.
    ///
    /// Each magnitude is normalized by `sqrt(width * height)` and mapped with
    /// `ln(1 + m) / (ln(1 + max) / 255)`, so the strongest coefficient of the grid is white.
    /// An all-zero spectrum renders black.
    pub fn magnitude_image(&self, grid: &SpectralGrid) -> SampleGrid {
        let (width, height) = grid.dimensions();
        let norm = ((width * height) as f64).sqrt();
        let magnitudes = grid.as_array().mapv(|c| c.norm() / norm);
        let max = magnitudes.iter().fold(0.0_f64, |a, &b| a.max(b));
        log::debug!("rendering {width}x{height} spectrum, peak magnitude {max:.3}");
        SampleGrid::from_array(magnitudes.mapv(|m| round_clip(log_scale(m, max))))
    }

    /// The mask gains min-max normalized to `[0, 255]`.
    pub fn transfer_image(&self, mask: &TransferMask) -> SampleGrid {
        SampleGrid::from_real(&normalize_to_display(mask.as_array()))
    }
}
