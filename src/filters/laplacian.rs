//! Laplacian filtering in the frequency domain.
//!
//! The second derivative has the transfer function `H(u, v) = -4π²(u'² + v'²)`, with `u'` and
//! `v'` the centered frequencies in cycles per sample.

use crate::data_container::{Raster, RealGrid, SampleGrid};
use crate::error::FilterResult;
use crate::filters::frequency_filter::{FrequencyFilter, TransferMask};
use crate::math_tools::normalize_to_display;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

/// How the Laplacian is turned into a displayable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum LaplacianOutput {
    /// `f - ∇²f`, clipped to `[0, 255]`.
    #[default]
    Sharpen,
    /// `∇²f` min-max normalized to `[0, 255]`.
    Edges,
}

impl Display for LaplacianOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LaplacianOutput::Sharpen => write!(f, "Sharpen"),
            LaplacianOutput::Edges => write!(f, "Edges"),
        }
    }
}

/// The Laplacian transfer function for a `width x height` spectrum.
pub fn laplacian_mask(width: usize, height: usize) -> FilterResult<TransferMask> {
    TransferMask::from_fn(width, height, |u, v| {
        let fu = (u as f64 - (width / 2) as f64) / width as f64;
        let fv = (v as f64 - (height / 2) as f64) / height as f64;
        -4.0 * PI * PI * (fu * fu + fv * fv)
    })
}

impl FrequencyFilter {
    /// The unclipped Laplacian `∇²f` of the image.
    pub fn laplacian(&self, samples: &SampleGrid) -> FilterResult<RealGrid> {
        samples.ensure_not_empty()?;
        let (width, height) = samples.dimensions();
        let mask = laplacian_mask(width, height)?;
        let spectrum = self.transform().forward(samples)?;
        self.transform().inverse_real(mask.apply(spectrum)?)
    }

    /// Applies the Laplacian and converts it into an 8-bit image according to `output`.
    pub fn apply_laplacian_filter<R: Raster>(
        &self,
        image: &R,
        output: LaplacianOutput,
    ) -> FilterResult<R> {
        let samples = SampleGrid::from_raster(image);
        let laplacian = self.laplacian(&samples)?;
        log::debug!(
            "applying Laplacian ({output}) to a {}x{} image",
            samples.width(),
            samples.height()
        );
        let result = match output {
            LaplacianOutput::Sharpen => samples.to_real() - &laplacian,
            LaplacianOutput::Edges => normalize_to_display(&laplacian),
        };
        SampleGrid::from_real(&result).to_raster(image)
    }
}
