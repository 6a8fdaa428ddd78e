//! Homomorphic filtering.
//!
//! An image is modelled as illumination times reflectance. Taking `ln(1 + f)` turns the product
//! into a sum, so a `HomomorphicEnhance` transfer function can damp the slowly varying
//! illumination (`gamma_low`) while boosting the reflectance detail (`gamma_high`). The result is
//! mapped back with `exp(g) - 1`.

use crate::data_container::{Raster, RealGrid, SampleGrid};
use crate::error::{FilterError, FilterResult};
use crate::filters::filter::{FilterConfig, TransferFunction};
use crate::filters::frequency_filter::{FrequencyFilter, TransferMask};

/// Fails with a configuration error unless `config` holds a `HomomorphicEnhance` function.
pub fn ensure_homomorphic(config: &FilterConfig) -> FilterResult<()> {
    match config.function() {
        TransferFunction::HomomorphicEnhance { .. } => Ok(()),
        other => Err(FilterError::Configuration(format!(
            "homomorphic filtering needs a homomorphic transfer function, got {}",
            other.name()
        ))),
    }
}

impl FrequencyFilter {
    /// `exp(H · F{ln(1 + f)}) - 1`, rounded and clipped to `[0, 255]`.
    pub fn apply_homomorphic_filter<R: Raster>(
        &self,
        image: &R,
        config: &FilterConfig,
    ) -> FilterResult<R> {
        ensure_homomorphic(config)?;
        let samples = SampleGrid::from_raster(image);
        samples.ensure_not_empty()?;
        let (width, height) = samples.dimensions();
        log::debug!("applying {} to a {width}x{height} image", config.name());

        let log_samples: RealGrid = samples.to_real().mapv(f64::ln_1p);
        let mask = TransferMask::new(config, width, height)?;
        let spectrum = self.transform().forward_real(&log_samples)?;
        let filtered = self.transform().inverse_real(mask.apply(spectrum)?)?;

        SampleGrid::from_real(&filtered.mapv(f64::exp_m1)).to_raster(image)
    }
}
