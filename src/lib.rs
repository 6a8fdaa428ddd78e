//! Frequency-domain filtering of gray images.
//!
//! Images are transformed into a centered spectrum, multiplied by a real transfer function and
//! transformed back. Ideal, Butterworth and Gaussian filters in low- and high-pass form,
//! high-boost sharpening, homomorphic enhancement and Laplacian sharpening are available, as well
//! as log-scaled spectrum images for display.
//!
//! ```no_run
//! use fourier_image_explorer::{
//!     FilterConfig, FrequencyFilter, PassMode, SampleGrid, TransferFunction,
//! };
//!
//! # fn main() -> Result<(), fourier_image_explorer::FilterError> {
//! let image = SampleGrid::filled(64, 64, 100);
//! let config = FilterConfig::new(TransferFunction::butterworth(2.0, 20.0)?, PassMode::LowPass)?;
//! let smoothed = FrequencyFilter::new().apply_distance_filter(&image, &config)?;
//! # let _ = smoothed;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_container;
pub mod error;
pub mod filters;
pub mod io;
pub mod math_tools;
pub mod transform;
pub mod visualizer;

pub use config::{BaseShape, FilterKind, FilterSettings};
pub use data_container::{ComplexSample, Raster, RealGrid, SampleGrid, SpectralGrid};
pub use error::{FilterError, FilterResult};
pub use filters::filter::{
    FilterConfig, PassMode, Shape, TransferFunction, TransferFunctionParameter,
};
pub use filters::frequency_filter::{FilterOperation, FrequencyFilter, TransferMask};
pub use filters::laplacian::LaplacianOutput;
pub use math_tools::CenterShift;
pub use transform::SpectralTransform;
pub use visualizer::SpectrumVisualizer;
