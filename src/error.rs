//! Error hierarchy of the filtering engine.
//!
//! Every failure is raised synchronously by the call that detects it and is
//! never retried: all computations are deterministic, so running them again on
//! the same input would fail the same way.

use thiserror::Error;

/// Root error type for all engine failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A transfer function parameter lies outside its inclusive bound.
    #[error("parameter `{name}` = {value} is outside of [{min}, {max}]")]
    ParameterOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Any other invalid combination of settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A spectral grid or mask was used with an image of another size.
    #[error("dimension mismatch: expected {expected:?} (width, height), found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The pixel representation cannot be read as a real-valued sample grid.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// The buffers for a spectral grid of this size could not be allocated.
    #[error("not enough memory for a {width}x{height} spectral grid")]
    ResourceExhaustion { width: usize, height: usize },
}

impl FilterError {
    /// `true` for the configuration family: parameter bounds, invalid
    /// combinations and dimension mismatches.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FilterError::ParameterOutOfRange { .. }
                | FilterError::Configuration(_)
                | FilterError::DimensionMismatch { .. }
        )
    }
}

pub type FilterResult<T> = Result<T, FilterError>;
