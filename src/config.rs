//! User-facing filter settings.
//!
//! `FilterSettings` holds every knob a front end exposes, whether or not the selected filter uses
//! it, so switching between filters keeps the values. It is persisted between runs and turned into
//! a validated [`FilterOperation`] with [`FilterSettings::build`].

use crate::error::FilterResult;
use crate::filters::filter::{FilterConfig, PassMode, Shape, TransferFunction};
use crate::filters::frequency_filter::FilterOperation;
use crate::filters::laplacian::LaplacianOutput;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The filter a front end applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum FilterKind {
    Ideal,
    #[default]
    Butterworth,
    Gaussian,
    CoefficientGaussian,
    HighBoost,
    Homomorphic,
    Laplacian,
}

impl FilterKind {
    /// Suffix used when naming output files.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            FilterKind::Ideal => "ideal",
            FilterKind::Butterworth => "butterworth",
            FilterKind::Gaussian => "gaussian",
            FilterKind::CoefficientGaussian => "coefficient_gaussian",
            FilterKind::HighBoost => "high_boost",
            FilterKind::Homomorphic => "homomorphic",
            FilterKind::Laplacian => "laplacian",
        }
    }
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_suffix())
    }
}

/// Base shape of the high-boost and homomorphic filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum BaseShape {
    Ideal,
    Butterworth,
    #[default]
    Gaussian,
    CoefficientGaussian,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(default)]
pub struct FilterSettings {
    pub kind: FilterKind,
    pub base: BaseShape,
    /// Pass mode of the plain shapes. High boost always sharpens with the high-pass base and
    /// the homomorphic filter always uses the low-pass base.
    pub mode: PassMode,
    pub cutoff: f64,
    pub order: f64,
    pub sigma: f64,
    pub coefficient: f64,
    pub boost_offset: f64,
    pub boost_gain: f64,
    pub gamma_low: f64,
    pub gamma_high: f64,
    pub laplacian: LaplacianOutput,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            kind: FilterKind::default(),
            base: BaseShape::default(),
            mode: PassMode::LowPass,
            cutoff: 30.0,
            order: 2.0,
            sigma: 30.0,
            coefficient: 1.0,
            boost_offset: 1.0,
            boost_gain: 1.5,
            gamma_low: 0.5,
            gamma_high: 2.0,
            laplacian: LaplacianOutput::Sharpen,
        }
    }
}

impl FilterSettings {
    fn base_shape(&self) -> Shape {
        match self.base {
            BaseShape::Ideal => Shape::Ideal {
                cutoff: self.cutoff,
            },
            BaseShape::Butterworth => Shape::Butterworth {
                order: self.order,
                cutoff: self.cutoff,
            },
            BaseShape::Gaussian => Shape::Gaussian {
                cutoff: self.cutoff,
            },
            BaseShape::CoefficientGaussian => Shape::CoefficientGaussian {
                sigma: self.sigma,
                coefficient: self.coefficient,
            },
        }
    }

    /// Validates the settings of the selected filter and builds the operation.
    ///
    /// Values only used by other filters are not checked.
    pub fn build(&self) -> FilterResult<FilterOperation> {
        let function = match self.kind {
            FilterKind::Laplacian => return Ok(FilterOperation::Laplacian(self.laplacian)),
            FilterKind::Ideal => TransferFunction::ideal(self.cutoff)?,
            FilterKind::Butterworth => TransferFunction::butterworth(self.order, self.cutoff)?,
            FilterKind::Gaussian => TransferFunction::gaussian(self.cutoff)?,
            FilterKind::CoefficientGaussian => {
                TransferFunction::coefficient_gaussian(self.sigma, self.coefficient)?
            }
            FilterKind::HighBoost => {
                let function =
                    TransferFunction::boost(self.base_shape(), self.boost_offset, self.boost_gain)?;
                let config = FilterConfig::new(function, PassMode::HighPass)?;
                return Ok(FilterOperation::Distance(config));
            }
            FilterKind::Homomorphic => {
                let function = TransferFunction::homomorphic(
                    self.base_shape(),
                    self.gamma_low,
                    self.gamma_high,
                )?;
                let config = FilterConfig::new(function, PassMode::LowPass)?;
                return FilterOperation::homomorphic(config);
            }
        };
        Ok(FilterOperation::Distance(FilterConfig::new(function, self.mode)?))
    }
}
