//! This module provides the transfer function family and the `FilterConfig` that selects one of
//! them together with its pass mode.
//!
//! A transfer function maps the distance `D` of a frequency cell from the spectrum center to a real
//! gain. Only magnitudes are reshaped; the phase of every coefficient is left untouched.
//! Parameters are checked against inclusive bounds when a `FilterConfig` is built, so evaluating a
//! configured filter can never fail.

use crate::error::{FilterError, FilterResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Upper bound for cutoff distances and Gaussian widths, in frequency cells.
pub const MAX_DISTANCE: f64 = 100_000.0;
/// Upper bound for the Butterworth order.
pub const MAX_ORDER: f64 = 100.0;
/// Upper bound for gains (Gaussian coefficient, boost gain and offset magnitude).
pub const MAX_GAIN: f64 = 1_000.0;
/// Upper bound for the homomorphic illumination/reflectance gains.
pub const MAX_GAMMA: f64 = 100.0;

/// Selects the low-pass or the high-pass form of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum PassMode {
    #[default]
    LowPass,
    HighPass,
}

impl Display for PassMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PassMode::LowPass => write!(f, "Low Pass"),
            PassMode::HighPass => write!(f, "High Pass"),
        }
    }
}

/// A named numeric knob with an inclusive bound.
///
/// UIs can render one slider per parameter from `value`, `min` and `max`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferFunctionParameter {
    pub name: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl TransferFunctionParameter {
    /// Fails with [`FilterError::ParameterOutOfRange`] unless `value` is finite and inside
    /// `[min, max]`.
    pub fn new(name: &'static str, value: f64, min: f64, max: f64) -> FilterResult<Self> {
        if !value.is_finite() || value < min || value > max {
            return Err(FilterError::ParameterOutOfRange {
                name: name.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(TransferFunctionParameter {
            name,
            value,
            min,
            max,
        })
    }

    /// Parameter that must be strictly positive.
    fn positive(name: &'static str, value: f64, max: f64) -> FilterResult<Self> {
        Self::new(name, value, f64::MIN_POSITIVE, max)
    }
}

/// Radially symmetric base shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Passes everything within `cutoff`. A cutoff of zero keeps only the DC term.
    Ideal { cutoff: f64 },
    /// `1 / (1 + (D / cutoff)^(2 order))`
    Butterworth { order: f64, cutoff: f64 },
    /// `exp(-D² / (2 cutoff²))`
    Gaussian { cutoff: f64 },
    /// `coefficient * exp(-D² / (2 sigma²))`
    CoefficientGaussian { sigma: f64, coefficient: f64 },
}

impl Shape {
    /// Gain at distance `d` in the requested mode.
    pub fn evaluate(&self, d: f64, mode: PassMode) -> f64 {
        match (self, mode) {
            (Shape::Ideal { cutoff }, PassMode::LowPass) => {
                if d <= *cutoff {
                    1.0
                } else {
                    0.0
                }
            }
            (Shape::Butterworth { order, cutoff }, PassMode::LowPass) => {
                1.0 / (1.0 + (d / cutoff).powf(2.0 * order))
            }
            // D = 0 gives (cutoff / 0)^(2n) = inf, i.e. a gain of exactly zero at the center.
            (Shape::Butterworth { order, cutoff }, PassMode::HighPass) => {
                1.0 / (1.0 + (cutoff / d).powf(2.0 * order))
            }
            (Shape::Gaussian { cutoff }, PassMode::LowPass) => {
                (-d * d / (2.0 * cutoff * cutoff)).exp()
            }
            (Shape::CoefficientGaussian { sigma, coefficient }, PassMode::LowPass) => {
                coefficient * (-d * d / (2.0 * sigma * sigma)).exp()
            }
            (_, PassMode::HighPass) => 1.0 - self.evaluate(d, PassMode::LowPass),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Ideal { .. } => "Ideal",
            Shape::Butterworth { .. } => "Butterworth",
            Shape::Gaussian { .. } => "Gaussian",
            Shape::CoefficientGaussian { .. } => "Coefficient Gaussian",
        }
    }

    /// Validated parameter descriptors of the shape.
    pub fn parameters(&self) -> FilterResult<Vec<TransferFunctionParameter>> {
        Ok(match *self {
            Shape::Ideal { cutoff } => {
                vec![TransferFunctionParameter::new("cutoff", cutoff, 0.0, MAX_DISTANCE)?]
            }
            Shape::Butterworth { order, cutoff } => vec![
                TransferFunctionParameter::positive("order", order, MAX_ORDER)?,
                TransferFunctionParameter::positive("cutoff", cutoff, MAX_DISTANCE)?,
            ],
            Shape::Gaussian { cutoff } => {
                vec![TransferFunctionParameter::positive("cutoff", cutoff, MAX_DISTANCE)?]
            }
            Shape::CoefficientGaussian { sigma, coefficient } => vec![
                TransferFunctionParameter::positive("sigma", sigma, MAX_DISTANCE)?,
                TransferFunctionParameter::new("coefficient", coefficient, 0.0, MAX_GAIN)?,
            ],
        })
    }
}

/// The transfer functions a frequency filter can apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFunction {
    /// A plain shape.
    Shape(Shape),
    /// `offset + gain * base(D)`, used for high-boost sharpening.
    Boost { base: Shape, offset: f64, gain: f64 },
    /// `(gamma_high - gamma_low) * (1 - base(D)) + gamma_low`.
    ///
    /// Scales low frequencies (illumination) by `gamma_low` and high frequencies (reflectance)
    /// by `gamma_high`.
    HomomorphicEnhance {
        base: Shape,
        gamma_low: f64,
        gamma_high: f64,
    },
}

impl TransferFunction {
    pub fn ideal(cutoff: f64) -> FilterResult<Self> {
        Self::validated(TransferFunction::Shape(Shape::Ideal { cutoff }))
    }

    pub fn butterworth(order: f64, cutoff: f64) -> FilterResult<Self> {
        Self::validated(TransferFunction::Shape(Shape::Butterworth { order, cutoff }))
    }

    pub fn gaussian(cutoff: f64) -> FilterResult<Self> {
        Self::validated(TransferFunction::Shape(Shape::Gaussian { cutoff }))
    }

    pub fn coefficient_gaussian(sigma: f64, coefficient: f64) -> FilterResult<Self> {
        Self::validated(TransferFunction::Shape(Shape::CoefficientGaussian {
            sigma,
            coefficient,
        }))
    }

    pub fn boost(base: Shape, offset: f64, gain: f64) -> FilterResult<Self> {
        Self::validated(TransferFunction::Boost { base, offset, gain })
    }

    pub fn homomorphic(base: Shape, gamma_low: f64, gamma_high: f64) -> FilterResult<Self> {
        Self::validated(TransferFunction::HomomorphicEnhance {
            base,
            gamma_low,
            gamma_high,
        })
    }

    fn validated(function: TransferFunction) -> FilterResult<Self> {
        function.parameters()?;
        Ok(function)
    }

    /// Gain at distance `d`.
    ///
    /// `Boost` evaluates its base shape in `mode`. `HomomorphicEnhance` always uses the low-pass
    /// base, so `gamma_low` stays on the illumination and `gamma_high` on the reflectance.
    pub fn evaluate(&self, d: f64, mode: PassMode) -> f64 {
        match self {
            TransferFunction::Shape(shape) => shape.evaluate(d, mode),
            TransferFunction::Boost { base, offset, gain } => {
                offset + gain * base.evaluate(d, mode)
            }
            TransferFunction::HomomorphicEnhance {
                base,
                gamma_low,
                gamma_high,
            } => {
                let low_pass = base.evaluate(d, PassMode::LowPass);
                (gamma_high - gamma_low) * (1.0 - low_pass) + gamma_low
            }
        }
    }

    /// The shape the function is built on.
    pub fn base(&self) -> &Shape {
        match self {
            TransferFunction::Shape(shape)
            | TransferFunction::Boost { base: shape, .. }
            | TransferFunction::HomomorphicEnhance { base: shape, .. } => shape,
        }
    }

    pub fn name(&self) -> String {
        match self {
            TransferFunction::Shape(shape) => shape.name().to_string(),
            TransferFunction::Boost { base, .. } => format!("High Boost ({})", base.name()),
            TransferFunction::HomomorphicEnhance { base, .. } => {
                format!("Homomorphic ({})", base.name())
            }
        }
    }

    /// Validated parameter descriptors, base shape parameters first.
    pub fn parameters(&self) -> FilterResult<Vec<TransferFunctionParameter>> {
        let mut parameters = self.base().parameters()?;
        match *self {
            TransferFunction::Shape(_) => {}
            TransferFunction::Boost { offset, gain, .. } => {
                parameters.push(TransferFunctionParameter::new(
                    "boost_offset",
                    offset,
                    -MAX_GAIN,
                    MAX_GAIN,
                )?);
                parameters.push(TransferFunctionParameter::new("boost_gain", gain, 0.0, MAX_GAIN)?);
            }
            TransferFunction::HomomorphicEnhance {
                gamma_low,
                gamma_high,
                ..
            } => {
                parameters.push(TransferFunctionParameter::new(
                    "gamma_low",
                    gamma_low,
                    0.0,
                    MAX_GAMMA,
                )?);
                parameters.push(TransferFunctionParameter::new(
                    "gamma_high",
                    gamma_high,
                    0.0,
                    MAX_GAMMA,
                )?);
            }
        }
        Ok(parameters)
    }
}

/// A validated transfer function together with its pass mode.
///
/// # Fields
/// - `function`: The transfer function to apply.
/// - `mode`: Low-pass or high-pass form of the (base) shape.
/// - `parameters`: Parameter descriptors, checked when the config was built.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    function: TransferFunction,
    mode: PassMode,
    parameters: Vec<TransferFunctionParameter>,
}

impl FilterConfig {
    /// Builds a config, failing if any parameter is out of its bound.
    ///
    /// A homomorphic function only has a low-pass form; `HighPass` is a configuration error.
    pub fn new(function: TransferFunction, mode: PassMode) -> FilterResult<Self> {
        let parameters = function.parameters()?;
        if matches!(function, TransferFunction::HomomorphicEnhance { .. })
            && mode == PassMode::HighPass
        {
            return Err(FilterError::Configuration(format!(
                "{} has no high-pass form, gamma_high already weights the high frequencies",
                function.name()
            )));
        }
        Ok(FilterConfig {
            function,
            mode,
            parameters,
        })
    }

    pub fn function(&self) -> &TransferFunction {
        &self.function
    }

    pub fn mode(&self) -> PassMode {
        self.mode
    }

    /// `(name, value, min, max)` descriptors for every knob of the filter.
    pub fn parameters(&self) -> &[TransferFunctionParameter] {
        &self.parameters
    }

    /// Gain at distance `d` from the spectrum center.
    pub fn response(&self, d: f64) -> f64 {
        self.function.evaluate(d, self.mode)
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.function.name(), self.mode)
    }
}
