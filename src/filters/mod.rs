//! Frequency-domain image filters.
//!
//! Every filter follows the same pipeline: transform the image into a centered spectrum, multiply
//! each coefficient by a real gain and transform back.
//!
//! # Filter Categories
//!
//! * **Distance filters**: the gain depends only on the distance of a frequency cell from the
//!   spectrum center (ideal, Butterworth, Gaussian and the boost wrapper).
//!
//! * **Homomorphic filter**: the same pipeline wrapped in a logarithm and its inverse.
//!
//! * **Laplacian**: a fixed second-derivative transfer function used for sharpening and edges.

/// Transfer functions, their parameters and the validated `FilterConfig`.
pub mod filter;

/// The forward, multiply, inverse pipeline and the reusable `TransferMask`.
pub mod frequency_filter;

/// Illumination/reflectance separation in the log domain.
pub mod homomorphic;

/// Laplacian sharpening and edge extraction.
pub mod laplacian;
