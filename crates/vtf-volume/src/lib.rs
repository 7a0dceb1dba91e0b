//! # vtf-volume
//!
//! 3D consumer of the transfer-function core: presents continuous
//! piecewise-linear opacity and color functions for a ray-casting volume
//! renderer.
//!
//! - [`OpacityFunction`] - raw intensity → opacity breakpoints, built from
//!   the sparse opacity map with no window/level remapping
//! - [`ColorFunction`] - intensity → RGB breakpoints, built by resampling
//!   the dense base lookup table across the visible window
//! - [`VolumeTransferFunction`] - owns one [`vtf_core::TransferFunctionData`]
//!   (smooth-ramp style) plus lazily rebuilt caches of both functions
//!
//! The renderer reads const views of owned breakpoint lists; nothing is
//! shared or reference counted.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod function;
pub mod volume;

pub use function::{ColorFunction, OpacityFunction};
pub use volume::VolumeTransferFunction;
