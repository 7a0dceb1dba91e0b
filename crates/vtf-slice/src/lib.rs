//! # vtf-slice
//!
//! 2D consumer of the transfer-function core: derives one dense,
//! windowed and LLR-masked output lookup table for a slice display.
//!
//! - [`OutputLookupTable`] - dense RGBA array plus its table range
//! - [`SliceLookupTable`] - owns one [`vtf_core::TransferFunctionData`]
//!   (hard-step style) plus the lazily rebuilt output table
//!
//! The display reads a const view of an owned value-type buffer.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod slice;
pub mod table;

pub use slice::SliceLookupTable;
pub use table::OutputLookupTable;
