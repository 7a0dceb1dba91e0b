//! # vtf-core
//!
//! Core data model for volumetric transfer functions.
//!
//! A transfer function maps scalar voxel intensity to visual appearance
//! (color and opacity). This crate owns the shared representation both the
//! 3D volume renderer and the 2D slice display derive their tables from:
//!
//! - [`OpacityMap`] / [`ColorMap`] - sparse, user-editable control points
//! - [`TransferFunctionData`] - control points plus the four knobs
//!   (window, level, LLR, alpha) and the dense base lookup table
//! - [`ScalarRange`] - intensity range snapshot of the underlying image
//! - [`Derived`] / [`TableState`] - revision-keyed lazy rebuild cache used
//!   by the renderer-facing consumer crates
//!
//! ## Design Philosophy
//!
//! All derived tables are **pure functions of current state**. Every
//! mutation bumps a revision counter; consumers compare revisions on access
//! and rebuild lazily. There are no callbacks, no event loop and no shared
//! ownership: consumers hold owned value-type tables and hand the renderer
//! a const view.
//!
//! ## Crate Structure
//!
//! ```text
//! vtf-core (this crate)
//!    ^
//!    |
//!    +-- vtf-volume (3D continuous opacity/color functions)
//!    +-- vtf-slice  (2D windowed output lookup table)
//!    +-- vtf-preset (XML persistence, named preset store)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color;
pub mod data;
pub mod derived;
pub mod maps;
pub mod math;
pub mod range;

pub use color::{LutEntry, Rgb};
pub use data::{CT_SHIFT, RampStyle, TransferFunctionData};
pub use derived::{Derived, TableState};
pub use maps::{
    ColorMap, OpacityMap, color_map_from_str, color_map_to_string, interpolated_alpha,
    interpolated_color, interpolated_color_f, opacity_map_from_str, opacity_map_to_string,
};
pub use math::{inverse_lerp, lerp, remap, similar};
pub use range::{ScalarRange, ScalarSource};
