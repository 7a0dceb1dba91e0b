//! # vtf-preset
//!
//! Persistence boundary of the transfer-function engine.
//!
//! - [`transfer_to_xml`] / [`transfer_from_xml`] - one XML element per
//!   transfer function (knob attributes plus `<alpha>`/`<color>` map nodes)
//! - [`PresetStore`] - named presets as XML files in a directory, with
//!   2D-only / 3D-only / combined load scopes
//!
//! Loading fails closed: malformed attribute values fall back to the
//! current in-memory values and missing map nodes keep the constructed
//! defaults, with warnings logged. A partially specified preset must still
//! produce a usable transfer function.
//!
//! # Dependencies
//!
//! - `vtf-core` - transfer-function state
//! - `quick-xml` - event-driven XML reading/writing
//! - `thiserror` - error handling
//! - `tracing` - warnings for tolerated malformed content

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod store;
mod xml;

pub use error::{PresetError, PresetResult};
pub use store::{PresetScope, PresetStore};
pub use xml::{transfer_from_xml, transfer_to_xml, write_transfer_data};
