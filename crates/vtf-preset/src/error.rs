//! Preset persistence error types.

use thiserror::Error;

/// Result type for preset operations.
pub type PresetResult<T> = Result<T, PresetError>;

/// Errors that can occur while persisting or loading presets.
///
/// Note that malformed preset *content* (bad attribute values, missing map
/// nodes) is not an error: it is logged and defaulted so a partially
/// specified preset still produces a usable transfer function. Errors here
/// are structural: unreadable files, invalid XML, unknown preset names.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The XML document could not be parsed at all.
    #[error("parse error: {0}")]
    Parse(String),

    /// The XML document could not be written.
    #[error("write error: {0}")]
    Write(String),

    /// No preset stored under the given name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
