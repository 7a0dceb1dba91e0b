//! Scalar intensity range of the underlying image.
//!
//! The engine never computes the range itself; it is ingested from the
//! image-loading pipeline and stored as a snapshot. Rebinding to a new
//! range (after cropping, resampling or image replacement) goes through
//! [`crate::TransferFunctionData::set_scalar_range`].

/// Source of a scalar intensity range (ingestion interface).
///
/// Implemented by whatever owns the voxel data. Values are arbitrary real
/// numbers; signed CT ranges with `scalar_min() < 0` are expected.
pub trait ScalarSource {
    /// Minimum scalar intensity of the image.
    fn scalar_min(&self) -> f64;
    /// Maximum scalar intensity of the image.
    fn scalar_max(&self) -> f64;
}

/// A snapshot of an image's scalar intensity range.
///
/// # Example
///
/// ```rust
/// use vtf_core::ScalarRange;
///
/// let range = ScalarRange::new(0.0, 1000.0);
/// assert_eq!(range.midpoint(), 500.0);
/// assert_eq!(range.span(), 1000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarRange {
    min: f64,
    max: f64,
}

impl ScalarRange {
    /// Creates a range snapshot. Bounds given in the wrong order are swapped.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Snapshots the range of a scalar source.
    pub fn from_source(source: &impl ScalarSource) -> Self {
        Self::new(source.scalar_min(), source.scalar_max())
    }

    /// Minimum scalar intensity.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum scalar intensity.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range.
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Center of the range.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Minimum bound as a control-point key.
    ///
    /// Control-point keys are integers; non-integral bounds are keyed by
    /// rounding to the nearest integer.
    #[inline]
    pub fn key_min(&self) -> i32 {
        self.min.round() as i32
    }

    /// Maximum bound as a control-point key.
    #[inline]
    pub fn key_max(&self) -> i32 {
        self.max.round() as i32
    }
}

impl ScalarSource for ScalarRange {
    fn scalar_min(&self) -> f64 {
        self.min
    }

    fn scalar_max(&self) -> f64 {
        self.max
    }
}
