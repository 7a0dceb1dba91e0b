//! The 3D renderer-facing transfer function.

use crate::function::{ColorFunction, OpacityFunction};
use vtf_core::{Derived, RampStyle, ScalarRange, ScalarSource, TableState, TransferFunctionData};

/// Transfer function of one image as seen by the ray-casting 3D renderer.
///
/// Owns a smooth-ramp [`TransferFunctionData`] plus lazily rebuilt caches of
/// the continuous opacity and color functions. Each cache refreshes
/// independently on access (`Stale → Rebuilding → Fresh`), so mutating the
/// data while only the 2D view is displayed never rebuilds the 3D tables.
///
/// # Example
///
/// ```rust
/// use vtf_core::ScalarRange;
/// use vtf_volume::VolumeTransferFunction;
///
/// let mut tf = VolumeTransferFunction::new(ScalarRange::new(0.0, 1000.0));
/// tf.set_llr(100.0);
/// let opacity = tf.opacity_function();
/// assert_eq!(opacity.sample(0.0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct VolumeTransferFunction {
    data: TransferFunctionData,
    opacity: Derived<OpacityFunction>,
    color: Derived<ColorFunction>,
}

impl VolumeTransferFunction {
    /// Creates a 3D transfer function with default knobs for the range.
    pub fn new(range: ScalarRange) -> Self {
        Self::from_data(TransferFunctionData::new(range, RampStyle::Smooth))
    }

    /// Creates a 3D transfer function from a scalar source.
    pub fn from_source(source: &impl ScalarSource) -> Self {
        Self::new(ScalarRange::from_source(source))
    }

    /// Wraps an existing data instance.
    pub fn from_data(data: TransferFunctionData) -> Self {
        Self {
            data,
            opacity: Derived::new(),
            color: Derived::new(),
        }
    }

    /// The underlying transfer-function data.
    pub fn data(&self) -> &TransferFunctionData {
        &self.data
    }

    /// Mutable access to the underlying data, e.g. for control-point edits
    /// or preset loading. Any mutation marks both cached functions stale.
    pub fn data_mut(&mut self) -> &mut TransferFunctionData {
        &mut self.data
    }

    /// Sets the window knob (clamped to ≥ 1).
    pub fn set_window(&mut self, value: f64) {
        self.data.set_window(value);
    }

    /// Sets the level knob.
    pub fn set_level(&mut self, value: f64) {
        self.data.set_level(value);
    }

    /// Sets the low-level reject; rebuilds the opacity map as a soft ramp.
    pub fn set_llr(&mut self, value: f64) {
        self.data.set_llr(value);
    }

    /// Sets the global alpha; rebuilds the opacity map as a soft ramp.
    pub fn set_alpha(&mut self, value: f64) {
        self.data.set_alpha(value);
    }

    /// The continuous opacity function, rebuilt from the opacity map if
    /// stale. No window/level remapping is applied.
    pub fn opacity_function(&mut self) -> &OpacityFunction {
        let data = &self.data;
        self.opacity
            .get_or_rebuild(data.revision(), || OpacityFunction::from_map(data.opacity_map()))
    }

    /// The continuous color function, rebuilt if stale by resampling the
    /// base lookup table across `[level - window/2, level + window/2]`.
    pub fn color_function(&mut self) -> &ColorFunction {
        let data = &self.data;
        self.color.get_or_rebuild(data.revision(), || {
            ColorFunction::from_lut(data.lut(), data.window_min(), data.window_max())
        })
    }

    /// Cache state of the opacity function.
    pub fn opacity_state(&self) -> TableState {
        self.opacity.state(self.data.revision())
    }

    /// Cache state of the color function.
    pub fn color_state(&self) -> TableState {
        self.color.state(self.data.revision())
    }

    /// Deep-clones all control points and knobs onto a newly derived image:
    /// rebinds to its scalar range and rebuilds the base lookup table.
    pub fn create_copy(&self, new_range: ScalarRange) -> Self {
        let mut data = self.data.clone();
        data.set_scalar_range(new_range.min(), new_range.max());
        data.build_lut_from_color_map();
        Self {
            data,
            opacity: self.opacity.clone(),
            color: self.color.clone(),
        }
    }
}
