//! The 2D renderer-facing lookup table.

use crate::table::OutputLookupTable;
use vtf_core::{Derived, RampStyle, ScalarRange, ScalarSource, TableState, TransferFunctionData};

/// Transfer function of one image as seen by the 2D slice display.
///
/// Owns a hard-step [`TransferFunctionData`] plus the lazily rebuilt
/// [`OutputLookupTable`]. Knob or LUT changes mark the table stale; the
/// next access rebuilds it (`Stale → Rebuilding → Fresh`).
///
/// # Example
///
/// ```rust
/// use vtf_core::ScalarRange;
/// use vtf_slice::SliceLookupTable;
///
/// let mut lut = SliceLookupTable::new(ScalarRange::new(0.0, 1000.0));
/// lut.set_window(400.0);
/// lut.set_level(40.0);
/// let table = lut.output_lookup_table();
/// assert_eq!(table.range(), (-160.0, 240.0));
/// ```
#[derive(Debug, Clone)]
pub struct SliceLookupTable {
    data: TransferFunctionData,
    output: Derived<OutputLookupTable>,
}

impl SliceLookupTable {
    /// Creates a 2D lookup table with default knobs for the range.
    pub fn new(range: ScalarRange) -> Self {
        Self::from_data(TransferFunctionData::new(range, RampStyle::Step))
    }

    /// Creates a 2D lookup table from a scalar source.
    pub fn from_source(source: &impl ScalarSource) -> Self {
        Self::new(ScalarRange::from_source(source))
    }

    /// Wraps an existing data instance.
    pub fn from_data(data: TransferFunctionData) -> Self {
        Self {
            data,
            output: Derived::new(),
        }
    }

    /// The underlying transfer-function data.
    pub fn data(&self) -> &TransferFunctionData {
        &self.data
    }

    /// Mutable access to the underlying data. Any mutation marks the
    /// output table stale.
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

    /// Sets the low-level reject; rebuilds the opacity map as a hard step.
    pub fn set_llr(&mut self, value: f64) {
        self.data.set_llr(value);
    }

    /// Sets the global alpha; rebuilds the opacity map as a hard step.
    pub fn set_alpha(&mut self, value: f64) {
        self.data.set_alpha(value);
    }

    /// The windowed output lookup table, rebuilt if stale.
    pub fn output_lookup_table(&mut self) -> &OutputLookupTable {
        let data = &self.data;
        self.output
            .get_or_rebuild(data.revision(), || OutputLookupTable::build(data))
    }

    /// Cache state of the output table.
    pub fn output_state(&self) -> TableState {
        self.output.state(self.data.revision())
    }

    /// Deep-clones all control points and knobs onto a newly derived image:
    /// rebinds to its scalar range, rebuilds the base lookup table and
    /// carries the cached output table along.
    pub fn create_copy(&self, new_range: ScalarRange) -> Self {
        let mut data = self.data.clone();
        data.set_scalar_range(new_range.min(), new_range.max());
        data.build_lut_from_color_map();
        Self {
            data,
            output: self.output.clone(),
        }
    }
}
