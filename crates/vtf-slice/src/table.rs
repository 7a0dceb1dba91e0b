//! Dense windowed output lookup table.

use vtf_core::{LutEntry, TransferFunctionData};

/// Alpha written below the LLR cutoff.
///
/// Near-0/near-1 rather than exact 0/1, so downstream renderers need no
/// special case for exact endpoints.
pub const ALPHA_REJECTED: f32 = 0.001;

/// Alpha written at and above the LLR cutoff.
pub const ALPHA_VISIBLE: f32 = 0.9999;

/// The dense RGBA table a 2D slice display indexes by windowed intensity.
///
/// Same entry count as the base lookup table, with a table range of
/// `[level - window/2, level + window/2]` and alpha hard-set around the
/// LLR-derived cutoff index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputLookupTable {
    entries: Vec<LutEntry>,
    range_min: f64,
    range_max: f64,
}

impl OutputLookupTable {
    /// Builds the output table from the current data state.
    ///
    /// The cutoff index `(llr - window_min) / window × size` is clamped to
    /// a minimum of 1: an unclamped index at or below 0 would make every
    /// entry visible and defeat the purpose of the LLR. This is a known
    /// approximation, not a precise boundary condition.
    pub fn build(data: &TransferFunctionData) -> Self {
        let base = data.lut();
        let size = base.len();

        let mut llr_index = (data.llr() - data.window_min()) / data.window() * size as f64;
        if llr_index < 1.0 {
            llr_index = 1.0;
        }

        let entries = base
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let alpha = if i as f64 >= llr_index {
                    ALPHA_VISIBLE
                } else {
                    ALPHA_REJECTED
                };
                [entry[0], entry[1], entry[2], alpha]
            })
            .collect();

        Self {
            entries,
            range_min: data.window_min(),
            range_max: data.window_max(),
        }
    }

    /// Dense RGBA entries. Empty when the base table is empty.
    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    /// Intensity range the table is indexed over.
    pub fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtf_core::{RampStyle, ScalarRange};

    #[test]
    fn test_llr_masking() {
        // window=100, level=50 (range [0,100]), llr=20, base size 10
        // => cutoff = (20-0)/100*10 = 2.
        let mut data = TransferFunctionData::new(ScalarRange::new(0.0, 100.0), RampStyle::Step);
        data.set_window(100.0);
        data.set_level(50.0);
        data.set_llr(20.0);
        data.set_lut(vec![[0.5, 0.5, 0.5, 1.0]; 10]);

        let table = OutputLookupTable::build(&data);
        assert_eq!(table.len(), 10);
        assert_eq!(table.range(), (0.0, 100.0));
        for (i, entry) in table.entries().iter().enumerate() {
            let expected = if i >= 2 { ALPHA_VISIBLE } else { ALPHA_REJECTED };
            assert_eq!(entry[3], expected, "entry {i}");
            assert_eq!(entry[0], 0.5);
        }
    }

    #[test]
    fn test_cutoff_clamped_to_one() {
        // LLR at the window bottom would give index 0; entry 0 must still
        // be rejected.
        let mut data = TransferFunctionData::new(ScalarRange::new(0.0, 100.0), RampStyle::Step);
        data.set_window(100.0);
        data.set_level(50.0);
        data.set_lut(vec![[0.0, 0.0, 0.0, 1.0]; 8]);

        let table = OutputLookupTable::build(&data);
        assert_eq!(table.entries()[0][3], ALPHA_REJECTED);
        assert_eq!(table.entries()[1][3], ALPHA_VISIBLE);
    }

    #[test]
    fn test_empty_base_table() {
        let mut data = TransferFunctionData::new(ScalarRange::new(0.0, 100.0), RampStyle::Step);
        data.set_lut(Vec::new());
        let table = OutputLookupTable::build(&data);
        assert!(table.is_empty());
        assert_eq!(table.range(), (0.0, 100.0));
    }
}
