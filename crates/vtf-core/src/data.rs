//! Transfer-function state: control points, knobs and the base lookup table.

use crate::color::{LutEntry, Rgb};
use crate::maps::{ColorMap, OpacityMap, interpolated_color, interpolated_color_f};
use crate::math::similar;
use crate::range::{ScalarRange, ScalarSource};

/// Key shift applied by [`TransferFunctionData::unsigned_ct`].
///
/// CT volumes are conventionally authored against signed Hounsfield data;
/// scanners exporting unsigned data offset it by this amount.
pub const CT_SHIFT: i32 = 1024;

/// How the opacity map is rebuilt when the LLR or alpha knob changes.
///
/// Selected at construction, replacing per-consumer subclass hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampStyle {
    /// Soft ramp over 10% steps of the window, for shaded 3D volumes where
    /// a hard cutoff causes aliasing.
    Smooth,
    /// Hard step at the LLR, for flat 2D slice blending where softness is
    /// handled by the display's own compositing.
    Step,
}

/// Single source of truth for one image's transfer function.
///
/// Owns the sparse [`OpacityMap`] and [`ColorMap`] control points, the four
/// knobs (window, level, LLR, alpha) and the dense base lookup table derived
/// from the color map. Each displayed image has its own independent
/// instance; the 3D and 2D views of one image each hold one, constructed
/// with their respective [`RampStyle`].
///
/// Change notification is a monotonically increasing revision counter:
/// every mutating operation bumps it exactly once, and the consumer crates
/// compare revisions on access to rebuild their derived tables lazily.
///
/// # Example
///
/// ```rust
/// use vtf_core::{RampStyle, Rgb, ScalarRange, TransferFunctionData};
///
/// let tf = TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Smooth);
/// assert_eq!(tf.window(), 1000.0);
/// assert_eq!(tf.level(), 500.0);
/// assert_eq!(tf.color_map()[&0], Rgb::BLACK);
/// assert_eq!(tf.color_map()[&1000], Rgb::WHITE);
/// ```
#[derive(Debug, Clone)]
pub struct TransferFunctionData {
    range: ScalarRange,
    window: f64,
    level: f64,
    llr: f64,
    alpha: f64,
    opacity_map: OpacityMap,
    color_map: ColorMap,
    lut: Vec<LutEntry>,
    ramp: RampStyle,
    revision: u64,
}

impl TransferFunctionData {
    /// Creates a transfer function bound to one scalar-range snapshot.
    ///
    /// Defaults: window = full range (clamped to ≥ 1), level = range
    /// midpoint, LLR = scalar minimum, alpha = 1. The color map starts as a
    /// two-point black-to-white ramp and the opacity map is built from the
    /// knobs through the given ramp style. An externally loaded palette can
    /// replace the base lookup table afterwards via [`set_lut`].
    ///
    /// [`set_lut`]: TransferFunctionData::set_lut
    pub fn new(range: ScalarRange, ramp: RampStyle) -> Self {
        let mut color_map = ColorMap::new();
        color_map.insert(range.key_min(), Rgb::BLACK);
        color_map.insert(range.key_max(), Rgb::WHITE);

        let mut data = Self {
            range,
            window: range.span().max(1.0),
            level: range.midpoint(),
            llr: range.min(),
            alpha: 1.0,
            opacity_map: OpacityMap::new(),
            color_map,
            lut: Vec::new(),
            ramp,
            revision: 0,
        };
        data.lut = build_lut(&data.color_map);
        data.rebuild_opacity_from_knobs();
        data
    }

    /// Creates a transfer function from a scalar source (ingestion boundary).
    pub fn from_source(source: &impl ScalarSource, ramp: RampStyle) -> Self {
        Self::new(ScalarRange::from_source(source), ramp)
    }

    // --- accessors -------------------------------------------------------

    /// The bound scalar-range snapshot.
    #[inline]
    pub fn scalar_range(&self) -> ScalarRange {
        self.range
    }

    /// Visible intensity span. Always ≥ 1.
    #[inline]
    pub fn window(&self) -> f64 {
        self.window
    }

    /// Center of the visible intensity band.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Low-level reject: intensities below this map to alpha 0.
    #[inline]
    pub fn llr(&self) -> f64 {
        self.llr
    }

    /// Global opacity multiplier in [0, 1].
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Sparse opacity control points.
    #[inline]
    pub fn opacity_map(&self) -> &OpacityMap {
        &self.opacity_map
    }

    /// Sparse color control points.
    #[inline]
    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Dense base lookup table derived from the color map.
    ///
    /// May be empty when the color map is empty; callers must check.
    #[inline]
    pub fn lut(&self) -> &[LutEntry] {
        &self.lut
    }

    /// Ramp style selected at construction.
    #[inline]
    pub fn ramp(&self) -> RampStyle {
        self.ramp
    }

    /// Change-notification counter; bumps exactly once per mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Lower edge of the visible band, `level - window/2`.
    #[inline]
    pub fn window_min(&self) -> f64 {
        self.level - self.window / 2.0
    }

    /// Upper edge of the visible band, `level + window/2`.
    #[inline]
    pub fn window_max(&self) -> f64 {
        self.level + self.window / 2.0
    }

    /// Interpolated color of the sparse map at an arbitrary position.
    pub fn interpolated_color(&self, pos: f64) -> Rgb {
        interpolated_color(&self.color_map, pos)
    }

    /// Interpolated alpha of the sparse map at an arbitrary position.
    pub fn interpolated_alpha(&self, pos: f64) -> f64 {
        crate::maps::interpolated_alpha(&self.opacity_map, pos)
    }

    // --- knob setters ----------------------------------------------------

    /// Sets the window, clamped to ≥ 1. No-op for indistinguishable values.
    ///
    /// Does not touch the control-point maps, only the windowed views.
    pub fn set_window(&mut self, value: f64) {
        let value = value.max(1.0);
        if similar(value, self.window) {
            return;
        }
        self.window = value;
        self.notify();
    }

    /// Sets the level. No-op for indistinguishable values.
    pub fn set_level(&mut self, value: f64) {
        if similar(value, self.level) {
            return;
        }
        self.level = value;
        self.notify();
    }

    /// Sets the low-level reject and rebuilds the opacity map through the
    /// ramp style. No-op for indistinguishable values.
    pub fn set_llr(&mut self, value: f64) {
        if similar(value, self.llr) {
            return;
        }
        self.llr = value;
        self.rebuild_opacity_from_knobs();
        self.notify();
    }

    /// Sets the global alpha, clamped to [0, 1], and rebuilds the opacity
    /// map through the ramp style. No-op for indistinguishable values.
    pub fn set_alpha(&mut self, value: f64) {
        let value = value.clamp(0.0, 1.0);
        if similar(value, self.alpha) {
            return;
        }
        self.alpha = value;
        self.rebuild_opacity_from_knobs();
        self.notify();
    }

    // --- control-point edits ---------------------------------------------

    /// Inserts or replaces an opacity control point, bypassing the LLR/alpha
    /// convenience path.
    pub fn add_alpha_point(&mut self, pos: i32, value: f64) {
        self.opacity_map.insert(pos, value);
        self.notify();
    }

    /// Removes an opacity control point, returning its value if present.
    pub fn remove_alpha_point(&mut self, pos: i32) -> Option<f64> {
        let removed = self.opacity_map.remove(&pos);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Inserts or replaces a color control point and rebuilds the base
    /// lookup table.
    pub fn add_color_point(&mut self, pos: i32, color: Rgb) {
        self.color_map.insert(pos, color);
        self.build_lut_from_color_map();
    }

    /// Removes a color control point, rebuilding the base lookup table if
    /// one was present.
    pub fn remove_color_point(&mut self, pos: i32) -> Option<Rgb> {
        let removed = self.color_map.remove(&pos);
        if removed.is_some() {
            self.build_lut_from_color_map();
        }
        removed
    }

    // --- table operations ------------------------------------------------

    /// Recomputes the base lookup table by resampling the piecewise-linear
    /// color map at unit integer steps from its minimum key.
    ///
    /// An empty color map yields a zero-length table.
    pub fn build_lut_from_color_map(&mut self) {
        self.lut = build_lut(&self.color_map);
        self.notify();
    }

    /// Replaces the base lookup table wholesale, e.g. with a palette loaded
    /// from an external file rather than derived from the color map.
    pub fn set_lut(&mut self, table: Vec<LutEntry>) {
        self.lut = table;
        self.notify();
    }

    // --- structural operations -------------------------------------------

    /// Rebinds to a new image's scalar range.
    ///
    /// Control points and knobs are preserved untouched; callers decide
    /// whether to run [`fix_transfer_functions`] afterwards.
    ///
    /// [`fix_transfer_functions`]: TransferFunctionData::fix_transfer_functions
    pub fn set_scalar_range(&mut self, min: f64, max: f64) {
        self.range = ScalarRange::new(min, max);
        self.notify();
    }

    /// Shifts map keys, level and LLR by ±[`CT_SHIFT`] to translate between
    /// signed and unsigned CT intensity conventions.
    ///
    /// No-op when `scalar_min < 0` (the data is already signed). Apply with
    /// `on_load = true` right after loading a preset authored against
    /// signed data, and with `on_load = false` right before saving one
    /// (then re-apply with `true` to restore in-memory state) — the
    /// save/restore bracketing is the caller's responsibility.
    pub fn unsigned_ct(&mut self, on_load: bool) {
        if self.range.min() < 0.0 {
            return;
        }
        let shift = if on_load { CT_SHIFT } else { -CT_SHIFT };
        self.opacity_map = self.opacity_map.iter().map(|(k, v)| (k + shift, *v)).collect();
        self.color_map = self.color_map.iter().map(|(k, c)| (k + shift, *c)).collect();
        self.level += shift as f64;
        self.llr += shift as f64;
        self.notify();
    }

    /// Repairs a map pair that may be missing boundary entries or contain
    /// out-of-range entries, typically after a [`set_scalar_range`] rebind.
    ///
    /// Missing minimum entries get alpha 0 / black. A missing maximum
    /// opacity entry reuses the current maximum-key entry's value rather
    /// than interpolating; most presets already plateau near the top, and
    /// downstream presets are tuned against this approximation. A missing
    /// maximum color entry is interpolated from the continuous color map,
    /// since color discontinuities are more visible than opacity ones.
    /// Finally, every entry outside the scalar range is dropped. Emits one
    /// change notification.
    ///
    /// [`set_scalar_range`]: TransferFunctionData::set_scalar_range
    pub fn fix_transfer_functions(&mut self) {
        let key_min = self.range.key_min();
        let key_max = self.range.key_max();

        if !self.opacity_map.contains_key(&key_min) {
            self.opacity_map.insert(key_min, 0.0);
        }
        if !self.opacity_map.contains_key(&key_max) {
            let last = self
                .opacity_map
                .iter()
                .next_back()
                .map(|(_, v)| *v)
                .unwrap_or(0.0);
            self.opacity_map.insert(key_max, last);
        }

        if !self.color_map.contains_key(&key_min) {
            self.color_map.insert(key_min, Rgb::BLACK);
        }
        if !self.color_map.contains_key(&key_max) {
            let color = interpolated_color(&self.color_map, key_max as f64);
            self.color_map.insert(key_max, color);
        }

        self.opacity_map.retain(|k, _| (key_min..=key_max).contains(k));
        self.color_map.retain(|k, _| (key_min..=key_max).contains(k));

        self.notify();
    }

    /// Restores a complete state in one step, as the persistence layer does
    /// after parsing a preset.
    ///
    /// Knob clamps apply as in the setters. `None` maps keep the current
    /// contents; a restored color map rebuilds the base lookup table.
    /// Emits one change notification.
    pub fn restore(
        &mut self,
        window: f64,
        level: f64,
        llr: f64,
        alpha: f64,
        opacity_map: Option<OpacityMap>,
        color_map: Option<ColorMap>,
    ) {
        self.window = window.max(1.0);
        self.level = level;
        self.llr = llr;
        self.alpha = alpha.clamp(0.0, 1.0);
        if let Some(map) = opacity_map {
            self.opacity_map = map;
        }
        if let Some(map) = color_map {
            self.color_map = map;
            self.lut = build_lut(&self.color_map);
        }
        self.notify();
    }

    // --- internals -------------------------------------------------------

    fn notify(&mut self) {
        self.revision += 1;
    }

    /// Rebuilds the opacity map from the LLR and alpha knobs.
    ///
    /// Smooth ramp (3D), with smooth = 0.1 × window:
    /// (min, 0); (llr−1, 0) when llr > min; (llr + smooth, α·255·0.1);
    /// (llr + 4·smooth, α·255·0.5); (max, α·255).
    ///
    /// Hard step (2D):
    /// (min, 0); (llr−1, 0) when llr > min; (llr, α·255); (max, α·255).
    fn rebuild_opacity_from_knobs(&mut self) {
        let key = |x: f64| x.round() as i32;
        let full = self.alpha * 255.0;

        self.opacity_map.clear();
        self.opacity_map.insert(self.range.key_min(), 0.0);
        if self.llr > self.range.min() {
            self.opacity_map.insert(key(self.llr - 1.0), 0.0);
        }
        match self.ramp {
            RampStyle::Smooth => {
                let smooth = 0.1 * self.window;
                self.opacity_map.insert(key(self.llr + smooth), full * 0.1);
                self.opacity_map.insert(key(self.llr + 4.0 * smooth), full * 0.5);
            }
            RampStyle::Step => {
                self.opacity_map.insert(key(self.llr), full);
            }
        }
        self.opacity_map.insert(self.range.key_max(), full);
    }
}

/// Upper bound on base lookup-table entries. Control-point keys at extreme
/// positions would otherwise request a table as wide as their span.
const MAX_LUT_SIZE: i64 = 1 << 16;

/// Resamples the piecewise-linear color map at unit integer steps starting
/// at its minimum key. The alpha channel of the base table is fixed at 1.
///
/// Spans wider than [`MAX_LUT_SIZE`] entries are resampled evenly at that
/// many positions instead.
fn build_lut(map: &ColorMap) -> Vec<LutEntry> {
    let (Some(first), Some(last)) = (
        map.keys().next().copied(),
        map.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let span = last as i64 - first as i64;
    let size = (span + 1).min(MAX_LUT_SIZE) as usize;
    // Exactly 1.0 when the span fits, keeping unit-step positions exact.
    let step = if size > 1 { span as f64 / (size - 1) as f64 } else { 0.0 };

    let mut lut = Vec::with_capacity(size);
    for i in 0..size {
        let [r, g, b] = interpolated_color_f(map, first as f64 + step * i as f64);
        lut.push([r, g, b, 1.0]);
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ct_like() -> TransferFunctionData {
        TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Smooth)
    }

    #[test]
    fn test_default_construction() {
        let tf = ct_like();
        assert_eq!(tf.window(), 1000.0);
        assert_eq!(tf.level(), 500.0);
        assert_eq!(tf.llr(), 0.0);
        assert_eq!(tf.alpha(), 1.0);
        assert_eq!(tf.color_map().len(), 2);
        assert_eq!(tf.color_map()[&0], Rgb::BLACK);
        assert_eq!(tf.color_map()[&1000], Rgb::WHITE);
        assert_eq!(tf.lut().len(), 1001);
    }

    #[test]
    fn test_window_clamp() {
        let mut tf = ct_like();
        for v in [0.0, -5.0, -1e9] {
            tf.set_window(v);
            assert_eq!(tf.window(), 1.0);
        }
    }

    #[test]
    fn test_setter_noop_guard() {
        let mut tf = ct_like();
        let rev = tf.revision();
        tf.set_level(tf.level());
        tf.set_window(tf.window() + 1e-9);
        tf.set_llr(tf.llr());
        tf.set_alpha(tf.alpha());
        assert_eq!(tf.revision(), rev);

        tf.set_level(501.0);
        assert_eq!(tf.revision(), rev + 1);
    }

    #[test]
    fn test_smooth_ramp_build() {
        // window=100, llr=20, alpha=1 on [0, 1000] gives smooth=10.
        let mut tf = ct_like();
        tf.set_window(100.0);
        tf.set_llr(20.0);

        let expected: OpacityMap = [(0, 0.0), (19, 0.0), (30, 25.5), (60, 127.5), (1000, 255.0)]
            .into_iter()
            .collect();
        assert_eq!(tf.opacity_map(), &expected);
    }

    #[test]
    fn test_step_build() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Step);
        tf.set_llr(20.0);
        tf.set_alpha(0.5);

        let expected: OpacityMap = [(0, 0.0), (19, 0.0), (20, 127.5), (1000, 127.5)]
            .into_iter()
            .collect();
        assert_eq!(tf.opacity_map(), &expected);
    }

    #[test]
    fn test_step_build_llr_at_minimum() {
        // LLR at the bottom rejects nothing: the whole range is opaque.
        let tf = TransferFunctionData::new(ScalarRange::new(0.0, 100.0), RampStyle::Step);
        let expected: OpacityMap = [(0, 255.0), (100, 255.0)].into_iter().collect();
        assert_eq!(tf.opacity_map(), &expected);
    }

    #[test]
    fn test_window_level_do_not_touch_maps() {
        let mut tf = ct_like();
        let opacity = tf.opacity_map().clone();
        let color = tf.color_map().clone();
        tf.set_window(200.0);
        tf.set_level(42.0);
        assert_eq!(tf.opacity_map(), &opacity);
        assert_eq!(tf.color_map(), &color);
    }

    #[test]
    fn test_unsigned_ct_roundtrip() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Step);
        tf.restore(
            1000.0,
            500.0,
            0.0,
            1.0,
            Some([(0, 0.0), (1000, 255.0)].into_iter().collect()),
            None,
        );

        tf.unsigned_ct(true);
        let shifted: OpacityMap = [(1024, 0.0), (2024, 255.0)].into_iter().collect();
        assert_eq!(tf.opacity_map(), &shifted);
        assert_eq!(tf.level(), 1524.0);
        assert_eq!(tf.llr(), 1024.0);

        tf.unsigned_ct(false);
        let original: OpacityMap = [(0, 0.0), (1000, 255.0)].into_iter().collect();
        assert_eq!(tf.opacity_map(), &original);
        assert_eq!(tf.level(), 500.0);
        assert_eq!(tf.llr(), 0.0);
    }

    #[test]
    fn test_unsigned_ct_noop_for_signed_data() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(-1024.0, 3071.0), RampStyle::Step);
        let rev = tf.revision();
        let level = tf.level();
        tf.unsigned_ct(true);
        assert_eq!(tf.revision(), rev);
        assert_eq!(tf.level(), level);
    }

    #[test]
    fn test_fixup_inserts_boundaries_and_drops_outsiders() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(0.0, 1000.0), RampStyle::Step);
        tf.restore(
            1000.0,
            500.0,
            0.0,
            1.0,
            Some([(-50, 10.0), (100, 80.0), (1200, 250.0)].into_iter().collect()),
            Some([(-50, Rgb::new(10, 0, 0)), (100, Rgb::new(0, 200, 0))].into_iter().collect()),
        );

        tf.fix_transfer_functions();

        let opacity = tf.opacity_map();
        assert_eq!(opacity[&0], 0.0);
        // Missing max entry reuses the last existing value, here the
        // out-of-range point at 1200 before removal.
        assert_eq!(opacity[&1000], 250.0);
        assert!(opacity.keys().all(|k| (0..=1000).contains(k)));

        let color = tf.color_map();
        assert_eq!(color[&0], Rgb::BLACK);
        // Missing max color entry clamps to the last control point.
        assert_eq!(color[&1000], Rgb::new(0, 200, 0));
        assert!(color.keys().all(|k| (0..=1000).contains(k)));
    }

    #[test]
    fn test_fixup_idempotent() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(-100.0, 900.0), RampStyle::Smooth);
        tf.set_scalar_range(0.0, 500.0);
        tf.fix_transfer_functions();
        let opacity = tf.opacity_map().clone();
        let color = tf.color_map().clone();
        tf.fix_transfer_functions();
        assert_eq!(tf.opacity_map(), &opacity);
        assert_eq!(tf.color_map(), &color);
    }

    #[test]
    fn test_fixup_empty_maps_made_total() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(0.0, 10.0), RampStyle::Step);
        tf.restore(10.0, 5.0, 0.0, 1.0, Some(OpacityMap::new()), Some(ColorMap::new()));
        assert!(tf.lut().is_empty());

        tf.fix_transfer_functions();
        assert_eq!(tf.opacity_map()[&0], 0.0);
        assert_eq!(tf.opacity_map()[&10], 0.0);
        assert_eq!(tf.color_map()[&0], Rgb::BLACK);
        assert_eq!(tf.color_map()[&10], Rgb::BLACK);
    }

    #[test]
    fn test_lut_resamples_color_map() {
        let mut tf = TransferFunctionData::new(ScalarRange::new(0.0, 2.0), RampStyle::Step);
        tf.restore(
            2.0,
            1.0,
            0.0,
            1.0,
            None,
            Some([(0, Rgb::BLACK), (2, Rgb::WHITE)].into_iter().collect()),
        );

        let lut = tf.lut();
        assert_eq!(lut.len(), 3);
        assert_relative_eq!(lut[0][0], 0.0);
        assert_relative_eq!(lut[1][1], 0.5, epsilon = 1e-6);
        assert_relative_eq!(lut[2][2], 1.0);
        assert!(lut.iter().all(|e| e[3] == 1.0));
    }

    #[test]
    fn test_lut_capped_for_extreme_keys() {
        let mut tf = ct_like();
        tf.add_color_point(i32::MIN, Rgb::BLACK);
        tf.add_color_point(i32::MAX, Rgb::WHITE);

        let lut = tf.lut();
        assert_eq!(lut.len(), MAX_LUT_SIZE as usize);
        assert_eq!(lut[0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lut[lut.len() - 1], [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_color_edit_rebuilds_lut() {
        let mut tf = ct_like();
        tf.add_color_point(2000, Rgb::new(255, 0, 0));
        assert_eq!(tf.lut().len(), 2001);
        tf.remove_color_point(2000);
        assert_eq!(tf.lut().len(), 1001);
    }

    #[test]
    fn test_set_lut_wholesale() {
        let mut tf = ct_like();
        let rev = tf.revision();
        tf.set_lut(vec![[1.0, 0.0, 0.0, 1.0]; 4]);
        assert_eq!(tf.lut().len(), 4);
        assert_eq!(tf.revision(), rev + 1);
    }

    #[test]
    fn test_rebind_preserves_state() {
        let mut tf = ct_like();
        tf.set_llr(100.0);
        let opacity = tf.opacity_map().clone();
        let window = tf.window();

        tf.set_scalar_range(-500.0, 2000.0);
        assert_eq!(tf.scalar_range(), ScalarRange::new(-500.0, 2000.0));
        assert_eq!(tf.opacity_map(), &opacity);
        assert_eq!(tf.window(), window);
    }

    #[test]
    fn test_degenerate_range_window_clamped() {
        let tf = TransferFunctionData::new(ScalarRange::new(5.0, 5.0), RampStyle::Smooth);
        assert_eq!(tf.window(), 1.0);
    }
}
