//! Continuous piecewise-linear functions with explicit control points.

use vtf_core::{LutEntry, OpacityMap, inverse_lerp, lerp};

/// A continuous opacity function over raw intensity.
///
/// Breakpoints come straight from the sparse opacity map; the renderer
/// consumes intensity-to-opacity pairs with no window/level remapping.
/// Sampling outside the breakpoint span clamps to the end values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpacityFunction {
    points: Vec<(f64, f64)>,
}

impl OpacityFunction {
    /// Builds the function from an opacity map's control points.
    pub fn from_map(map: &OpacityMap) -> Self {
        Self {
            points: map.iter().map(|(k, v)| (*k as f64, *v)).collect(),
        }
    }

    /// Explicit (intensity, alpha) breakpoints, ascending by intensity.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Samples the function at an intensity. Empty functions yield 0.
    pub fn sample(&self, pos: f64) -> f64 {
        sample_points(&self.points, pos, |v| *v, lerp).unwrap_or(0.0)
    }
}

/// A continuous color function over raw intensity.
///
/// Breakpoints are the base lookup table's entries spread evenly across the
/// visible window `[level - window/2, level + window/2]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorFunction {
    points: Vec<(f64, [f32; 3])>,
}

impl ColorFunction {
    /// Builds the function by resampling a base lookup table's N entries
    /// evenly across `[window_min, window_max]`.
    ///
    /// An empty table yields an empty function; a single-entry table yields
    /// one breakpoint at `window_min`.
    pub fn from_lut(lut: &[LutEntry], window_min: f64, window_max: f64) -> Self {
        let n = lut.len();
        let points = lut
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                (lerp(window_min, window_max, t), [entry[0], entry[1], entry[2]])
            })
            .collect();
        Self { points }
    }

    /// Explicit (intensity, rgb) breakpoints, ascending by intensity.
    pub fn points(&self) -> &[(f64, [f32; 3])] {
        &self.points
    }

    /// Samples the function at an intensity. Empty functions yield black.
    pub fn sample(&self, pos: f64) -> [f32; 3] {
        sample_points(&self.points, pos, |c| *c, |a, b, t| {
            [
                lerp(a[0] as f64, b[0] as f64, t) as f32,
                lerp(a[1] as f64, b[1] as f64, t) as f32,
                lerp(a[2] as f64, b[2] as f64, t) as f32,
            ]
        })
        .unwrap_or([0.0, 0.0, 0.0])
    }
}

/// Shared clamped piecewise-linear sampling over (position, value) pairs.
fn sample_points<V, T: Copy>(
    points: &[(f64, V)],
    pos: f64,
    value: impl Fn(&V) -> T,
    mix: impl Fn(T, T, f64) -> T,
) -> Option<T> {
    let (first_x, first_v) = points.first()?;
    if pos <= *first_x {
        return Some(value(first_v));
    }
    for pair in points.windows(2) {
        let (x0, v0) = &pair[0];
        let (x1, v1) = &pair[1];
        if pos <= *x1 {
            let t = inverse_lerp(*x0, *x1, pos);
            return Some(mix(value(v0), value(v1), t));
        }
    }
    points.last().map(|(_, v)| value(v))
}
