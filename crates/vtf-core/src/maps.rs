//! Sparse opacity and color control-point maps.
//!
//! Both maps are ordered by intensity key, ascending. The ordering is
//! semantically load bearing: the first and last entries define the
//! extrapolation boundary for the continuous interpolations, and the
//! fix-up pass relies on it when repairing boundary entries.
//!
//! The `pos=val` / `pos=R/G/B` token strings produced here are the map
//! portion of the persisted preset format. Parsing is lenient: malformed
//! tokens are skipped so a damaged preset still yields a usable map.

use crate::color::Rgb;
use crate::math::{inverse_lerp, lerp};
use std::collections::BTreeMap;

/// Ordered map from intensity position to alpha in [0, 255].
///
/// Fractional alpha values arise from the global alpha multiplier and are
/// preserved exactly.
pub type OpacityMap = BTreeMap<i32, f64>;

/// Ordered map from intensity position to an RGB control-point color.
pub type ColorMap = BTreeMap<i32, Rgb>;

/// Piecewise-linear interpolation over (position, value) breakpoints.
///
/// Positions outside the breakpoint span clamp to the first/last value.
/// Returns `None` for an empty iterator.
fn interpolate_points(mut points: impl Iterator<Item = (f64, f64)>, pos: f64) -> Option<f64> {
    let (mut prev_x, mut prev_v) = points.next()?;
    if pos <= prev_x {
        return Some(prev_v);
    }
    for (x, v) in points {
        if pos <= x {
            let t = inverse_lerp(prev_x, x, pos);
            return Some(lerp(prev_v, v, t));
        }
        prev_x = x;
        prev_v = v;
    }
    Some(prev_v)
}

/// Interpolated alpha at an arbitrary position, clamped at the map ends.
///
/// An empty map yields 0 (fully transparent).
///
/// # Example
///
/// ```rust
/// use vtf_core::{OpacityMap, interpolated_alpha};
///
/// let map: OpacityMap = [(0, 0.0), (100, 255.0)].into_iter().collect();
/// assert_eq!(interpolated_alpha(&map, 50.0), 127.5);
/// assert_eq!(interpolated_alpha(&map, -10.0), 0.0);
/// ```
pub fn interpolated_alpha(map: &OpacityMap, pos: f64) -> f64 {
    interpolate_points(map.iter().map(|(k, v)| (*k as f64, *v)), pos).unwrap_or(0.0)
}

/// Interpolated color at an arbitrary position, as normalized [0, 1] RGB.
///
/// An empty map yields black.
pub fn interpolated_color_f(map: &ColorMap, pos: f64) -> [f32; 3] {
    let channel = |pick: fn(&Rgb) -> u8| {
        interpolate_points(map.iter().map(move |(k, c)| (*k as f64, pick(c) as f64)), pos)
            .unwrap_or(0.0)
    };
    [
        (channel(|c| c.r) / 255.0) as f32,
        (channel(|c| c.g) / 255.0) as f32,
        (channel(|c| c.b) / 255.0) as f32,
    ]
}

/// Interpolated color at an arbitrary position, quantized to 8-bit channels.
pub fn interpolated_color(map: &ColorMap, pos: f64) -> Rgb {
    Rgb::from_normalized(interpolated_color_f(map, pos))
}

/// Serializes an opacity map as space-separated `pos=val` tokens.
pub fn opacity_map_to_string(map: &OpacityMap) -> String {
    map.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses space-separated `pos=val` tokens into an opacity map.
///
/// Malformed tokens are skipped.
pub fn opacity_map_from_str(text: &str) -> OpacityMap {
    text.split_whitespace()
        .filter_map(|token| {
            let (pos, val) = token.split_once('=')?;
            Some((pos.parse().ok()?, val.parse().ok()?))
        })
        .collect()
}

/// Serializes a color map as space-separated `pos=R/G/B` tokens.
pub fn color_map_to_string(map: &ColorMap) -> String {
    map.iter()
        .map(|(k, c)| format!("{k}={}/{}/{}", c.r, c.g, c.b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses space-separated `pos=R/G/B` tokens into a color map.
///
/// Malformed tokens are skipped.
pub fn color_map_from_str(text: &str) -> ColorMap {
    text.split_whitespace()
        .filter_map(|token| {
            let (pos, rgb) = token.split_once('=')?;
            let mut channels = rgb.split('/');
            let r = channels.next()?.parse().ok()?;
            let g = channels.next()?.parse().ok()?;
            let b = channels.next()?.parse().ok()?;
            Some((pos.parse().ok()?, Rgb::new(r, g, b)))
        })
        .collect()
}
