//! Interpolation and comparison helpers shared by the table builders.

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
///
/// # Example
///
/// ```rust
/// use vtf_core::lerp;
///
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// ```
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse linear interpolation.
///
/// Given a value between `a` and `b`, returns the corresponding `t` value.
/// Degenerate ranges (`a == b`) yield 0.
///
/// # Example
///
/// ```rust
/// use vtf_core::inverse_lerp;
///
/// assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
/// ```
#[inline]
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < 1e-10 {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Remaps a value from one range to another.
///
/// # Example
///
/// ```rust
/// use vtf_core::remap;
///
/// assert_eq!(remap(0.5, 0.0, 1.0, 0.0, 100.0), 50.0);
/// ```
#[inline]
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let t = inverse_lerp(in_min, in_max, value);
    lerp(out_min, out_max, t)
}

/// Relative-tolerance equality for knob values.
///
/// The knob setters treat numerically indistinguishable values as no-ops so
/// that continuous slider drags do not emit redundant change notifications.
///
/// # Example
///
/// ```rust
/// use vtf_core::similar;
///
/// assert!(similar(100.0, 100.0 + 1e-9));
/// assert!(!similar(100.0, 101.0));
/// ```
#[inline]
pub fn similar(a: f64, b: f64) -> bool {
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= 1e-6 * scale
}
