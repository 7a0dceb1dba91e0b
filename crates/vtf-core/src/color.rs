//! Color value types for control points and lookup tables.

/// An RGB color control-point value with three 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red channel [0, 255].
    pub r: u8,
    /// Green channel [0, 255].
    pub g: u8,
    /// Blue channel [0, 255].
    pub b: u8,
}

/// One dense lookup-table entry: normalized RGBA in [0, 1].
pub type LutEntry = [f32; 4];

impl Rgb {
    /// Black (0, 0, 0).
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// White (255, 255, 255).
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Creates a color from 8-bit channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the channels normalized to [0, 1].
    ///
    /// # Example
    ///
    /// ```rust
    /// use vtf_core::Rgb;
    ///
    /// assert_eq!(Rgb::WHITE.normalized(), [1.0, 1.0, 1.0]);
    /// ```
    pub fn normalized(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Creates a color from normalized [0, 1] channels, clamping out-of-range
    /// input.
    pub fn from_normalized(rgb: [f32; 3]) -> Self {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: q(rgb[0]),
            g: q(rgb[1]),
            b: q(rgb[2]),
        }
    }
}
