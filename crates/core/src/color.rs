/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const INK: Self = Self { r: 0.1, g: 0.1, b: 0.1, a: 1.0 }; // #1a1a1a

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');

        let byte = |s: &str| -> Option<f32> {
            u8::from_str_radix(s, 16).ok().map(|b| f32::from(b) / 255.0)
        };

        match hex.len() {
            6 => Some(Self {
                r: byte(hex.get(0..2)?)?,
                g: byte(hex.get(2..4)?)?,
                b: byte(hex.get(4..6)?)?,
                a: 1.0,
            }),
            8 => Some(Self {
                r: byte(hex.get(0..2)?)?,
                g: byte(hex.get(2..4)?)?,
                b: byte(hex.get(4..6)?)?,
                a: byte(hex.get(6..8)?)?,
            }),
            _ => None,
        }
    }
}
