//! 8-bit RGBA colors used to clear drawing targets

use serde::{Deserialize, Serialize};

/// Color with 8-bit straight (non-premultiplied) channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    /// Alpha
    pub a: u8,
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::from_argb(0, 0, 0, 0);
    /// Opaque black
    pub const BLACK: Self = Self::from_argb(255, 0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::from_argb(255, 255, 255, 255);
    /// Opaque cornflower blue
    pub const CORNFLOWER_BLUE: Self = Self::from_argb(255, 100, 149, 237);

    /// Build a color from alpha, red, green and blue channels
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Channels as `[r, g, b, a]` floats in the range [0.0, 1.0]
    pub fn to_normalized(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f32::from(c) / 255.0)
    }

    /// Same color with color channels scaled by alpha
    pub fn premultiplied(self) -> Self {
        let scale = |c: u8| ((u16::from(c) * u16::from(self.a) + 127) / 255) as u8;
        Self::from_argb(self.a, scale(self.r), scale(self.g), scale(self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalized_channels() {
        let [r, g, b, a] = Color::from_argb(255, 0, 51, 255).to_normalized();
        assert_relative_eq!(r, 0.0);
        assert_relative_eq!(g, 0.2);
        assert_relative_eq!(b, 1.0);
        assert_relative_eq!(a, 1.0);
    }

    #[test]
    fn test_premultiplied() {
        assert_eq!(Color::WHITE.premultiplied(), Color::WHITE);
        assert_eq!(Color::from_argb(0, 200, 100, 50).premultiplied(), Color::TRANSPARENT);
        assert_eq!(
            Color::from_argb(128, 255, 0, 100).premultiplied(),
            Color::from_argb(128, 128, 0, 50)
        );
    }
}
