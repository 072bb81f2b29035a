//! Colors used by the scene

use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build a color from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Gamma-encoded components in `0.0..=1.0`
    pub fn to_array(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Linear-light components, for writing into an sRGB render target
    pub fn to_linear(self) -> [f32; 3] {
        self.to_array().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.0773993808
    } else {
        (c * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

/// Approved applications
pub const APPROVED_COLOR: Color = Color::from_hex(0x1a9850);
/// Rejected applications (and any status other than 1)
pub const REJECTED_COLOR: Color = Color::from_hex(0xd73027);

pub const X_AXIS_COLOR: Color = Color::from_hex(0xff0000);
pub const Y_AXIS_COLOR: Color = Color::from_hex(0x00ff00);
pub const Z_AXIS_COLOR: Color = Color::from_hex(0x0000ff);

pub const GRID_CENTER_COLOR: Color = Color::from_hex(0x444444);
pub const GRID_LINE_COLOR: Color = Color::from_hex(0x222222);

pub const BACKGROUND_COLOR: Color = Color::from_hex(0x1a1a1a);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xff8000);
        assert_eq!((c.r, c.g, c.b), (0xff, 0x80, 0x00));
        let [r, g, b] = c.to_array();
        assert_relative_eq!(r, 1.0);
        assert_relative_eq!(g, 128.0 / 255.0);
        assert_relative_eq!(b, 0.0);
    }

    #[test]
    fn test_linear_endpoints() {
        assert_eq!(Color::from_hex(0x000000).to_linear(), [0.0, 0.0, 0.0]);
        let white = Color::from_hex(0xffffff).to_linear();
        for c in white {
            assert_relative_eq!(c, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_linear_is_darker_midtone() {
        let grey = Color::from_hex(0x808080);
        assert!(grey.to_linear()[0] < grey.to_array()[0]);
        assert_relative_eq!(grey.to_linear()[0], 0.2158605, epsilon = 1e-4);
    }
}
