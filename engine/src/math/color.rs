//! RGBA Color
//!
//! Float color used by particles, offset effects and GUI drawing. The layout
//! is `#[repr(C)]` so it can sit directly inside vertex data.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in [0, 1].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 0-255 channel values.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Same color, different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise interpolation. `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse "r g b [a]" with 0-255 components. Alpha defaults to 255.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<f32> = s
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f32>())
            .collect::<Result<_, _>>()
            .ok()?;
        if parts.len() < 3 {
            return None;
        }
        let a = parts.get(3).copied().unwrap_or(255.0);
        Some(Self::new(
            parts[0] / 255.0,
            parts[1] / 255.0,
            parts[2] / 255.0,
            a / 255.0,
        ))
    }

    /// Inverse of [`Color::parse`].
    pub fn to_data_string(self) -> String {
        format!(
            "{} {} {} {}",
            (self.r * 255.0).round() as i32,
            (self.g * 255.0).round() as i32,
            (self.b * 255.0).round() as i32,
            (self.a * 255.0).round() as i32,
        )
    }
}
