//! RGBA color type used throughout the canvas.

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string was not 6 or 8 hex digits (after an optional `#`).
    #[error("expected 6 or 8 hex digits, got {0} characters")]
    BadLength(usize),
    /// A component was not valid hexadecimal.
    #[error("invalid hex digit in color component")]
    BadDigit,
}

/// An RGBA color with straight (non-premultiplied) alpha.
///
/// Components are in the 0.0–1.0 range. Compositing is the backend's
/// business; the canvas only carries the values through.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA components (0.0–1.0 range).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB components.
    #[inline]
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit RGBA components (0–255 range).
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Create an opaque color from 8-bit RGB components.
    #[inline]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse a color from a hex string (e.g., `"#FF0000"` or `"#FF0000CC"`).
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        let len = hex.len();

        if len != 6 && len != 8 {
            return Err(ColorParseError::BadLength(len));
        }

        let byte = |range| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError::BadDigit)
        };

        let r = byte(0..2)?;
        let g = byte(2..4)?;
        let b = byte(4..6)?;
        let a = if len == 8 { byte(6..8)? } else { 255 };

        Ok(Self::from_rgba8(r, g, b, a))
    }

    /// Return a new color with the given alpha.
    #[inline]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a: alpha,
        }
    }

    // Common colors
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::from_rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::from_rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::from_rgb(0.0, 0.0, 1.0);
    pub const GRAY: Self = Self::from_rgb(0.5, 0.5, 0.5);
}
