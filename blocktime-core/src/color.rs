//! Display colors and their persisted `r,g,b,a` encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BlockTimeError, BlockTimeResult};

/// An RGBA color with components in `[0, 1]`.
///
/// Geometry never looks at it; it is carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    /// Used when nothing better is known (system blue, 70% opaque).
    pub const FALLBACK: Color = Color::rgba(0.0, 0.478, 1.0, 0.7);

    // Template palette
    pub const ORANGE: Color = Color::rgba(1.0, 0.584, 0.0, 0.7);
    pub const GREEN: Color = Color::rgba(0.204, 0.78, 0.349, 0.7);
    pub const BLUE: Color = Color::FALLBACK;
    pub const PURPLE: Color = Color::rgba(0.686, 0.322, 0.871, 0.7);
    pub const TEAL: Color = Color::rgba(0.353, 0.784, 0.98, 0.7);

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Encode as `red,green,blue,alpha`.
    pub fn to_rgba_string(&self) -> String {
        format!("{},{},{},{}", self.red, self.green, self.blue, self.alpha)
    }

    /// Parse the `red,green,blue,alpha` encoding.
    ///
    /// Exactly four numeric components are required. Each is clamped to `[0, 1]`.
    pub fn parse_rgba(s: &str) -> BlockTimeResult<Self> {
        let components = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| BlockTimeError::InvalidColor(s.to_string()))?;

        let [red, green, blue, alpha] = components[..] else {
            return Err(BlockTimeError::InvalidColor(s.to_string()));
        };

        if [red, green, blue, alpha].iter().any(|c| !c.is_finite()) {
            return Err(BlockTimeError::InvalidColor(s.to_string()));
        }

        Ok(Color::rgba(
            red.clamp(0.0, 1.0),
            green.clamp(0.0, 1.0),
            blue.clamp(0.0, 1.0),
            alpha.clamp(0.0, 1.0),
        ))
    }

    /// Decode a stored color, falling back to [`Color::FALLBACK`] when malformed.
    pub fn decode_or_default(s: &str) -> Self {
        Self::parse_rgba(s).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using fallback color");
            Color::FALLBACK
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::FALLBACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            (self.red * 255.0).round() as u8,
            (self.green * 255.0).round() as u8,
            (self.blue * 255.0).round() as u8
        )
    }
}
