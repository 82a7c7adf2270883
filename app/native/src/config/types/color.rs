//! Color parsing for decoration settings.
//!
//! Colors are written as hex strings in the configuration file, either
//! `#RRGGBB` (opaque) or `#RRGGBBAA`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A color with normalized `[0, 1]` channels, as consumed by the scene graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Creates a color from normalized channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self { Self { r, g, b, a } }

    /// Creates a color from a packed `0xRRGGBBAA` value.
    #[must_use]
    pub fn from_packed(value: u32) -> Self {
        let channel = |shift: u32| f32::from(((value >> shift) & 0xFF) as u8) / 255.0;
        Self::new(channel(24), channel(16), channel(8), channel(0))
    }
}

/// Parses a `#RRGGBB` or `#RRGGBBAA` color string.
///
/// The leading `#` is optional. Colors without an alpha channel are opaque.
///
/// # Errors
///
/// Returns an error if the string has the wrong length or contains non-hex digits.
pub fn parse_hex_color(value: &str) -> Result<Rgba, String> {
    let hex = value.trim().trim_start_matches('#');

    let packed = match hex.len() {
        6 => u32::from_str_radix(hex, 16).map(|rgb| (rgb << 8) | 0xFF),
        8 => u32::from_str_radix(hex, 16),
        _ => return Err(format!("Invalid color '{value}': expected #RRGGBB or #RRGGBBAA")),
    }
    .map_err(|err| format!("Invalid color '{value}': {err}"))?;

    Ok(Rgba::from_packed(packed))
}
