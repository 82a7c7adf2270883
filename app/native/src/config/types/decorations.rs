//! Window decoration configuration types.
//!
//! Borders, corner rounding, shadows and per-focus opacity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::color::{Rgba, parse_hex_color};

/// Shadow configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowConfig {
    /// Whether shadows are drawn.
    /// Default: false
    pub enabled: bool,

    /// Draw shadows for floating windows only.
    /// Default: false
    pub only_floating: bool,

    /// Shadow spread in pixels.
    /// Default: 10
    pub size: u32,

    /// Blur sigma handed to the renderer.
    /// Default: 15.0
    pub blur: f64,

    /// Horizontal shadow offset.
    /// Default: 0
    pub offset_x: i32,

    /// Vertical shadow offset.
    /// Default: 0
    pub offset_y: i32,

    /// Shadow color (hex string).
    /// Default: "#000000ff"
    pub color: String,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            only_floating: false,
            size: 10,
            blur: 15.0,
            offset_x: 0,
            offset_y: 0,
            color: "#000000ff".to_string(),
        }
    }
}

/// Border colors for each window state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderColors {
    /// Unfocused windows.
    pub border: String,
    /// The focused window.
    pub focus: String,
    /// Fullscreen or maximized windows.
    pub maximized: String,
    /// Windows requesting attention.
    pub urgent: String,
    /// Scratchpad windows.
    pub scratchpad: String,
    /// Windows visible on every tag.
    pub global: String,
    /// Windows kept above everything else.
    pub overlay: String,
}

impl Default for BorderColors {
    fn default() -> Self {
        Self {
            border: "#444444ff".to_string(),
            focus: "#c66b25ff".to_string(),
            maximized: "#89aa61ff".to_string(),
            urgent: "#ad401fff".to_string(),
            scratchpad: "#516c93ff".to_string(),
            global: "#b153a7ff".to_string(),
            overlay: "#14a57cff".to_string(),
        }
    }
}

/// Window decoration configuration.
///
/// # Example
///
/// ```jsonc
/// {
///   "decorations": {
///     "borderWidth": 2,
///     "borderRadius": 8,
///     "noRadiusWhenSingle": true,
///     "shadows": { "enabled": true, "size": 12 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DecorationsConfig {
    /// Border width in pixels.
    /// Default: 4
    pub border_width: u32,

    /// Corner radius in pixels, shared by borders, shadows and surfaces.
    /// Default: 0
    pub border_radius: i32,

    /// Hide the border when a monitor shows a single tiled window.
    /// Default: false
    pub no_border_when_single: bool,

    /// Square the corners when a monitor shows a single tiled window.
    /// Default: false
    pub no_radius_when_single: bool,

    /// Collapse the border width to zero (instead of hiding the border rect)
    /// when a window hits a no-border rule.
    /// Default: false
    pub smartgaps: bool,

    /// Opacity of the focused window.
    /// Default: 1.0
    pub focused_opacity: f32,

    /// Opacity of unfocused windows.
    /// Default: 1.0
    pub unfocused_opacity: f32,

    /// Background blur. Accepted for compatibility, not rendered.
    /// Default: false
    pub blur: bool,

    /// Shadow settings.
    pub shadows: ShadowConfig,

    /// Border colors.
    pub colors: BorderColors,
}

impl Default for DecorationsConfig {
    fn default() -> Self {
        Self {
            border_width: 4,
            border_radius: 0,
            no_border_when_single: false,
            no_radius_when_single: false,
            smartgaps: false,
            focused_opacity: 1.0,
            unfocused_opacity: 1.0,
            blur: false,
            shadows: ShadowConfig::default(),
            colors: BorderColors::default(),
        }
    }
}

/// Window state that selects a border color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BorderColorState {
    #[default]
    Normal,
    Focused,
    Maximized,
    Urgent,
    Scratchpad,
    Global,
    Overlay,
}

impl BorderColors {
    /// Returns the configured color string for a state.
    #[must_use]
    pub fn hex_for(&self, state: BorderColorState) -> &str {
        match state {
            BorderColorState::Normal => &self.border,
            BorderColorState::Focused => &self.focus,
            BorderColorState::Maximized => &self.maximized,
            BorderColorState::Urgent => &self.urgent,
            BorderColorState::Scratchpad => &self.scratchpad,
            BorderColorState::Global => &self.global,
            BorderColorState::Overlay => &self.overlay,
        }
    }

    /// Returns the parsed color for a state.
    ///
    /// Falls back to the default border color when the configured string is invalid.
    #[must_use]
    pub fn color_for(&self, state: BorderColorState) -> Rgba {
        parse_hex_color(self.hex_for(state)).unwrap_or_else(|err| {
            tracing::warn!(error = %err, ?state, "invalid border color, using default");
            Rgba::from_packed(0x4444_44ff)
        })
    }
}

impl ShadowConfig {
    /// Returns the parsed shadow color, black when invalid.
    #[must_use]
    pub fn rgba(&self) -> Rgba {
        parse_hex_color(&self.color).unwrap_or_else(|_| Rgba::new(0.0, 0.0, 0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorations_defaults() {
        let config = DecorationsConfig::default();
        assert_eq!(config.border_width, 4);
        assert_eq!(config.border_radius, 0);
        assert!(!config.shadows.enabled);
        assert_eq!(config.shadows.size, 10);
    }

    #[test]
    fn test_border_color_for_state() {
        let colors = BorderColors::default();
        assert_eq!(colors.hex_for(BorderColorState::Focused), "#c66b25ff");
        assert_eq!(colors.color_for(BorderColorState::Normal), Rgba::from_packed(0x4444_44ff));
    }

    #[test]
    fn test_invalid_border_color_falls_back() {
        let colors = BorderColors {
            urgent: "not-a-color".to_string(),
            ..Default::default()
        };
        assert_eq!(colors.color_for(BorderColorState::Urgent), Rgba::from_packed(0x4444_44ff));
    }

    #[test]
    fn test_shadow_config_from_json() {
        let json = r##"{ "enabled": true, "offsetX": 4, "color": "#112233" }"##;
        let shadows: ShadowConfig = serde_json::from_str(json).unwrap();
        assert!(shadows.enabled);
        assert_eq!(shadows.offset_x, 4);
        assert_eq!(shadows.size, 10);
        assert!((shadows.rgba().a - 1.0).abs() < f32::EPSILON);
    }
}
