//! Configuration types for context map rendering.
//!
//! This module provides configuration structures that control how context
//! maps are laid out and styled. All types implement [`serde::Deserialize`]
//! so they can be loaded from TOML by the CLI.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout, font and style settings.
//! - [`LayoutConfig`] - Canvas size, node padding and node margin.
//! - [`Spacing`] - A horizontal/vertical pair used for padding and margins.
//! - [`StyleConfig`] - Colors used by the SVG backend.
//!
//! # Example
//!
//! ```
//! # use ctxmap::config::AppConfig;
//! let config: AppConfig = Default::default();
//! assert_eq!(config.layout().width(), 1200.0);
//! assert_eq!(config.font().family(), "Arial");
//! assert!(config.style().background_color().is_ok());
//! ```

use serde::Deserialize;

use ctxmap_core::{color::Color, text::FontDefinition};

/// Top-level application configuration.
///
/// Every section is optional in the TOML source and falls back to its
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Font used for every label.
    #[serde(default)]
    font: FontDefinition,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, font: FontDefinition, style: StyleConfig) -> Self {
        Self {
            layout,
            font,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the label font.
    pub fn font(&self) -> &FontDefinition {
        &self.font
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// A pair of horizontal and vertical lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Spacing {
    #[serde(default)]
    horizontal: f32,
    #[serde(default)]
    vertical: f32,
}

impl Spacing {
    pub fn new(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn horizontal(self) -> f32 {
        self.horizontal
    }

    pub fn vertical(self) -> f32 {
        self.vertical
    }

    /// Returns `true` when both lengths are finite and non-negative.
    pub fn is_valid(self) -> bool {
        self.horizontal.is_finite()
            && self.vertical.is_finite()
            && self.horizontal >= 0.0
            && self.vertical >= 0.0
    }
}

/// Canvas and node spacing settings.
///
/// `node_padding` is added to the measured label to get each ellipse's
/// diameters; `node_margin` is the free space kept around each ellipse when
/// nodes are distributed on the canvas.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    width: f32,
    height: f32,
    node_padding: Spacing,
    node_margin: Spacing,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Canvas dimensions.
    /// * `node_padding` - Extra ellipse diameters around the label.
    /// * `node_margin` - Space kept around each node during distribution.
    pub fn new(width: f32, height: f32, node_padding: Spacing, node_margin: Spacing) -> Self {
        Self {
            width,
            height,
            node_padding,
            node_margin,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn node_padding(&self) -> Spacing {
        self.node_padding
    }

    pub fn node_margin(&self) -> Spacing {
        self.node_margin
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            node_padding: Spacing::new(100.0, 40.0),
            node_margin: Spacing::new(20.0, 30.0),
        }
    }
}

/// Visual styling configuration for rendered context maps.
///
/// Colors are kept as strings until they are used, so an invalid color is
/// reported when rendering rather than when the file is loaded. Unset
/// fields fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] of the canvas. No background is drawn when unset.
    #[serde(default)]
    background_color: Option<String>,

    /// Fill [`Color`] of bounded context ellipses.
    #[serde(default)]
    node_fill_color: Option<String>,

    /// Stroke [`Color`] of ellipses and relationship paths.
    #[serde(default)]
    line_color: Option<String>,
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`] from color strings.
    pub fn new(
        background_color: Option<String>,
        node_fill_color: Option<String>,
        line_color: Option<String>,
    ) -> Self {
        Self {
            background_color,
            node_fill_color,
            line_color,
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color("background", self.background_color.as_deref())
    }

    /// Returns the parsed node fill [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn node_fill_color(&self) -> Result<Option<Color>, String> {
        parse_color("node fill", self.node_fill_color.as_deref())
    }

    /// Returns the parsed line [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is invalid.
    pub fn line_color(&self) -> Result<Option<Color>, String> {
        parse_color("line", self.line_color.as_deref())
    }
}

fn parse_color(name: &str, color: Option<&str>) -> Result<Option<Color>, String> {
    color
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {name} color in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.layout().width(), 1200.0);
        assert_eq!(config.layout().height(), 800.0);
        assert_eq!(config.layout().node_padding(), Spacing::new(100.0, 40.0));
        assert_eq!(config.layout().node_margin(), Spacing::new(20.0, 30.0));
        assert_eq!(config.font().size(), 12.0);
        assert_eq!(config.style().background_color(), Ok(None));
    }

    #[test]
    fn test_spacing_validity() {
        assert!(Spacing::new(0.0, 0.0).is_valid());
        assert!(!Spacing::new(-1.0, 0.0).is_valid());
        assert!(!Spacing::new(0.0, f32::NAN).is_valid());
    }

    #[test]
    fn test_style_colors() {
        let style = StyleConfig::new(
            Some("white".to_string()),
            Some("#ff000080".to_string()),
            Some("not-a-color".to_string()),
        );

        assert!(style.background_color().unwrap().is_some());
        assert!(style.node_fill_color().unwrap().is_some());

        let err = style.line_color().unwrap_err();
        assert!(err.contains("Invalid line color"), "error: {err}");
    }
}
