//! Graph rendering trait shared by all chart types

use crate::{ColorScheme, GraphConfig};
use plotters::prelude::*;
use std::path::Path;
use tgstat_common::Result;

/// Trait for rendering graphs with shared styling helpers
#[async_trait::async_trait]
pub trait GraphRenderer {
    /// Render a graph to a file path
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()>;

    /// Get colors from color scheme
    fn get_colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(55, 120, 191),  // Blue
                RGBColor(255, 166, 0),   // Orange
                RGBColor(67, 170, 139),  // Green
                RGBColor(89, 13, 34),    // Dark red
                RGBColor(30, 136, 229),  // Light blue
                RGBColor(231, 76, 60),   // Red
            ],
            ColorScheme::Monochrome => vec![
                RGBColor(0, 0, 0),
                RGBColor(64, 64, 64),
                RGBColor(128, 128, 128),
                RGBColor(192, 192, 192),
            ],
            ColorScheme::Custom(colors) => {
                colors.iter().map(|color_str| self.parse_color(color_str)).collect()
            }
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn get_background_color(&self, config: &GraphConfig) -> RGBColor {
        config
            .style
            .background_color
            .as_ref()
            .map(|color| self.parse_color(color))
            .unwrap_or(RGBColor(255, 255, 255))
    }
}
