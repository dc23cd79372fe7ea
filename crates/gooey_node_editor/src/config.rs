// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Every geometric constant the graph store, hit-testing and renderer use
//! lives here so hosts can tune the widget from a RON file:
//!
//! ```ron
//! (
//!     header_height: 25.0,
//!     socket_radius: 5.0,
//!     connection_style: Bezier,
//! )
//! ```
//!
//! Missing fields fall back to [`EditorConfig::default`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest grid spacing the editor draws, in pixels
pub const MIN_GRID_SIZE: f32 = 1.0;

/// How connections are drawn and hit-tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStyle {
    /// Straight segment between the two sockets
    #[default]
    Straight,
    /// Horizontal-tangent cubic bezier
    Bezier,
}

/// Node editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Height of the node header band
    pub header_height: f32,
    /// Vertical distance between consecutive sockets
    pub socket_spacing: f32,
    /// Distance from the header to the first socket
    pub socket_offset: f32,
    /// Space kept below the last socket when a node grows
    pub socket_margin: f32,
    /// Drawn socket radius
    pub socket_radius: f32,
    /// Extra squared-distance allowance on top of `socket_radius²`
    pub socket_tolerance: f32,
    /// Minimum node width
    pub min_node_width: f32,
    /// Minimum node height
    pub min_node_height: f32,
    /// Margin around the editor bounds in which presses are still accepted
    pub editor_margin: f32,
    /// Default grid spacing
    pub grid_size: f32,
    /// Whether the grid is shown by default
    pub show_grid: bool,
    /// Connection drawing style
    pub connection_style: ConnectionStyle,
    /// Max distance from a connection path that still hits it
    pub connection_hit_tolerance: f32,
    /// Base bezier control point distance
    pub curve_strength: f32,
    /// Line segments per bezier curve
    pub bezier_segments: usize,
    /// Corner rounding of node bodies
    pub node_rounding: f32,
    /// Font size for titles and socket labels
    pub font_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            header_height: 25.0,
            socket_spacing: 20.0,
            socket_offset: 20.0,
            socket_margin: 10.0,
            socket_radius: 5.0,
            socket_tolerance: 75.0,
            min_node_width: 80.0,
            min_node_height: 40.0,
            editor_margin: 10.0,
            grid_size: 20.0,
            show_grid: true,
            connection_style: ConnectionStyle::Straight,
            connection_hit_tolerance: 8.0,
            curve_strength: 50.0,
            bezier_segments: 20,
            node_rounding: 8.0,
            font_size: 14.0,
        }
    }
}

impl EditorConfig {
    /// Squared hit radius for sockets
    pub fn socket_hit_radius_sq(&self) -> f32 {
        self.socket_radius * self.socket_radius + self.socket_tolerance
    }

    /// Parse from a RON string and validate
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&source)?;
        tracing::info!("Loaded node editor config from {:?}", path);
        Ok(config)
    }

    /// Save to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Reject values the editor cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            self.header_height,
            self.socket_spacing,
            self.socket_offset,
            self.socket_margin,
            self.socket_radius,
            self.socket_tolerance,
            self.editor_margin,
            self.connection_hit_tolerance,
            self.curve_strength,
            self.node_rounding,
        ];
        if lengths.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid("lengths must be finite and non-negative"));
        }
        if !(self.min_node_width > 0.0 && self.min_node_height > 0.0) {
            return Err(ConfigError::Invalid("minimum node size must be positive"));
        }
        if !(self.grid_size.is_finite() && self.grid_size >= MIN_GRID_SIZE) {
            return Err(ConfigError::Invalid("grid_size must be at least one pixel"));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Invalid("font_size must be positive"));
        }
        if self.bezier_segments == 0 {
            return Err(ConfigError::Invalid("bezier_segments must be at least 1"));
        }
        Ok(())
    }
}
