//! Layout configuration.
//!
//! Every tunable the engine uses lives in [`LayoutConfig`]. A config is built
//! once and passed by reference into each reconstruction, so reconstruction
//! stays a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// Border drawn around container shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderStyle {
    pub color: HexColor,
    /// Line width in points.
    pub width: f64,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            color: HexColor::rgb(0xD0, 0xD0, 0xD0),
            width: 0.75,
        }
    }
}

/// Outer drop shadow attached to container shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowStyle {
    pub color: HexColor,
    /// Transparency percentage, 0 is solid.
    pub transparency: f64,
    /// Blur radius in points.
    pub blur: f64,
    /// Offset distance in points.
    pub offset: f64,
    /// Direction in degrees, clockwise from the positive x axis.
    pub angle: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: HexColor::BLACK,
            transparency: 75.0,
            blur: 4.0,
            offset: 2.0,
            angle: 45.0,
        }
    }
}

/// Near-white / near-black snapping applied to resolved colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSnap {
    pub enabled: bool,
    /// Channels at or above this value on every channel snap to white.
    pub white_threshold: u8,
    /// Channels at or below this value on every channel snap to black.
    pub black_threshold: u8,
}

impl Default for ColorSnap {
    fn default() -> Self {
        Self {
            enabled: false,
            white_threshold: 0xF0,
            black_threshold: 0x0F,
        }
    }
}

/// Immutable tunables for one layout reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width in canvas units (inches).
    pub canvas_width: f64,
    /// Typographic points per canvas unit.
    pub points_per_unit: f64,
    /// Per-side container padding as a fraction of the box dimension.
    pub container_padding: f64,
    /// Minimum per-side container padding in canvas units.
    pub min_padding: f64,
    /// Total growth applied to containerless boxes, as a fraction.
    pub plain_inflation: f64,
    /// Share of the per-line height used for glyphs inside containers.
    pub container_fill_ratio: f64,
    /// Share of the per-line height used for glyphs without a container.
    pub plain_fill_ratio: f64,
    /// Extra shrink applied to bold text, as a fraction.
    pub bold_shrink: f64,
    /// Smallest font size ever emitted, in points.
    pub min_font_size: f64,
    /// Glyph outline width in points.
    pub outline_width: f64,
    /// Container corner radius in canvas units.
    pub corner_radius: f64,
    pub border: BorderStyle,
    pub shadow: ShadowStyle,
    pub color_snap: ColorSnap,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 10.0,
            points_per_unit: 72.0,
            container_padding: 0.10,
            min_padding: 0.05,
            plain_inflation: 0.05,
            container_fill_ratio: 0.70,
            plain_fill_ratio: 0.85,
            bold_shrink: 0.05,
            min_font_size: 9.0,
            outline_width: 1.0,
            corner_radius: 0.1,
            border: BorderStyle::default(),
            shadow: ShadowStyle::default(),
            color_snap: ColorSnap::default(),
        }
    }
}

impl LayoutConfig {
    /// Create a configuration with the default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the canvas width in canvas units.
    pub fn with_canvas_width(mut self, width: f64) -> Self {
        self.canvas_width = width;
        self
    }

    /// Set the minimum emitted font size in points.
    pub fn with_min_font_size(mut self, size: f64) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the per-side container padding fraction.
    pub fn with_container_padding(mut self, fraction: f64) -> Self {
        self.container_padding = fraction;
        self
    }

    /// Enable or disable near-white / near-black color snapping.
    pub fn with_color_snap(mut self, enabled: bool) -> Self {
        self.color_snap.enabled = enabled;
        self
    }

    /// Reject values that would make the layout meaningless.
    pub fn validate(&self) -> crate::Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("points_per_unit", self.points_per_unit),
            ("container_fill_ratio", self.container_fill_ratio),
            ("plain_fill_ratio", self.plain_fill_ratio),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(crate::Error::InvalidInput(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("container_padding", self.container_padding),
            ("min_padding", self.min_padding),
            ("plain_inflation", self.plain_inflation),
            ("min_font_size", self.min_font_size),
            ("outline_width", self.outline_width),
            ("corner_radius", self.corner_radius),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(crate::Error::InvalidInput(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        // Both branches must strictly grow the box, plain text by less.
        if self.plain_inflation <= 0.0 {
            return Err(crate::Error::InvalidInput(
                "plain_inflation must be positive".to_string(),
            ));
        }
        if self.container_padding <= 0.0 && self.min_padding <= 0.0 {
            return Err(crate::Error::InvalidInput(
                "container_padding or min_padding must be positive".to_string(),
            ));
        }
        if self.plain_inflation >= 2.0 * self.container_padding {
            return Err(crate::Error::InvalidInput(format!(
                "plain_inflation {} must be smaller than twice container_padding {}",
                self.plain_inflation, self.container_padding
            )));
        }

        if !(0.0..1.0).contains(&self.bold_shrink) {
            return Err(crate::Error::InvalidInput(format!(
                "bold_shrink must be in [0, 1), got {}",
                self.bold_shrink
            )));
        }

        Ok(())
    }
}

/// Batch processing tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of images processed at once.
    pub window: usize,
    /// Attempts made for each detection call before giving up.
    pub detect_attempts: usize,
    /// Pause between detection attempts, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: 4,
            detect_attempts: 3,
            retry_backoff_ms: 250,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency window (at least 1).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    /// Set the number of detection attempts (at least 1).
    pub fn with_detect_attempts(mut self, attempts: usize) -> Self {
        self.detect_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_fields() {
        let config = LayoutConfig::from_json(r#"{ "canvas_width": 13.333, "min_font_size": 12 }"#)
            .unwrap();
        assert_eq!(config.canvas_width, 13.333);
        assert_eq!(config.min_font_size, 12.0);
        assert_eq!(config.plain_fill_ratio, 0.85);
        assert!(!config.color_snap.enabled);
    }

    #[test]
    fn test_from_json_nested_styles() {
        let config = LayoutConfig::from_json(
            r##"{ "border": { "color": "#abc" }, "color_snap": { "enabled": true } }"##,
        )
        .unwrap();
        assert_eq!(config.border.color.to_string(), "AABBCC");
        assert_eq!(config.border.width, 0.75);
        assert!(config.color_snap.enabled);
        assert_eq!(config.color_snap.white_threshold, 0xF0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(LayoutConfig::from_json(r#"{ "canvas_width": 0 }"#).is_err());
        assert!(LayoutConfig::from_json(r#"{ "bold_shrink": 1.5 }"#).is_err());
        assert!(LayoutConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_config_without_growth_rejected() {
        assert!(LayoutConfig::from_json(
            r#"{ "container_padding": 0, "min_padding": 0, "plain_inflation": 0 }"#
        )
        .is_err());
        assert!(LayoutConfig::from_json(r#"{ "plain_inflation": 0 }"#).is_err());
        assert!(LayoutConfig::from_json(r#"{ "container_padding": 0, "min_padding": 0 }"#).is_err());
    }

    #[test]
    fn test_plain_inflation_must_stay_below_container_growth() {
        assert!(LayoutConfig::from_json(r#"{ "plain_inflation": 0.2 }"#).is_err());
        assert!(LayoutConfig::from_json(r#"{ "plain_inflation": 0.3 }"#).is_err());
        assert!(LayoutConfig::from_json(r#"{ "plain_inflation": 0.19 }"#).is_ok());
        assert!(LayoutConfig::from_json(r#"{ "container_padding": 0.02 }"#).is_err());
    }

    #[test]
    fn test_pipeline_builders_enforce_minimums() {
        let config = PipelineConfig::new().with_window(0).with_detect_attempts(0);
        assert_eq!(config.window, 1);
        assert_eq!(config.detect_attempts, 1);
    }
}
