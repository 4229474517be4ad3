//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::EdgeOffsets;
use crate::layout::{RingThreshold, DEFAULT_SIDE_EPSILON};
use crate::pins::PinColumns;
use crate::render::style::{
    ColorScheme, LineScope, DEFAULT_BASE_DOT_RADIUS, DEFAULT_BASE_LINE_WIDTH, DEFAULT_SCALE,
};
use crate::render::{PinStyle, RenderSettings};

/// Default display density of the die image.
pub const DEFAULT_PX_PER_UM: f64 = 0.08;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Dot and wire style.
    #[serde(default)]
    pub style: StyleConfig,

    /// Ring detection settings.
    #[serde(default)]
    pub rings: RingsConfig,

    /// Side classification settings.
    #[serde(default)]
    pub sides: SidesConfig,

    /// Die image calibration settings.
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Pin table column names.
    #[serde(default)]
    pub pins: PinColumns,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::ValidationError { message });

        if !(self.style.scale.is_finite() && self.style.scale > 0.0) {
            return invalid(format!(
                "style.scale must be positive, got {}",
                self.style.scale
            ));
        }
        if !(self.style.base_dot_radius.is_finite() && self.style.base_dot_radius > 0.0) {
            return invalid(format!(
                "style.base_dot_radius must be positive, got {}",
                self.style.base_dot_radius
            ));
        }
        if !(self.style.base_line_width.is_finite() && self.style.base_line_width > 0.0) {
            return invalid(format!(
                "style.base_line_width must be positive, got {}",
                self.style.base_line_width
            ));
        }
        if let RingThreshold::Fixed(value) = self.rings.threshold {
            if !(value.is_finite() && value >= 0.0) {
                return invalid(format!(
                    "rings.threshold must not be negative, got {value}"
                ));
            }
        }
        if !(self.sides.epsilon.is_finite() && self.sides.epsilon >= 0.0) {
            return invalid(format!(
                "sides.epsilon must not be negative, got {}",
                self.sides.epsilon
            ));
        }
        let cal = &self.calibration;
        if !(cal.px_per_um_x.is_finite() && cal.px_per_um_x > 0.0)
            || !(cal.px_per_um_y.is_finite() && cal.px_per_um_y > 0.0)
        {
            return invalid(format!(
                "calibration.px_per_um_x/y must be positive, got {} / {}",
                cal.px_per_um_x, cal.px_per_um_y
            ));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return invalid(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }

    /// Render settings derived from this configuration.
    #[must_use]
    pub const fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            style: PinStyle {
                scale: self.style.scale,
                base_dot_radius: self.style.base_dot_radius,
                base_line_width: self.style.base_line_width,
                color_scheme: self.style.color_scheme,
                line_scope: self.style.line_scope,
            },
            ring_threshold: self.rings.threshold,
            side_epsilon: self.sides.epsilon,
        }
    }
}

/// Dot and wire style configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Multiplier applied to dot radius and line width.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Colour scheme: `{"palette": "grey"}` or `{"custom": {"outer": "#RRGGBB"}}`.
    #[serde(default)]
    pub color_scheme: ColorScheme,

    /// Requested wire scope: "all", "inner", "outer".
    #[serde(default)]
    pub line_scope: LineScope,

    /// Dot radius at scale 1.
    #[serde(default = "default_base_dot_radius")]
    pub base_dot_radius: f64,

    /// Line width at scale 1.
    #[serde(default = "default_base_line_width")]
    pub base_line_width: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            color_scheme: ColorScheme::default(),
            line_scope: LineScope::default(),
            base_dot_radius: default_base_dot_radius(),
            base_line_width: default_base_line_width(),
        }
    }
}

const fn default_scale() -> f64 {
    DEFAULT_SCALE
}

const fn default_base_dot_radius() -> f64 {
    DEFAULT_BASE_DOT_RADIUS
}

const fn default_base_line_width() -> f64 {
    DEFAULT_BASE_LINE_WIDTH
}

/// Ring detection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingsConfig {
    /// Minimum rail separation: `{"fixed": 2.0}` or `"line_width"`.
    #[serde(default)]
    pub threshold: RingThreshold,
}

/// Side classification configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidesConfig {
    /// Tie-break tolerance in display units.
    #[serde(default = "default_side_epsilon")]
    pub epsilon: f64,
}

impl Default for SidesConfig {
    fn default() -> Self {
        Self {
            epsilon: default_side_epsilon(),
        }
    }
}

const fn default_side_epsilon() -> f64 {
    DEFAULT_SIDE_EPSILON
}

/// Die image calibration configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationConfig {
    /// Inward offsets applied to the image rectangle.
    #[serde(default)]
    pub offsets: EdgeOffsets,

    /// Horizontal image density (display units per um).
    #[serde(default = "default_px_per_um")]
    pub px_per_um_x: f64,

    /// Vertical image density (display units per um).
    #[serde(default = "default_px_per_um")]
    pub px_per_um_y: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            offsets: EdgeOffsets::default(),
            px_per_um_x: default_px_per_um(),
            px_per_um_y: default_px_per_um(),
        }
    }
}

const fn default_px_per_um() -> f64 {
    DEFAULT_PX_PER_UM
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::style::{PaletteId, Rgb};

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.render_settings(), RenderSettings::default());
    }

    #[test]
    fn parse_full_config() {
        let json = r##"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "style": {
                "scale": 2.0,
                "color_scheme": { "custom": { "outer": "#FF0000", "inner": "#0000FF" } },
                "line_scope": "outer",
                "base_dot_radius": 1.5,
                "base_line_width": 0.5
            },
            "rings": { "threshold": "line_width" },
            "sides": { "epsilon": 0.01 },
            "calibration": {
                "offsets": { "left": 2.0, "bottom": 3.0 },
                "px_per_um_x": 0.1,
                "px_per_um_y": 0.05
            },
            "pins": { "pin_no": "No", "x": "PosX" },
            "logging": { "level": "debug" }
        }"##;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!((config.style.scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(
            config.style.color_scheme,
            ColorScheme::Custom {
                outer: Rgb::new(0xFF, 0, 0),
                inner: Some(Rgb::new(0, 0, 0xFF)),
            }
        );
        assert_eq!(config.style.line_scope, LineScope::Outer);
        assert_eq!(config.rings.threshold, RingThreshold::LineWidth);
        assert!((config.sides.epsilon - 0.01).abs() < f64::EPSILON);
        assert!((config.calibration.offsets.left - 2.0).abs() < f64::EPSILON);
        assert!((config.calibration.offsets.right - 0.0).abs() < f64::EPSILON);
        assert!((config.calibration.px_per_um_y - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.pins.pin_no, "No");
        assert_eq!(config.pins.pin_name, "pin_name");
        assert_eq!(config.logging.level, "debug");

        let settings = config.render_settings();
        assert!((settings.style.line_width() - 1.0).abs() < f64::EPSILON);
        assert!((settings.ring_threshold.resolve(settings.style.line_width()) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn style_config_defaults() {
        let config = StyleConfig::default();
        assert!((config.scale - 1.5).abs() < f64::EPSILON);
        assert!((config.base_dot_radius - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.color_scheme, ColorScheme::Palette(PaletteId::Grey));
        assert_eq!(config.line_scope, LineScope::All);
    }

    #[test]
    fn calibration_config_defaults() {
        let config = CalibrationConfig::default();
        assert!((config.px_per_um_x - 0.08).abs() < f64::EPSILON);
        assert!((config.px_per_um_y - 0.08).abs() < f64::EPSILON);
        assert_eq!(config.offsets, EdgeOffsets::default());
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_non_positive_scale() {
        let config: Config = serde_json::from_str(r#"{"style": {"scale": 0}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_negative_threshold() {
        let config: Config =
            serde_json::from_str(r#"{"rings": {"threshold": {"fixed": -1.0}}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_negative_epsilon() {
        let config: Config = serde_json::from_str(r#"{"sides": {"epsilon": -0.5}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_bad_density() {
        let config: Config =
            serde_json::from_str(r#"{"calibration": {"px_per_um_x": 0}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_bad_log_level() {
        let config: Config = serde_json::from_str(r#"{"logging": {"level": "loud"}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_malformed_colour() {
        let json = r##"{"style": {"color_scheme": {"custom": {"outer": "#12"}}}}"##;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
