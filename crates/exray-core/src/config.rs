//! Tunable parameters of the canvas and the interaction handler.
//!
//! Every field has a default, so a partial configuration only needs to name
//! the values it overrides.

use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value outside its allowed range.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidConfig {
    #[error("Zoom limits must satisfy 0 < min_zoom <= max_zoom, got {min} and {max}")]
    ZoomLimits { min: f64, max: f64 },
    #[error("zoom_step must be greater than 1, got {0}")]
    ZoomStep(f64),
    #[error("{name} must be a non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
}

fn non_negative(name: &'static str, value: f64) -> Result<(), InvalidConfig> {
    // Written so that NaN fails too.
    if value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidConfig::Negative { name, value })
    }
}

/// Shape store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Per-axis distance (world units) between the live point and the first
    /// committed point at which a polyline closes itself.
    pub close_threshold: f64,
    /// Extra screen-space slack when hit testing strokes.
    pub hit_tolerance: f64,
    /// Fill of the full-canvas background rectangle.
    pub background: SerializableColor,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            close_threshold: 2.0,
            hit_tolerance: 2.0,
            background: SerializableColor::white(),
        }
    }
}

impl CanvasConfig {
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        non_negative("close_threshold", self.close_threshold)?;
        non_negative("hit_tolerance", self.hit_tolerance)
    }
}

/// Interaction handler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Minimum drag distance (world units) for a line gesture to count as a
    /// drag rather than a click.
    pub drag_threshold: f64,
    /// Zoom factor applied per wheel tick.
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Stroke of newly drawn shapes.
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    /// Gap between a selected shape's bounds and its highlight outline.
    pub selection_padding: f64,
    pub selection_width: f64,
    pub selection_color: SerializableColor,
    pub canvas: CanvasConfig,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 8.0,
            zoom_step: 1.1,
            min_zoom: crate::camera::MIN_ZOOM,
            max_zoom: crate::camera::MAX_ZOOM,
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            selection_padding: 5.0,
            selection_width: 2.0,
            selection_color: SerializableColor::magenta(),
            canvas: CanvasConfig::default(),
        }
    }
}

impl HandlerConfig {
    /// Check the ranges the camera and the tools rely on: zoom stays
    /// positive and bounded, distances are non-negative.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(InvalidConfig::ZoomLimits {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.zoom_step > 1.0 && self.zoom_step.is_finite()) {
            return Err(InvalidConfig::ZoomStep(self.zoom_step));
        }
        non_negative("drag_threshold", self.drag_threshold)?;
        non_negative("stroke_width", self.stroke_width)?;
        non_negative("selection_padding", self.selection_padding)?;
        non_negative("selection_width", self.selection_width)?;
        self.canvas.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HandlerConfig::default();
        assert!((config.drag_threshold - 8.0).abs() < f64::EPSILON);
        assert!((config.canvas.close_threshold - 2.0).abs() < f64::EPSILON);
        assert!((config.zoom_step - 1.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{ "drag_threshold": 4.0, "canvas": { "close_threshold": 6.5 } }"#;
        let config: HandlerConfig = serde_json::from_str(json).unwrap();
        assert!((config.drag_threshold - 4.0).abs() < f64::EPSILON);
        assert!((config.canvas.close_threshold - 6.5).abs() < f64::EPSILON);
        assert!((config.canvas.hit_tolerance - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.stroke_color, SerializableColor::black());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(HandlerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_inverted_zoom_limits_rejected() {
        let config: HandlerConfig = serde_json::from_str(r#"{ "min_zoom": 30.0 }"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::ZoomLimits { min: 30.0, max: 20.0 })
        );
    }

    #[test]
    fn test_non_positive_zoom_rejected() {
        let config: HandlerConfig =
            serde_json::from_str(r#"{ "min_zoom": 0.0, "zoom_step": 1e300 }"#).unwrap();
        assert!(matches!(config.validate(), Err(InvalidConfig::ZoomLimits { .. })));

        let config: HandlerConfig = serde_json::from_str(r#"{ "zoom_step": 0.5 }"#).unwrap();
        assert_eq!(config.validate(), Err(InvalidConfig::ZoomStep(0.5)));

        let config: HandlerConfig = serde_json::from_str(r#"{ "zoom_step": 1.0 }"#).unwrap();
        assert_eq!(config.validate(), Err(InvalidConfig::ZoomStep(1.0)));
    }

    #[test]
    fn test_negative_thresholds_rejected() {
        let config: HandlerConfig = serde_json::from_str(r#"{ "drag_threshold": -1.0 }"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(InvalidConfig::Negative {
                name: "drag_threshold",
                value: -1.0
            })
        );

        let config: HandlerConfig =
            serde_json::from_str(r#"{ "canvas": { "close_threshold": -2.0 } }"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(InvalidConfig::Negative {
                name: "close_threshold",
                ..
            })
        ));
    }
}
