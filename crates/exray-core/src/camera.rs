//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest zoom the camera accepts by default.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom the camera accepts by default.
pub const MAX_ZOOM: f64 = 20.0;

/// Camera manages the view transform for the canvas.
///
/// A world point maps to the screen as `world * zoom + target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Translation applied after scaling (pan).
    pub target: Vec2,
    /// Current zoom level.
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom limits.
    pub fn with_zoom_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// World to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.target) * Affine::scale(self.zoom)
    }

    /// Screen to world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.target)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.target += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    ///
    /// Returns `false` when the clamped zoom did not change.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        // Move the target so world_point lands back on screen_point
        let new_screen = self.world_to_screen(world_point);
        self.target += screen_point - new_screen;
        true
    }

    /// Apply one wheel step: `step` for a positive wheel, `1 / step` for a
    /// negative one. A zero wheel leaves the camera untouched.
    pub fn zoom_by_wheel(&mut self, screen_point: Point, wheel: f64, step: f64) -> bool {
        if wheel == 0.0 {
            return false;
        }
        let factor = if wheel > 0.0 { step } else { 1.0 / step };
        self.zoom_at(screen_point, factor)
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.target = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
