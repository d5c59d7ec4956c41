//! Renderer trait abstraction.

use exray_core::Frame;
use kurbo::{Point, Rect, Size};
use peniko::Color;

/// Context for a single presented frame.
pub struct RenderContext<'a> {
    /// Rasterized canvas and selection highlight.
    pub frame: Frame<'a>,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Clear color behind the canvas image.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(frame: Frame<'a>, viewport_size: Size) -> Self {
        Self {
            frame,
            viewport_size,
            background_color: Color::from_rgba8(245, 245, 245, 255),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Viewport bounds in physical pixels.
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.viewport_size)
    }

    /// Whether any part of `rect` lands inside the viewport.
    pub fn is_visible(&self, rect: Rect) -> bool {
        rect.intersect(self.viewport()).area() > 0.0
    }
}


/// Trait for presentation backends.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
