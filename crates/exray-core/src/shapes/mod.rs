//! Shape records and the path objects they own.

mod path;

pub use path::{ShapePath, StrokeStyle};

use kurbo::Rect;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Identifier of a shape inside a [`Canvas`](crate::Canvas).
pub type ShapeId = u32;

/// Reserved "no shape" id. Never assigned to a real shape.
pub const INVALID_ID: ShapeId = 0;

/// Id of the full-canvas background rectangle, always the first shape created.
pub const BACKGROUND_ID: ShapeId = 1;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn magenta() -> Self {
        Self::new(255, 0, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A shape owned by the canvas.
///
/// `bounds` caches the axis-aligned box of the path in the last rendered
/// (camera transformed) space and is refreshed by every
/// [`Canvas::update`](crate::Canvas::update).
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) path: ShapePath,
    pub(crate) bounds: Rect,
}

impl Shape {
    pub(crate) fn new(id: ShapeId) -> Self {
        Self {
            id,
            path: ShapePath::new(),
            bounds: Rect::ZERO,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn path(&self) -> &ShapePath {
        &self.path
    }

    pub fn path_mut(&mut self) -> &mut ShapePath {
        &mut self.path
    }

    /// Bounds in screen space as of the last render.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_background(&self) -> bool {
        self.id == BACKGROUND_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion() {
        let color: Color = SerializableColor::magenta().into();
        let back = SerializableColor::from(color);
        assert_eq!(back, SerializableColor::magenta());
    }

    #[test]
    fn test_new_shape_is_empty() {
        let shape = Shape::new(7);
        assert_eq!(shape.id(), 7);
        assert!(shape.path().is_empty());
        assert_eq!(shape.bounds(), Rect::ZERO);
        assert!(!shape.is_background());
    }
}
