//! Exray Core Library
//!
//! Platform-agnostic shape model, camera and drawing-tool state machine for
//! the Exray diagramming canvas. Rasterization is delegated to a
//! [`Rasterizer`] supplied by the host.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod geometry;
pub mod handler;
pub mod input;
pub mod raster;
pub mod shapes;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasError};
pub use config::{CanvasConfig, HandlerConfig, InvalidConfig};
pub use handler::{CanvasHandler, Frame, SelectionOutline};
pub use input::{InputState, Key, KeyEvent, MouseButton, PointerEvent};
pub use raster::{RenderError, RenderTarget, Rasterizer};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapePath, StrokeStyle, BACKGROUND_ID, INVALID_ID};
pub use tools::{CursorHint, DrawAttributes, ToolKind};
