//! Exray Render Library
//!
//! Turns core frames into GPU work. [`VelloRasterizer`] fills the canvas
//! render target offscreen and [`VelloRenderer`] composites that target with
//! the selection outline for presentation.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod rasterizer;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer};

#[cfg(feature = "vello-renderer")]
pub use rasterizer::VelloRasterizer;
#[cfg(feature = "vello-renderer")]
pub use vello_impl::{encode_paths, VelloRenderer};
