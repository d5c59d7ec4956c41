//! Boundary with the rasterizing backend.

use crate::shapes::ShapePath;
use thiserror::Error;

/// Rasterizer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Invalid render target size: {width}x{height}")]
    TargetSize { width: u32, height: u32 },
    #[error("Pixel readback failed: {0}")]
    Readback(String),
}

/// Result type for rasterizer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// CPU side of the render target: an RGBA8 pixel buffer the canvas
/// rasterizes into and the host uploads to a GPU texture.
///
/// `generation` increases on every completed rasterization, so the host only
/// uploads when it differs from the last value it saw.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    generation: u64,
}

impl RenderTarget {
    /// Create a fully transparent target.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels, `width * 4` bytes per row.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable pixel access for rasterizers.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bytes in one unpadded row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation += 1;
    }
}

/// A backend able to rasterize a set of paths into a [`RenderTarget`].
///
/// Paths are borrowed for the duration of the call and must not be retained.
/// Drawing happens in slice order, so later paths paint over earlier ones.
pub trait Rasterizer {
    fn rasterize(&mut self, paths: &[&ShapePath], target: &mut RenderTarget) -> RenderResult<()>;
}
