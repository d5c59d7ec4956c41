//! Vello scene building for canvas paths and presented frames.

use crate::renderer::{RenderContext, Renderer};
use exray_core::{RenderTarget, ShapePath};
use kurbo::{Affine, Rect, Stroke};
use peniko::{Blob, Fill, ImageAlphaType, ImageData, ImageFormat};
use std::sync::Arc;
use vello::Scene;

/// Encode canvas paths into a scene, in order. Each path is filled first and
/// stroked on top, with its own transform applied to both.
pub fn encode_paths(scene: &mut Scene, paths: &[&ShapePath]) {
    for path in paths {
        if path.is_empty() {
            continue;
        }
        let transform = path.transform();
        if let Some(fill) = path.fill() {
            scene.fill(Fill::NonZero, transform, fill, None, path.commands());
        }
        if let Some(stroke) = path.stroke() {
            scene.stroke(&stroke.to_stroke(), transform, stroke.color, None, path.commands());
        }
    }
}

/// Composites the rasterized canvas with the selection outline.
#[derive(Default)]
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Last uploaded canvas image and the target generation it came from.
    image_cache: Option<(u64, ImageData)>,
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Generation of the cached canvas image, if any.
    pub fn cached_generation(&self) -> Option<u64> {
        self.image_cache.as_ref().map(|(generation, _)| *generation)
    }

    /// Image for the render target, rebuilt only when the target changed.
    fn canvas_image(&mut self, target: &RenderTarget) -> Option<ImageData> {
        if target.width() == 0 || target.height() == 0 {
            return None;
        }
        if let Some((generation, image)) = &self.image_cache {
            if *generation == target.generation() {
                return Some(image.clone());
            }
        }

        let image = ImageData {
            data: Blob::new(Arc::new(target.pixels().to_vec())),
            format: ImageFormat::Rgba8,
            width: target.width(),
            height: target.height(),
            alpha_type: ImageAlphaType::Alpha,
        };
        log::trace!("Uploading canvas image, generation {}", target.generation());
        self.image_cache = Some((target.generation(), image.clone()));
        Some(image)
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let target = ctx.frame.target;
        let image_bounds = Rect::new(
            0.0,
            0.0,
            f64::from(target.width()),
            f64::from(target.height()),
        );
        if ctx.is_visible(image_bounds) {
            if let Some(image) = self.canvas_image(target) {
                self.scene.draw_image(&image.into(), Affine::IDENTITY);
            }
        }

        // Outlines entirely off screen are culled, stroke width included.
        if let Some(outline) = ctx.frame.selection {
            let half = outline.width / 2.0;
            if ctx.is_visible(outline.rect.inflate(half, half)) {
                let stroke = Stroke::new(outline.width);
                self.scene.stroke(&stroke, Affine::IDENTITY, outline.color, None, &outline.rect);
            }
        }
    }
}
