//! Offscreen Vello rasterization into the canvas render target.

use crate::vello_impl::encode_paths;
use exray_core::raster::{RenderError, RenderResult, RenderTarget, Rasterizer};
use exray_core::ShapePath;
use peniko::Color;
use vello::wgpu;
use vello::{AaConfig, RenderParams, Scene};

/// Texture and readback buffer sized for one target.
struct Offscreen {
    width: u32,
    height: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    buffer: wgpu::Buffer,
    /// Padded row size, a multiple of 256 as copies require.
    bytes_per_row: u32,
}

impl Offscreen {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        log::debug!("Allocating {width}x{height} offscreen canvas texture");
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("canvas texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = (width * 4).next_multiple_of(256);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("canvas readback buffer"),
            size: u64::from(bytes_per_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            width,
            height,
            texture,
            view,
            buffer,
            bytes_per_row,
        }
    }

    fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// Return `item` to `slot` if the pass that used it succeeded, otherwise hand
/// it back to the caller. Resources from a failed pass may still be mapped.
fn recycle<T, E>(slot: &mut Option<T>, item: T, result: &Result<(), E>) -> Option<T> {
    if result.is_ok() {
        *slot = Some(item);
        None
    } else {
        Some(item)
    }
}

/// [`Rasterizer`] that renders paths with Vello on the GPU and reads the
/// result back into the CPU pixel buffer.
///
/// Rendering blocks until the readback completes.
pub struct VelloRasterizer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    renderer: vello::Renderer,
    scene: Scene,
    offscreen: Option<Offscreen>,
}

impl VelloRasterizer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> RenderResult<Self> {
        let renderer = vello::Renderer::new(device, vello::RendererOptions::default())
            .map_err(|e| RenderError::Backend(format!("{e:?}")))?;
        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            renderer,
            scene: Scene::new(),
            offscreen: None,
        })
    }

    fn read_back(&self, offscreen: &Offscreen, target: &mut RenderTarget) -> RenderResult<()> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("canvas copy encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &offscreen.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &offscreen.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(offscreen.bytes_per_row),
                    rows_per_image: Some(offscreen.height),
                },
            },
            wgpu::Extent3d {
                width: offscreen.width,
                height: offscreen.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = offscreen.buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| RenderError::Readback(format!("{e:?}")))?;
        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(RenderError::Readback(format!("{e:?}"))),
            Err(e) => return Err(RenderError::Readback(e.to_string())),
        }

        {
            let data = slice.get_mapped_range();
            let row_bytes = target.row_bytes();
            let padded = offscreen.bytes_per_row as usize;
            for (row, dst) in target.pixels_mut().chunks_exact_mut(row_bytes).enumerate() {
                let start = row * padded;
                dst.copy_from_slice(&data[start..start + row_bytes]);
            }
        }
        offscreen.buffer.unmap();
        Ok(())
    }
}

impl Rasterizer for VelloRasterizer {
    fn rasterize(&mut self, paths: &[&ShapePath], target: &mut RenderTarget) -> RenderResult<()> {
        let (width, height) = (target.width(), target.height());
        if width == 0 || height == 0 {
            return Err(RenderError::TargetSize { width, height });
        }

        self.scene.reset();
        encode_paths(&mut self.scene, paths);

        if self.offscreen.as_ref().is_some_and(|o| !o.matches(width, height)) {
            self.offscreen = None;
        }
        let offscreen = match self.offscreen.take() {
            Some(offscreen) => offscreen,
            None => Offscreen::new(&self.device, width, height),
        };

        let params = RenderParams {
            base_color: Color::TRANSPARENT,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };
        let result = self
            .renderer
            .render_to_texture(&self.device, &self.queue, &self.scene, &offscreen.view, &params)
            .map_err(|e| RenderError::Backend(format!("{e:?}")))
            .and_then(|()| self.read_back(&offscreen, target));
        if let Some(failed) = recycle(&mut self.offscreen, offscreen, &result) {
            log::warn!(
                "Discarding {}x{} offscreen canvas after failed pass",
                failed.width,
                failed.height
            );
            failed.buffer.destroy();
        }
        result
    }
}
