//! Core application state and lifecycle.

use exray_core::{CanvasHandler, CursorHint, InputState, ToolKind};
use exray_render::{RenderContext, Renderer, VelloRasterizer, VelloRenderer};
use kurbo::Size;
use peniko::Color;
use std::sync::Arc;
use std::time::Instant;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorIcon, Window, WindowId};

use crate::config::AppConfig;
use crate::event_handler::process_window_event;
use crate::frame_clock::FrameClock;
use crate::shortcuts::ShortcutRegistry;

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    frame_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // Canvas
    handler: CanvasHandler,
    input: InputState,
    clock: FrameClock,

    /// Tool, frame rate and cursor last applied to the window.
    shown_tool: ToolKind,
    shown_fps: u32,
    shown_cursor: CursorHint,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application.
    pub async fn run(config: AppConfig) {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::with_config(config);
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device_handle = &render_cx.devices[surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm, the surface may be Bgra8Unorm
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let rasterizer = VelloRasterizer::new(device, queue).expect("Failed to create canvas rasterizer");

        // The canvas covers the whole monitor so the window can grow without
        // reallocating it.
        let canvas_size = window
            .current_monitor()
            .map(|monitor| monitor.size())
            .filter(|size| size.width > 0 && size.height > 0)
            .unwrap_or(PhysicalSize::new(surface.config.width, surface.config.height));
        let handler = CanvasHandler::new(
            Size::new(f64::from(canvas_size.width), f64::from(canvas_size.height)),
            Box::new(rasterizer),
            self.config.handler.clone(),
        );

        log::info!(
            "Exray initialized - window {}x{}, canvas {}x{}",
            surface.config.width,
            surface.config.height,
            canvas_size.width,
            canvas_size.height
        );
        log::info!("Tools: {}", ShortcutRegistry::summary());
        for shortcut in ShortcutRegistry::all() {
            log::debug!("  {:12} {}", shortcut.key, shortcut.description);
        }

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            frame_renderer: VelloRenderer::new(),
            texture_blitter,
            handler,
            input: InputState::new(),
            clock: FrameClock::new(self.config.frame_rate),
            shown_tool: ToolKind::Select,
            shown_fps: 0,
            shown_cursor: CursorHint::Default,
        };
        sync_window(&mut state, &self.config.title, true);
        self.state = Some(state);

        // Request initial redraw
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Window title showing the active tool and the measured frame rate.
fn window_title(title: &str, tool: ToolKind, fps: u32) -> String {
    format!("{title} - {} - {fps} fps", tool.label())
}

/// Apply the handler's tool, the frame rate and the cursor to the window when
/// they changed.
fn sync_window(state: &mut AppState, title: &str, force: bool) {
    let tool = state.handler.state();
    let fps = state.clock.fps();
    if force || tool != state.shown_tool || fps != state.shown_fps {
        state.window.set_title(&window_title(title, tool, fps));
        state.shown_tool = tool;
        state.shown_fps = fps;
    }

    let cursor = state.handler.cursor();
    if force || cursor != state.shown_cursor {
        let icon = match cursor {
            CursorHint::Default => CursorIcon::Default,
            CursorHint::Crosshair => CursorIcon::Crosshair,
        };
        state.window.set_cursor(icon);
        state.shown_cursor = cursor;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);

        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        // Transmute lifetime to 'static - safe because App owns everything
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
        self.finish_init(window, surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if process_window_event(&mut state.input, &event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                state.clock.tick(Instant::now());
                state.handler.update(&state.input);

                let width = state.surface.config.width;
                let height = state.surface.config.height;
                let background: Color = self.config.background_color.into();

                let base_color = {
                    let render_ctx = RenderContext::new(
                        state.handler.draw(),
                        Size::new(f64::from(width), f64::from(height)),
                    )
                    .with_background(background);
                    state.frame_renderer.build_scene(&render_ctx);
                    state.frame_renderer.background_color(&render_ctx)
                };

                sync_window(state, &self.config.title, false);
                state.input.begin_frame();

                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };

                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {:?}", e);
                        state.window.request_redraw();
                        return;
                    }
                };

                let params = RenderParams {
                    base_color,
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Vello needs StorageBinding, which WebGPU only allows on Rgba8Unorm
                let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
                    label: Some("vello render texture"),
                    size: vello::wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: vello::wgpu::TextureDimension::D2,
                    format: vello::wgpu::TextureFormat::Rgba8Unorm,
                    usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                        | vello::wgpu::TextureUsages::COPY_SRC
                        | vello::wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                });

                let render_texture_view =
                    render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

                if let Err(e) = state.vello_renderer.render_to_texture(
                    device,
                    queue,
                    state.frame_renderer.scene(),
                    &render_texture_view,
                    &params,
                ) {
                    log::error!("Failed to render: {:?}", e);
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
                state
                    .texture_blitter
                    .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
                queue.submit(std::iter::once(blit_encoder.finish()));

                surface_texture.present();
                if !state.clock.is_capped() {
                    state.window.request_redraw();
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        let Some(deadline) = state.clock.next_frame() else {
            return;
        };
        if Instant::now() >= deadline {
            event_loop.set_control_flow(ControlFlow::Wait);
            state.window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_title_shows_tool_and_rate() {
        assert_eq!(window_title("Exray", ToolKind::Select, 60), "Exray - Select - 60 fps");
    }
}
