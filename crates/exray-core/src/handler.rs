//! Interaction state machine: turns per-frame input into camera moves,
//! selections and shape construction.

use crate::camera::Camera;
use crate::canvas::{Canvas, CanvasResult};
use crate::config::HandlerConfig;
use crate::input::{InputState, Key, MouseButton};
use crate::raster::{RenderTarget, Rasterizer};
use crate::shapes::{ShapeId, StrokeStyle};
use crate::tools::{CursorHint, DrawAttributes, ToolKind};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

/// Highlight drawn around the selected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionOutline {
    /// Screen-space rectangle, already inflated.
    pub rect: Rect,
    pub color: Color,
    pub width: f64,
}

/// Everything the host needs to present one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub target: &'a RenderTarget,
    pub selection: Option<SelectionOutline>,
}

/// Owns the camera and the canvas and drives them from input.
///
/// Call [`update`](Self::update) once per frame with the frame's input, then
/// present [`draw`](Self::draw). The canvas is rasterized at most once per
/// update, and only when the camera or some geometry changed.
pub struct CanvasHandler {
    canvas: Canvas,
    camera: Camera,
    draw_attr: DrawAttributes,
    state: ToolKind,
    cursor: CursorHint,
    needs_redraw: bool,
    config: HandlerConfig,
}

impl CanvasHandler {
    /// An invalid `config` is replaced by the defaults.
    pub fn new(size: Size, rasterizer: Box<dyn Rasterizer>, config: HandlerConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Invalid handler config: {e}, using defaults");
                HandlerConfig::default()
            }
        };
        Self {
            canvas: Canvas::new(size, rasterizer, config.canvas.clone()),
            camera: Camera::with_zoom_limits(config.min_zoom, config.max_zoom),
            draw_attr: DrawAttributes::new(config.drag_threshold),
            state: ToolKind::Select,
            cursor: CursorHint::Default,
            // The background has never been rasterized.
            needs_redraw: true,
            config,
        }
    }

    /// Handle one frame of input.
    pub fn update(&mut self, input: &InputState) {
        if self.state == ToolKind::Select {
            self.select_state(input);
        } else {
            self.draw_state(input);
        }
    }

    /// The rasterized canvas plus the selection highlight.
    pub fn draw(&self) -> Frame<'_> {
        let selection = self.canvas.selected_shape().map(|shape| {
            let padding = self.config.selection_padding;
            SelectionOutline {
                rect: shape.bounds().inflate(padding, padding),
                color: self.config.selection_color.into(),
                width: self.config.selection_width,
            }
        });
        Frame {
            target: self.canvas.render_target(),
            selection,
        }
    }

    pub fn state(&self) -> ToolKind {
        self.state
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn selected_id(&self) -> ShapeId {
        self.canvas.selected_id()
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn draw_attributes(&self) -> &DrawAttributes {
        &self.draw_attr
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    fn select_state(&mut self, input: &InputState) {
        let mouse = input.pointer_position;

        if self.camera.zoom_by_wheel(mouse, input.wheel(), self.config.zoom_step) {
            self.needs_redraw = true;
        }

        if input.is_button_pressed(MouseButton::Right) {
            let delta = input.pointer_delta();
            if delta != Vec2::ZERO {
                self.camera.pan(delta);
                self.needs_redraw = true;
            }
        }

        self.flush();

        if input.is_button_just_released(MouseButton::Left) {
            let id = self.canvas.set_selected_shape(mouse);
            log::debug!("Selected shape {id} at ({:.1}, {:.1})", mouse.x, mouse.y);
        }

        for tool in ToolKind::ALL {
            if tool.is_drawing() && input.is_key_just_released(tool.key()) {
                self.enter(tool);
            }
        }
    }

    fn draw_state(&mut self, input: &InputState) {
        let world = self.camera.screen_to_world(input.pointer_position);

        if self.state.is_polyline() {
            self.draw_polyline(input, world);
        } else {
            self.draw_box(input, world);
        }

        self.flush();

        let cancelled = input.is_key_just_released(Key::Digit1) || input.is_key_just_released(Key::Escape);
        let released = input.is_button_just_released(MouseButton::Left) && !self.state.is_polyline();
        if cancelled || released || self.draw_attr.line_done {
            self.finish();
        }
    }

    /// Rectangle, diamond and ellipse: the box spans the anchor and the cursor.
    fn draw_box(&mut self, input: &InputState, world: Point) {
        if !input.is_button_pressed(MouseButton::Left) {
            return;
        }
        if !self.draw_attr.is_active() {
            self.begin_shape(world);
        }
        let Some(anchor) = self.draw_attr.anchor() else {
            return;
        };

        let pos = Point::new(anchor.x.min(world.x), anchor.y.min(world.y));
        let size = Vec2::new((world.x - anchor.x).abs(), (world.y - anchor.y).abs());
        let id = self.draw_attr.id;
        let result = match self.state {
            ToolKind::DrawRect => self.canvas.add_rect(id, pos, size),
            ToolKind::DrawDiamond => self.canvas.add_diamond(id, pos, size),
            ToolKind::DrawEllipse => self.canvas.add_ellipse(id, pos, size),
            _ => Ok(()),
        };
        report(result);
        self.needs_redraw = true;
    }

    /// Line and arrow: a press-drag-release draws one segment, clicks build
    /// a polyline until the loop closes or the tool is cancelled.
    fn draw_polyline(&mut self, input: &InputState, world: Point) {
        let arrow = self.state == ToolKind::DrawArrowLine;
        let left_down =
            input.is_button_pressed(MouseButton::Left) || input.is_button_just_pressed(MouseButton::Left);

        if left_down && !self.draw_attr.is_active() {
            self.begin_shape(world);
            self.draw_attr.is_dragging = true;
        }

        if input.is_button_just_released(MouseButton::Left) && self.draw_attr.is_active() {
            let attrs = &mut self.draw_attr;
            match attrs.anchor() {
                Some(anchor) if attrs.points.len() == 1 && attrs.is_dragging => {
                    if anchor.distance(world) < attrs.distance_threshold {
                        // A click, not a drag: keep collecting points.
                        attrs.is_dragging = false;
                    } else {
                        let id = attrs.id;
                        let result = if arrow {
                            self.canvas.add_arrow_line(id, anchor, world)
                        } else {
                            self.canvas.add_line(id, anchor, world)
                        };
                        report(result);
                        self.draw_attr.line_done = true;
                        self.needs_redraw = true;
                    }
                }
                _ => attrs.points.push(world),
            }
        }

        if self.draw_attr.is_active() && !self.draw_attr.line_done {
            let id = self.draw_attr.id;
            let points = &self.draw_attr.points;
            let result = if arrow {
                self.canvas.add_arrow_lines(id, world, points)
            } else {
                self.canvas.add_lines(id, world, points)
            };
            match result {
                Ok(closed) => {
                    if closed {
                        log::debug!("Shape {id} closed after {} points", points.len());
                    }
                    self.draw_attr.line_done = closed;
                }
                Err(e) => log::error!("Failed to update shape {id}: {e}"),
            }
            self.needs_redraw = true;
        }
    }

    fn begin_shape(&mut self, world: Point) {
        let id = self.canvas.create_shape();
        let stroke = StrokeStyle::new(self.config.stroke_color.into(), self.config.stroke_width);
        if let Some(shape) = self.canvas.shape_mut(id) {
            shape.path_mut().set_stroke(Some(stroke));
        }
        self.draw_attr.id = id;
        self.draw_attr.points.push(world);
    }

    fn enter(&mut self, tool: ToolKind) {
        log::debug!("Tool: {} -> {}", self.state.label(), tool.label());
        self.state = tool;
        self.cursor = CursorHint::Crosshair;
    }

    /// Drop the gesture, render once more and go back to select.
    fn finish(&mut self) {
        log::debug!("Tool: {} -> {}", self.state.label(), ToolKind::Select.label());
        self.draw_attr.reset();
        self.render();
        self.state = ToolKind::Select;
        self.cursor = CursorHint::Default;
    }

    fn flush(&mut self) {
        if self.needs_redraw {
            self.render();
        }
    }

    fn render(&mut self) {
        if let Err(e) = self.canvas.update(&self.camera) {
            log::error!("Canvas render failed: {e}");
        }
        self.needs_redraw = false;
    }
}

fn report(result: CanvasResult<()>) {
    if let Err(e) = result {
        log::error!("Shape update failed: {e}");
    }
}
