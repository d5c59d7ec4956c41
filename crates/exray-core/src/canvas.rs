//! Shape store: owns every shape path and drives the rasterizer.

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::geometry::{self, Polyline};
use crate::raster::{RenderResult, RenderTarget, Rasterizer};
use crate::shapes::{Shape, ShapeId, ShapePath, BACKGROUND_ID, INVALID_ID};
use kurbo::{BezPath, Cap, Point, Rect, Size, Vec2};
use std::collections::HashMap;
use thiserror::Error;

/// Shape store errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),
    #[error("The background shape cannot be edited")]
    BackgroundLocked,
}

/// Result type for shape store operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// The shape store.
///
/// Shapes are kept in creation order, which is also paint order. The first
/// shape is always the background rectangle. Ids start at
/// [`BACKGROUND_ID`] and are never reused.
///
/// Mutations only touch path commands. Nothing becomes visible until
/// [`update`](Self::update) is called, which is the only place the rasterizer
/// runs.
pub struct Canvas {
    shapes: Vec<Shape>,
    /// Id to position in `shapes`. Shapes are never removed, so positions are stable.
    index: HashMap<ShapeId, usize>,
    current_id: ShapeId,
    selected_id: ShapeId,
    size: Size,
    config: CanvasConfig,
    rasterizer: Box<dyn Rasterizer>,
    target: RenderTarget,
}

impl Canvas {
    /// Create a canvas of `size` pixels with its background rectangle.
    pub fn new(size: Size, rasterizer: Box<dyn Rasterizer>, config: CanvasConfig) -> Self {
        let target = RenderTarget::new(size.width.ceil() as u32, size.height.ceil() as u32);
        let mut canvas = Self {
            shapes: Vec::new(),
            index: HashMap::new(),
            current_id: INVALID_ID,
            selected_id: INVALID_ID,
            size,
            config,
            rasterizer,
            target,
        };

        let id = canvas.create_shape();
        let background = canvas.config.background.into();
        if let Some(shape) = canvas.shape_mut(id) {
            shape.path.append_rect(Rect::from_origin_size(Point::ZERO, size));
            shape.path.set_fill(Some(background));
        }
        canvas
    }

    /// Rasterize every shape with the camera transform and refresh the
    /// cached bounds.
    pub fn update(&mut self, camera: &Camera) -> RenderResult<()> {
        let transform = camera.transform();
        for shape in &mut self.shapes {
            shape.path.set_transform(transform);
            shape.bounds = shape.path.bounds();
        }

        let paths: Vec<&ShapePath> = self.shapes.iter().map(|shape| &shape.path).collect();
        self.rasterizer.rasterize(&paths, &mut self.target)?;
        self.target.bump_generation();
        Ok(())
    }

    /// Allocate a new empty shape and return its id.
    pub fn create_shape(&mut self) -> ShapeId {
        self.current_id += 1;
        let id = self.current_id;
        self.index.insert(id, self.shapes.len());
        self.shapes.push(Shape::new(id));
        log::debug!("Created shape {id}");
        id
    }

    /// Get a shape by id. `None` for [`INVALID_ID`] and unknown ids.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        if id == INVALID_ID {
            return None;
        }
        self.index.get(&id).and_then(|&i| self.shapes.get(i))
    }

    /// Get a mutable reference to a shape by id.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        if id == INVALID_ID {
            return None;
        }
        self.index.get(&id).and_then(|&i| self.shapes.get_mut(i))
    }

    pub fn add_rect(&mut self, id: ShapeId, pos: Point, size: Vec2) -> CanvasResult<()> {
        self.rebuild(id, &geometry::rect(pos, size), None)
    }

    pub fn add_diamond(&mut self, id: ShapeId, pos: Point, size: Vec2) -> CanvasResult<()> {
        self.rebuild(id, &geometry::diamond(pos, size), None)
    }

    pub fn add_ellipse(&mut self, id: ShapeId, pos: Point, size: Vec2) -> CanvasResult<()> {
        self.rebuild(id, &geometry::ellipse(pos, size), None)
    }

    /// Replace the shape with a single arrow from `start` to `end`.
    pub fn add_arrow_line(&mut self, id: ShapeId, start: Point, end: Point) -> CanvasResult<()> {
        self.rebuild(id, &geometry::arrow_line(start, end), Some(Cap::Round))
    }

    /// Rebuild an arrow polyline from the committed `points` and the `live`
    /// cursor point. Returns whether the loop closed.
    pub fn add_arrow_lines(&mut self, id: ShapeId, live: Point, points: &[Point]) -> CanvasResult<bool> {
        let polyline = geometry::arrow_lines(live, points, self.config.close_threshold);
        self.rebuild_polyline(id, polyline)
    }

    /// Replace the shape with a single segment from `start` to `end`.
    pub fn add_line(&mut self, id: ShapeId, start: Point, end: Point) -> CanvasResult<()> {
        self.rebuild(id, &geometry::line(start, end), Some(Cap::Round))
    }

    /// Rebuild a polyline from the committed `points` and the `live` cursor
    /// point. Returns whether the loop closed.
    pub fn add_lines(&mut self, id: ShapeId, live: Point, points: &[Point]) -> CanvasResult<bool> {
        let polyline = geometry::lines(live, points, self.config.close_threshold);
        self.rebuild_polyline(id, polyline)
    }

    /// Select the topmost shape under a screen-space `point`.
    ///
    /// Shapes are tested from most recently created to oldest; the background
    /// is never selected. Returns [`INVALID_ID`] when nothing is hit.
    pub fn set_selected_shape(&mut self, point: Point) -> ShapeId {
        let tolerance = self.config.hit_tolerance;
        self.selected_id = self
            .shapes
            .iter()
            .rev()
            .filter(|shape| !shape.is_background())
            .find(|shape| shape.path.hit_test(point, tolerance))
            .map_or(INVALID_ID, |shape| shape.id);
        self.selected_id
    }

    pub fn selected_id(&self) -> ShapeId {
        self.selected_id
    }

    /// The selected shape, if any.
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.shape(self.selected_id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = INVALID_ID;
    }

    /// Pixels of the last rasterization.
    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    /// Shapes in paint order, background first.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().map(|shape| shape.id)
    }

    /// Number of shapes, background included. Never zero.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Whether any shape besides the background exists.
    pub fn has_user_shapes(&self) -> bool {
        self.shapes.len() > 1
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    fn rebuild_polyline(&mut self, id: ShapeId, polyline: Polyline) -> CanvasResult<bool> {
        self.rebuild(id, &polyline.path, Some(Cap::Round))?;
        Ok(polyline.closed)
    }

    /// Clear the shape's commands and install `path`.
    fn rebuild(&mut self, id: ShapeId, path: &BezPath, cap: Option<Cap>) -> CanvasResult<()> {
        if id == BACKGROUND_ID {
            return Err(CanvasError::BackgroundLocked);
        }
        let shape = self.shape_mut(id).ok_or(CanvasError::ShapeNotFound(id))?;
        shape.path.reset();
        if let Some(cap) = cap {
            shape.path.set_stroke_cap(cap);
        }
        shape.path.append_path(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::testing::{FailingRasterizer, RecordingRasterizer};
    use crate::shapes::StrokeStyle;
    use peniko::Color;

    fn canvas() -> Canvas {
        let (rasterizer, _) = RecordingRasterizer::new();
        Canvas::new(Size::new(800.0, 600.0), Box::new(rasterizer), CanvasConfig::default())
    }

    fn outlined(canvas: &mut Canvas) -> ShapeId {
        let id = canvas.create_shape();
        if let Some(shape) = canvas.shape_mut(id) {
            shape.path_mut().set_stroke(Some(StrokeStyle::new(Color::BLACK, 2.0)));
        }
        id
    }

    #[test]
    fn test_background_is_first_shape() {
        let canvas = canvas();
        assert_eq!(canvas.shape_count(), 1);
        assert!(!canvas.has_user_shapes());
        let background = canvas.shape(BACKGROUND_ID).unwrap();
        assert!(background.is_background());
        assert_eq!(background.path().fill(), Some(Color::WHITE));
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut canvas = canvas();
        let ids: Vec<ShapeId> = (0..5).map(|_| canvas.create_shape()).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
        assert_eq!(canvas.ids().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(canvas.shape_count(), 6);
        assert!(canvas.has_user_shapes());
    }

    #[test]
    fn test_lookup_invalid_and_unknown() {
        let mut canvas = canvas();
        assert!(canvas.shape(INVALID_ID).is_none());
        assert!(canvas.shape(42).is_none());
        assert!(canvas.shape_mut(INVALID_ID).is_none());
    }

    #[test]
    fn test_add_on_unknown_id_errors() {
        let mut canvas = canvas();
        let result = canvas.add_rect(9, Point::ZERO, Vec2::new(1.0, 1.0));
        assert_eq!(result, Err(CanvasError::ShapeNotFound(9)));
        let result = canvas.add_lines(INVALID_ID, Point::ZERO, &[Point::ZERO]);
        assert_eq!(result, Err(CanvasError::ShapeNotFound(INVALID_ID)));
    }

    #[test]
    fn test_background_is_locked() {
        let mut canvas = canvas();
        let result = canvas.add_ellipse(BACKGROUND_ID, Point::ZERO, Vec2::new(5.0, 5.0));
        assert_eq!(result, Err(CanvasError::BackgroundLocked));
    }

    #[test]
    fn test_rebuild_replaces_previous_path() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        canvas.add_rect(id, Point::ZERO, Vec2::new(10.0, 10.0)).unwrap();
        canvas.add_diamond(id, Point::ZERO, Vec2::new(10.0, 10.0)).unwrap();
        let elements = canvas.shape(id).unwrap().path().commands().elements().len();
        assert_eq!(elements, 5);
    }

    #[test]
    fn test_bounds_refresh_only_on_update() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        canvas.add_rect(id, Point::new(10.0, 10.0), Vec2::new(20.0, 30.0)).unwrap();
        assert_eq!(canvas.shape(id).unwrap().bounds(), Rect::ZERO);

        let mut camera = Camera::new();
        camera.target = Vec2::new(5.0, -5.0);
        camera.zoom = 2.0;
        canvas.update(&camera).unwrap();

        let bounds = canvas.shape(id).unwrap().bounds();
        assert!((bounds.x0 - 25.0).abs() < 1e-9);
        assert!((bounds.y0 - 15.0).abs() < 1e-9);
        assert!((bounds.width() - 40.0).abs() < 1e-9);
        assert!((bounds.height() - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_update_submits_every_shape() {
        let (rasterizer, calls) = RecordingRasterizer::new();
        let mut canvas = Canvas::new(Size::new(10.0, 10.0), Box::new(rasterizer), CanvasConfig::default());
        canvas.create_shape();
        canvas.create_shape();

        canvas.update(&Camera::new()).unwrap();
        assert_eq!(*calls.borrow(), vec![3]);
        assert_eq!(canvas.render_target().generation(), 1);
        assert_eq!(canvas.render_target().pixels()[0], 3);
    }

    #[test]
    fn test_update_propagates_backend_error() {
        let mut canvas = Canvas::new(
            Size::new(10.0, 10.0),
            Box::new(FailingRasterizer),
            CanvasConfig::default(),
        );
        assert!(canvas.update(&Camera::new()).is_err());
        assert_eq!(canvas.render_target().generation(), 0);
    }

    #[test]
    fn test_selection_prefers_most_recent() {
        let mut canvas = canvas();
        let first = outlined(&mut canvas);
        let second = outlined(&mut canvas);
        canvas.add_rect(first, Point::new(0.0, 0.0), Vec2::new(100.0, 100.0)).unwrap();
        canvas.add_rect(second, Point::new(0.0, 0.0), Vec2::new(100.0, 50.0)).unwrap();
        canvas.update(&Camera::new()).unwrap();

        // Shared top edge: both hit, the newer one wins.
        assert_eq!(canvas.set_selected_shape(Point::new(50.0, 0.0)), second);
        // Only the older rectangle's bottom edge.
        assert_eq!(canvas.set_selected_shape(Point::new(50.0, 100.0)), first);
        assert_eq!(canvas.selected_shape().map(Shape::id), Some(first));
    }

    #[test]
    fn test_selection_skips_background() {
        let mut canvas = canvas();
        canvas.update(&Camera::new()).unwrap();
        assert_eq!(canvas.set_selected_shape(Point::new(400.0, 300.0)), INVALID_ID);
        assert!(canvas.selected_shape().is_none());
    }

    #[test]
    fn test_unfilled_interior_not_selected() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        canvas.add_rect(id, Point::new(100.0, 100.0), Vec2::new(200.0, 200.0)).unwrap();
        canvas.update(&Camera::new()).unwrap();
        assert_eq!(canvas.set_selected_shape(Point::new(200.0, 200.0)), INVALID_ID);
        assert_eq!(canvas.set_selected_shape(Point::new(100.0, 200.0)), id);

        canvas.clear_selection();
        assert_eq!(canvas.selected_id(), INVALID_ID);
    }

    #[test]
    fn test_selection_in_screen_space() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        canvas.add_line(id, Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();

        let mut camera = Camera::new();
        camera.target = Vec2::new(50.0, 50.0);
        camera.zoom = 2.0;
        canvas.update(&camera).unwrap();

        assert_eq!(canvas.set_selected_shape(Point::new(150.0, 50.0)), id);
        assert_eq!(canvas.set_selected_shape(Point::new(50.0, 0.0)), INVALID_ID);
    }

    #[test]
    fn test_lines_report_closure() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert!(!canvas.add_lines(id, Point::new(20.0, 20.0), &points).unwrap());
        assert!(!canvas.shape(id).unwrap().path().is_closed());
        assert!(canvas.add_lines(id, Point::new(0.5, 0.5), &points).unwrap());
        assert!(canvas.shape(id).unwrap().path().is_closed());
        assert!(!canvas.add_lines(id, Point::new(0.5, 0.5), &points[..2]).unwrap());
    }

    #[test]
    fn test_arrow_lines_report_closure() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert!(!canvas.add_arrow_lines(id, Point::new(20.0, 20.0), &points).unwrap());
        assert!(canvas.add_arrow_lines(id, Point::new(0.5, 0.5), &points).unwrap());

        let elements = canvas.shape(id).unwrap().path().commands().elements().to_vec();
        assert!(elements.contains(&kurbo::PathEl::ClosePath));
        assert_eq!(
            elements.last(),
            Some(&kurbo::PathEl::LineTo(Point::new(0.5, 0.5)))
        );
    }

    #[test]
    fn test_line_tools_use_round_caps() {
        let mut canvas = canvas();
        let id = outlined(&mut canvas);
        canvas.add_arrow_line(id, Point::ZERO, Point::new(30.0, 0.0)).unwrap();
        let cap = canvas.shape(id).unwrap().path().stroke().map(|s| s.cap);
        assert_eq!(cap, Some(Cap::Round));
    }
}
