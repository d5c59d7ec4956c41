//! Path object handed to the rasterizer.

use kurbo::{
    Affine, BezPath, Cap, Ellipse, ParamCurveNearest, PathEl, Point, Rect, Shape as KurboShape,
    Stroke, Vec2,
};
use peniko::Color;

/// Flattening tolerance used when appending curved primitives.
const PRIMITIVE_TOLERANCE: f64 = 0.1;

/// Accuracy for nearest-point queries during stroke hit testing.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Stroke paint of a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub cap: Cap,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: Cap::Butt,
        }
    }

    /// The kurbo stroke description for rendering.
    pub fn to_stroke(&self) -> Stroke {
        Stroke::new(self.width).with_caps(self.cap)
    }
}

/// A vector path with its paint and the camera transform it was last
/// rendered with.
///
/// Commands are stored in world space; `transform` maps them into screen
/// space. Clearing the commands with [`reset`](Self::reset) keeps the paint.
#[derive(Debug, Clone)]
pub struct ShapePath {
    path: BezPath,
    fill: Option<Color>,
    stroke: Option<StrokeStyle>,
    transform: Affine,
}

impl Default for ShapePath {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapePath {
    pub fn new() -> Self {
        Self {
            path: BezPath::new(),
            fill: None,
            stroke: None,
            transform: Affine::IDENTITY,
        }
    }

    /// Remove all path commands.
    pub fn reset(&mut self) {
        self.path = BezPath::new();
    }

    pub fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
    }

    /// Add a line to `point`. Starts a new sub-path when none is open.
    pub fn line_to(&mut self, point: Point) {
        match self.path.elements().last() {
            None | Some(PathEl::ClosePath) => self.path.move_to(point),
            Some(_) => self.path.line_to(point),
        }
    }

    pub fn close(&mut self) {
        if !self.path.elements().is_empty() {
            self.path.close_path();
        }
    }

    pub fn append_rect(&mut self, rect: Rect) {
        self.path.extend(rect.path_elements(PRIMITIVE_TOLERANCE));
    }

    pub fn append_ellipse(&mut self, center: Point, radii: Vec2) {
        let ellipse = Ellipse::new(center, radii, 0.0);
        self.path.extend(ellipse.path_elements(PRIMITIVE_TOLERANCE));
    }

    /// Append every command of `path`.
    pub fn append_path(&mut self, path: &BezPath) {
        self.path.extend(path.elements().iter().copied());
    }

    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill = color;
    }

    pub fn set_stroke(&mut self, stroke: Option<StrokeStyle>) {
        self.stroke = stroke;
    }

    /// Set the cap style. Has no effect until a stroke is set.
    pub fn set_stroke_cap(&mut self, cap: Cap) {
        if let Some(stroke) = &mut self.stroke {
            stroke.cap = cap;
        }
    }

    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<&StrokeStyle> {
        self.stroke.as_ref()
    }

    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Path commands in world space.
    pub fn commands(&self) -> &BezPath {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Whether the last sub-path ends with an explicit close.
    pub fn is_closed(&self) -> bool {
        matches!(self.path.elements().last(), Some(PathEl::ClosePath))
    }

    /// Path commands with the current transform applied.
    pub fn transformed(&self) -> BezPath {
        let mut path = self.path.clone();
        path.apply_affine(self.transform);
        path
    }

    /// Axis-aligned bounds of the transformed path, stroke excluded.
    pub fn bounds(&self) -> Rect {
        if self.is_empty() {
            return Rect::ZERO;
        }
        self.transformed().bounding_box()
    }

    /// Test whether a screen-space `point` hits the painted area.
    ///
    /// Filled paths hit on their non-zero winding interior. Stroked paths hit
    /// within half the transformed stroke width plus `tolerance` of any
    /// segment, so an unfilled outline is not hit in its interior.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = self.transformed();
        if self.fill.is_some() && path.contains(point) {
            return true;
        }
        let Some(stroke) = &self.stroke else {
            return false;
        };
        let scale = self.transform.determinant().abs().sqrt();
        let reach = stroke.width * scale / 2.0 + tolerance;
        let reach_sq = reach * reach;
        path.segments()
            .any(|seg| seg.nearest(point, NEAREST_ACCURACY).distance_sq <= reach_sq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outlined_square() -> ShapePath {
        let mut path = ShapePath::new();
        path.set_stroke(Some(StrokeStyle::new(Color::BLACK, 2.0)));
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(100.0, 0.0));
        path.line_to(Point::new(100.0, 100.0));
        path.line_to(Point::new(0.0, 100.0));
        path.close();
        path
    }

    #[test]
    fn test_line_to_starts_subpath() {
        let mut path = ShapePath::new();
        path.line_to(Point::new(5.0, 5.0));
        path.line_to(Point::new(10.0, 5.0));
        assert_eq!(
            path.commands().elements()[0],
            PathEl::MoveTo(Point::new(5.0, 5.0))
        );
        assert_eq!(path.commands().elements().len(), 2);
    }

    #[test]
    fn test_reset_keeps_paint() {
        let mut path = outlined_square();
        path.set_fill(Some(Color::WHITE));
        path.reset();
        assert!(path.is_empty());
        assert!(path.fill().is_some());
        assert!(path.stroke().is_some());
    }

    #[test]
    fn test_bounds_follow_transform() {
        let mut path = outlined_square();
        path.set_transform(Affine::translate((10.0, 20.0)) * Affine::scale(2.0));
        let bounds = path.bounds();
        assert!((bounds.x0 - 10.0).abs() < 1e-9);
        assert!((bounds.y0 - 20.0).abs() < 1e-9);
        assert!((bounds.width() - 200.0).abs() < 1e-9);
        assert!((bounds.height() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_outline_hit_on_stroke_only() {
        let path = outlined_square();
        assert!(path.hit_test(Point::new(50.0, 0.5), 0.0));
        assert!(path.hit_test(Point::new(101.5, 50.0), 1.0));
        assert!(!path.hit_test(Point::new(50.0, 50.0), 1.0));
        assert!(!path.hit_test(Point::new(150.0, 50.0), 1.0));
    }

    #[test]
    fn test_filled_hit_inside() {
        let mut path = ShapePath::new();
        path.set_fill(Some(Color::WHITE));
        path.append_rect(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert!(path.hit_test(Point::new(25.0, 25.0), 0.0));
        assert!(!path.hit_test(Point::new(75.0, 25.0), 0.0));
    }

    #[test]
    fn test_stroke_reach_scales_with_zoom() {
        let mut path = outlined_square();
        path.set_transform(Affine::scale(4.0));
        // Half of the 8px transformed stroke.
        assert!(path.hit_test(Point::new(200.0, 3.5), 0.0));
        assert!(!path.hit_test(Point::new(200.0, 5.0), 0.0));
    }

    #[test]
    fn test_empty_path_never_hit() {
        let mut path = ShapePath::new();
        path.set_stroke(Some(StrokeStyle::new(Color::BLACK, 2.0)));
        assert!(!path.hit_test(Point::ZERO, 10.0));
        assert_eq!(path.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_stroke_cap_requires_stroke() {
        let mut path = ShapePath::new();
        path.set_stroke_cap(Cap::Round);
        assert!(path.stroke().is_none());
        path.set_stroke(Some(StrokeStyle::new(Color::BLACK, 1.0)));
        path.set_stroke_cap(Cap::Round);
        assert_eq!(path.stroke().map(|s| s.cap), Some(Cap::Round));
    }
}
