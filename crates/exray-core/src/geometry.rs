//! Path construction for each shape kind.
//!
//! Everything here is a pure function of its inputs: no ids, no storage.
//! Boxes are given as a top-left `pos` and a non-negative `size`.

use kurbo::{BezPath, Ellipse, Point, Shape as KurboShape, Vec2};

/// Bias added to the bottom-left corner of rectangles.
///
/// Keeps the contour from being exactly axis aligned so that an unfilled
/// rectangle is hit tested on its outline rather than on its whole box.
pub const RECT_HIT_EPSILON: f64 = 0.025;

/// Distance from the arrow tip back to the barbs.
pub const ARROW_HEAD_LENGTH: f64 = 12.0;

/// Distance of each barb from the arrow shaft.
pub const ARROW_HEAD_HALF_WIDTH: f64 = 8.0;

/// Flattening tolerance for ellipse curves.
pub const ELLIPSE_TOLERANCE: f64 = 0.1;

/// Result of an incremental polyline build.
#[derive(Debug, Clone)]
pub struct Polyline {
    pub path: BezPath,
    /// The live point returned to the start and the loop was closed.
    pub closed: bool,
}

/// Closed 4-point contour around the box.
pub fn rect(pos: Point, size: Vec2) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(pos);
    path.line_to((pos.x + size.x, pos.y));
    path.line_to(pos + size);
    path.line_to((pos.x, pos.y + size.y + RECT_HIT_EPSILON));
    path.close_path();
    path
}

/// Closed contour through the midpoints of the box sides.
pub fn diamond(pos: Point, size: Vec2) -> BezPath {
    let radius = size * 0.5;
    let mut path = BezPath::new();
    path.move_to((pos.x + radius.x, pos.y));
    path.line_to((pos.x + size.x, pos.y + radius.y));
    path.line_to((pos.x + radius.x, pos.y + size.y));
    path.line_to((pos.x, pos.y + radius.y));
    path.close_path();
    path
}

/// Ellipse inscribed in the box.
pub fn ellipse(pos: Point, size: Vec2) -> BezPath {
    let radius = size * 0.5;
    Ellipse::new(pos + radius, radius, 0.0).to_path(ELLIPSE_TOLERANCE)
}

/// Single open segment from `start` to `end`.
pub fn line(start: Point, end: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    path.line_to(end);
    path
}

/// Single segment with an arrowhead at `end`.
pub fn arrow_line(start: Point, end: Point) -> BezPath {
    let mut path = line(start, end);
    append_arrow_head(&mut path, start, end);
    path
}

/// Polyline through `points` continuing to the `live` cursor point.
///
/// When the loop is closed (see [`is_loop_closed`]) the path is closed back
/// to the first point instead of reaching for `live`.
pub fn lines(live: Point, points: &[Point], threshold: f64) -> Polyline {
    let mut path = committed(points);
    let closed = is_loop_closed(live, points, threshold);
    if closed {
        path.close_path();
    } else if !path.elements().is_empty() {
        path.line_to(live);
    }
    Polyline { path, closed }
}

/// Same as [`lines`] with an arrowhead on the live point.
pub fn arrow_lines(live: Point, points: &[Point], threshold: f64) -> Polyline {
    let Some(&last) = points.last() else {
        return Polyline {
            path: BezPath::new(),
            closed: false,
        };
    };
    let mut polyline = lines(live, points, threshold);
    append_arrow_head(&mut polyline.path, last, live);
    polyline
}

/// Whether the `live` point has returned to the start of a polyline with at
/// least three committed points. The comparison is per axis and inclusive.
pub fn is_loop_closed(live: Point, points: &[Point], threshold: f64) -> bool {
    if points.len() < 3 {
        return false;
    }
    let diff = points[0] - live;
    diff.x.abs() <= threshold && diff.y.abs() <= threshold
}

/// The two barb endpoints of an arrowhead whose tip is at `tip`, pointing
/// away from `from`.
pub fn arrow_head(from: Point, tip: Point) -> (Point, Point) {
    let delta = from - tip;
    let length = delta.hypot();
    let direction = if length > f64::EPSILON {
        delta / length
    } else {
        Vec2::ZERO
    };
    let perp = Vec2::new(-direction.y, direction.x);
    let base = tip + direction * ARROW_HEAD_LENGTH;
    (
        base + perp * ARROW_HEAD_HALF_WIDTH,
        base - perp * ARROW_HEAD_HALF_WIDTH,
    )
}

fn append_arrow_head(path: &mut BezPath, from: Point, tip: Point) {
    let (left, right) = arrow_head(from, tip);
    path.move_to(left);
    path.line_to(tip);
    path.move_to(right);
    path.line_to(tip);
}

fn committed(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
    }
    path
}
