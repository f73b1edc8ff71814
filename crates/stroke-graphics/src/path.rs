//! Path commands, flattening, and arc-length trimming.
//!
//! The reveal animation maps progress to a trim fraction: the portion of the
//! path's total arc length currently visible. [`PathMeasure`] flattens the
//! path once, records cumulative lengths, and cuts sub-polylines for any
//! fraction range without re-walking the curves.

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
}

/// An open vector path built from move/line/curve commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.commands
            .push(PathCommand::QuadTo(Point::new(cx, cy), Point::new(x, y)));
        self
    }

    pub fn cubic_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::CubicTo(
            Point::new(c1x, c1y),
            Point::new(c2x, c2y),
            Point::new(x, y),
        ));
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Stroke cap at open contour ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

/// Stroke join between segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
}

/// How a path outline is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeStyle {
    pub fn round(width: f32) -> Self {
        Self {
            width,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::round(1.0)
    }
}

fn quad_point(p0: Point, c: Point, p1: Point, t: f32) -> Point {
    let a = p0.lerp(c, t);
    let b = c.lerp(p1, t);
    a.lerp(b, t)
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let a = p0.lerp(c1, t);
    let b = c1.lerp(c2, t);
    let c = c2.lerp(p1, t);
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    ab.lerp(bc, t)
}

/// Flattening step count from the control polygon length, so long curves get
/// proportionally more segments.
fn curve_steps(control_polygon_length: f32) -> usize {
    ((control_polygon_length / 2.0).ceil() as usize).clamp(4, 96)
}

/// Flattened path with cumulative arc lengths, ready for trimming.
#[derive(Debug, Clone)]
pub struct PathMeasure {
    contours: Vec<Vec<Point>>,
    total_length: f32,
}

impl PathMeasure {
    pub fn new(path: &Path) -> Self {
        let mut contours: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(point) => {
                    if current.len() >= 2 {
                        contours.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                    current.push(point);
                }
                PathCommand::LineTo(point) => {
                    if current.is_empty() {
                        current.push(Point::default());
                    }
                    current.push(point);
                }
                PathCommand::QuadTo(control, end) => {
                    let start = *current.last().unwrap_or(&Point::default());
                    let steps =
                        curve_steps(start.distance_to(control) + control.distance_to(end));
                    if current.is_empty() {
                        current.push(start);
                    }
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        current.push(quad_point(start, control, end, t));
                    }
                }
                PathCommand::CubicTo(c1, c2, end) => {
                    let start = *current.last().unwrap_or(&Point::default());
                    let steps = curve_steps(
                        start.distance_to(c1) + c1.distance_to(c2) + c2.distance_to(end),
                    );
                    if current.is_empty() {
                        current.push(start);
                    }
                    for step in 1..=steps {
                        let t = step as f32 / steps as f32;
                        current.push(cubic_point(start, c1, c2, end, t));
                    }
                }
            }
        }
        if current.len() >= 2 {
            contours.push(current);
        }

        let mut total_length = 0.0;
        for contour in &contours {
            for pair in contour.windows(2) {
                total_length += pair[0].distance_to(pair[1]);
            }
        }

        Self {
            contours,
            total_length,
        }
    }

    pub fn length(&self) -> f32 {
        self.total_length
    }

    pub fn contours(&self) -> &[Vec<Point>] {
        &self.contours
    }

    /// Bounding box of the flattened path centerline.
    pub fn bounds(&self) -> Rect {
        let mut points = self.contours.iter().flatten();
        let Some(first) = points.next() else {
            return Rect::default();
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Sub-polylines covering the `[from, to]` fraction range of the total
    /// arc length. Inputs are clamped to [0, 1]; an empty or inverted range
    /// yields no geometry. Contour breaks are preserved, never bridged.
    pub fn trimmed(&self, from: f32, to: f32) -> Vec<Vec<Point>> {
        let from = from.clamp(0.0, 1.0);
        let to = to.clamp(0.0, 1.0);
        if self.total_length <= 0.0 || to <= from {
            return Vec::new();
        }
        let start_len = from * self.total_length;
        let end_len = to * self.total_length;

        let mut out = Vec::new();
        let mut walked = 0.0f32;
        for contour in &self.contours {
            let mut current: Vec<Point> = Vec::new();
            for pair in contour.windows(2) {
                let seg_len = pair[0].distance_to(pair[1]);
                if seg_len <= 0.0 {
                    continue;
                }
                let seg_start = walked;
                let seg_end = walked + seg_len;
                if seg_end > start_len && seg_start < end_len {
                    let t0 = ((start_len - seg_start) / seg_len).max(0.0);
                    let t1 = ((end_len - seg_start) / seg_len).min(1.0);
                    let head = pair[0].lerp(pair[1], t0);
                    let tail = pair[0].lerp(pair[1], t1);
                    if current.is_empty() {
                        current.push(head);
                    }
                    current.push(tail);
                }
                walked = seg_end;
            }
            if current.len() >= 2 {
                out.push(current);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Path {
        // Two straight legs, 10 units each.
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(10.0, 10.0);
        path
    }

    #[test]
    fn straight_segments_measure_exactly() {
        let measure = PathMeasure::new(&l_shape());
        assert!((measure.length() - 20.0).abs() < 1e-5);
    }

    #[test]
    fn empty_path_trims_to_nothing() {
        let measure = PathMeasure::new(&Path::new());
        assert_eq!(measure.length(), 0.0);
        assert!(measure.trimmed(0.0, 1.0).is_empty());
    }

    #[test]
    fn full_trim_returns_the_whole_polyline() {
        let measure = PathMeasure::new(&l_shape());
        let contours = measure.trimmed(0.0, 1.0);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(contours[0].last(), Some(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn half_trim_cuts_mid_segment() {
        let measure = PathMeasure::new(&l_shape());
        let contours = measure.trimmed(0.0, 0.5);
        assert_eq!(contours.len(), 1);
        let last = *contours[0].last().unwrap();
        assert!((last.x - 10.0).abs() < 1e-4);
        assert!(last.y.abs() < 1e-4);
    }

    #[test]
    fn interior_trim_starts_partway() {
        let measure = PathMeasure::new(&l_shape());
        let contours = measure.trimmed(0.25, 0.75);
        assert_eq!(contours.len(), 1);
        let first = contours[0][0];
        let last = *contours[0].last().unwrap();
        assert!((first.x - 5.0).abs() < 1e-4);
        assert!((last.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn inverted_and_degenerate_ranges_are_empty() {
        let measure = PathMeasure::new(&l_shape());
        assert!(measure.trimmed(0.8, 0.2).is_empty());
        assert!(measure.trimmed(0.5, 0.5).is_empty());
    }

    #[test]
    fn out_of_range_fractions_are_clamped() {
        let measure = PathMeasure::new(&l_shape());
        let full = measure.trimmed(-1.0, 2.0);
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].last(), Some(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn contour_breaks_are_not_bridged() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).line_to(10.0, 0.0);
        path.move_to(0.0, 5.0).line_to(10.0, 5.0);
        let measure = PathMeasure::new(&path);
        assert!((measure.length() - 20.0).abs() < 1e-5);

        let contours = measure.trimmed(0.0, 1.0);
        assert_eq!(contours.len(), 2);

        // A range spanning the break yields the tail of one contour and the
        // head of the next.
        let spanning = measure.trimmed(0.4, 0.6);
        assert_eq!(spanning.len(), 2);
        assert!((spanning[0][0].x - 8.0).abs() < 1e-4);
        assert!((spanning[1].last().unwrap().x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_quad_measures_like_a_line() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0).quad_to(5.0, 0.0, 10.0, 0.0);
        let measure = PathMeasure::new(&path);
        assert!((measure.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn curves_flatten_close_to_true_length() {
        // Quarter circle of radius 10 as a cubic (kappa approximation);
        // true arc length is ~15.708.
        let mut path = Path::new();
        let k = 5.522847;
        path.move_to(10.0, 0.0).cubic_to(10.0, k, k, 10.0, 0.0, 10.0);
        let measure = PathMeasure::new(&path);
        assert!((measure.length() - 15.708).abs() < 0.05, "length {}", measure.length());
    }

    #[test]
    fn bounds_cover_all_contours() {
        let mut path = Path::new();
        path.move_to(-5.0, 2.0).line_to(15.0, 2.0);
        path.move_to(0.0, -3.0).line_to(0.0, 9.0);
        let measure = PathMeasure::new(&path);
        assert_eq!(measure.bounds(), Rect::new(-5.0, -3.0, 20.0, 12.0));
    }
}
