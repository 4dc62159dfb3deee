//! Freehand and eraser strokes.

use super::{point_to_polyline_dist, GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard cap on points per stroke. A gesture that exceeds it is split
/// into continuation strokes.
pub const MAX_STROKE_POINTS: usize = 1000;

/// Minimum distance between consecutive stroke points. Closer samples
/// are dropped to bound point count.
pub const MIN_POINT_DISTANCE: f64 = 2.0;

/// Outcome of appending a sample to a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appended {
    /// The point was added.
    Added,
    /// The point was too close to the last one and was dropped.
    TooClose,
    /// The stroke is at capacity; the caller should start a continuation.
    Full,
}

/// A polyline stroke used by both the freehand pen and the eraser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: ShapeId,
    /// Sampled points in world coordinates.
    pub points: Vec<Point>,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Stroke {
    /// Create a stroke seeded with its first point.
    pub fn new(first: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![first],
            group: None,
            style: ShapeStyle::default(),
        }
    }

    /// Append a sample, applying the minimum-distance filter and the
    /// point cap.
    pub fn append(&mut self, point: Point) -> Appended {
        if let Some(last) = self.points.last() {
            if (point - *last).hypot() < MIN_POINT_DISTANCE {
                return Appended::TooClose;
            }
        }
        if self.points.len() >= MAX_STROKE_POINTS {
            return Appended::Full;
        }
        self.points.push(point);
        Appended::Added
    }

    /// The last sampled point.
    pub fn last_point(&self) -> Point {
        self.points.last().copied().unwrap_or(Point::ZERO)
    }

    /// Start a continuation stroke that shares this stroke's last point,
    /// keeping the polyline connected across the split.
    pub fn continuation(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![self.last_point()],
            group: self.group,
            style: self.style.clone(),
        }
    }
}

impl ShapeTrait for Stroke {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let first = match iter.next() {
            Some(p) => *p,
            None => return Rect::ZERO,
        };
        iter.fold(Rect::from_points(first, first), |r, p| {
            r.union_pt(*p)
        })
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            return self
                .points
                .first()
                .is_some_and(|p| (point - *p).hypot() <= tolerance);
        }
        point_to_polyline_dist(point, &self.points)
            <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_filters_close_samples() {
        let mut stroke = Stroke::new(Point::new(0.0, 0.0));
        assert_eq!(stroke.append(Point::new(1.0, 0.0)), Appended::TooClose);
        assert_eq!(stroke.append(Point::new(3.0, 0.0)), Appended::Added);
        assert_eq!(stroke.points.len(), 2);
    }

    #[test]
    fn test_append_reports_full() {
        let mut stroke = Stroke::new(Point::new(0.0, 0.0));
        for i in 1..MAX_STROKE_POINTS {
            assert_eq!(
                stroke.append(Point::new(i as f64 * 3.0, 0.0)),
                Appended::Added
            );
        }
        assert_eq!(stroke.points.len(), MAX_STROKE_POINTS);
        assert_eq!(
            stroke.append(Point::new(1e7, 0.0)),
            Appended::Full
        );
        assert_eq!(stroke.points.len(), MAX_STROKE_POINTS);
    }

    #[test]
    fn test_continuation_shares_split_point() {
        let mut stroke = Stroke::new(Point::new(0.0, 0.0));
        stroke.append(Point::new(10.0, 0.0));
        let next = stroke.continuation();
        assert_eq!(next.points[0], stroke.last_point());
        assert_ne!(next.id, stroke.id);
    }

    #[test]
    fn test_bounds() {
        let mut stroke = Stroke::new(Point::new(10.0, 20.0));
        stroke.append(Point::new(50.0, 5.0));
        stroke.append(Point::new(30.0, 40.0));
        let bounds = stroke.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 5.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 50.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 40.0).abs() < f64::EPSILON);
    }
}
