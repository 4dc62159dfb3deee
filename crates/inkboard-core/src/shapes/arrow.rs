//! Arrow shape.

use super::{point_to_segment_dist, Binding, GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the arrow head in world units.
pub const ARROW_HEAD_LENGTH: f64 = 10.0;

/// A straight arrow with a head at the end point, optionally bound to
/// another shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ShapeId,
    /// Start point (tail).
    pub start: Point,
    /// End point (head).
    pub end: Point,
    /// Connector binding at the head.
    #[serde(default)]
    pub binding: Option<Binding>,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            binding: None,
            group: None,
            style: ShapeStyle::default(),
        }
    }

    /// The two barb points of the arrow head.
    pub fn head_points(&self) -> [Point; 2] {
        let dir = self.end - self.start;
        let len = dir.hypot();
        if len < f64::EPSILON {
            return [self.end, self.end];
        }
        let unit = dir / len;
        let base = self.end - unit * ARROW_HEAD_LENGTH;
        let normal = Vec2::new(-unit.y, unit.x) * (ARROW_HEAD_LENGTH / 2.0);
        [base + normal, base - normal]
    }

    /// Translate the head because the bound shape moved, and refresh the
    /// stored anchor. No-op when unbound.
    pub fn follow_binding(&mut self, delta: Vec2) {
        if let Some(binding) = &mut self.binding {
            self.end = binding.anchor + delta;
            binding.anchor = self.end;
        }
    }
}

impl ShapeTrait for Arrow {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.start, self.end)
            <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
        if let Some(binding) = &mut self.binding {
            binding.anchor += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_points_perpendicular() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let [a, b] = arrow.head_points();
        assert!((a.x - 90.0).abs() < f64::EPSILON);
        assert!((b.x - 90.0).abs() < f64::EPSILON);
        assert!((a.y + b.y).abs() < f64::EPSILON);
        assert!((a.y - b.y).abs() > f64::EPSILON);
    }

    #[test]
    fn test_degenerate_arrow_head() {
        let arrow = Arrow::new(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        let [a, b] = arrow.head_points();
        assert_eq!(a, arrow.end);
        assert_eq!(b, arrow.end);
    }

    #[test]
    fn test_follow_binding() {
        let mut arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(20.0, 0.0));
        arrow.binding = Some(Binding {
            anchor: arrow.end,
            target: Uuid::new_v4(),
        });
        arrow.follow_binding(Vec2::new(0.0, 10.0));
        assert!((arrow.end.y - 10.0).abs() < f64::EPSILON);
        assert!((arrow.start.y - 0.0).abs() < f64::EPSILON);
    }
}
