//! Line shape.

use super::{point_to_segment_dist, Binding, GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment, optionally bound to another shape at its end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Connector binding at the end point.
    #[serde(default)]
    pub binding: Option<Binding>,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
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

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Translate the end point because the bound shape moved, and refresh
    /// the stored anchor. No-op when unbound.
    pub fn follow_binding(&mut self, delta: Vec2) {
        if let Some(binding) = &mut self.binding {
            self.end = binding.anchor + delta;
            binding.anchor = self.end;
        }
    }
}

impl ShapeTrait for Line {
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
    fn test_line_length() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_on_line() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 0.0), 1.0));
        assert!(line.hit_test(Point::new(50.0, 2.0), 5.0));
        assert!(!line.hit_test(Point::new(50.0, 20.0), 5.0));
    }

    #[test]
    fn test_follow_binding_moves_end() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        line.binding = Some(Binding {
            anchor: line.end,
            target: Uuid::new_v4(),
        });
        line.follow_binding(Vec2::new(5.0, -3.0));
        assert!((line.end.x - 15.0).abs() < f64::EPSILON);
        assert!((line.end.y - 7.0).abs() < f64::EPSILON);
        let binding = line.binding.as_ref().unwrap();
        assert_eq!(binding.anchor, line.end);
    }

    #[test]
    fn test_follow_binding_unbound_is_noop() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        line.follow_binding(Vec2::new(5.0, 5.0));
        assert!((line.end.x - 10.0).abs() < f64::EPSILON);
    }
}
