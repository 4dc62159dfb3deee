//! Rectangle shape.

use super::{signed_rect, GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle anchored at its drag origin.
///
/// Width and height are signed so a drag up-left of the origin keeps the
/// origin fixed; `bounds()` normalizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Drag origin (not necessarily the top-left corner).
    pub origin: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Corner radius in world units.
    #[serde(default)]
    pub corner_radius: f64,
    /// Rotation angle in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            width,
            height,
            corner_radius: 0.0,
            rotation: 0.0,
            group: None,
            style: ShapeStyle::default(),
        }
    }

    /// Get the normalized axis-aligned rectangle.
    pub fn as_rect(&self) -> Rect {
        signed_rect(self.origin, self.width, self.height)
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect().inflate(tolerance, tolerance);
        if !rect.contains(point) {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject hits well inside the border
        let margin = tolerance + self.style.stroke_width / 2.0;
        let inner = self.as_rect().inflate(-margin, -margin);
        inner.width() <= 0.0 || inner.height() <= 0.0 || !inner.contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_extents_normalize() {
        let rect = Rectangle::new(Point::new(40.0, 25.0), -30.0, -15.0);
        let bounds = rect.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_border() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 50.0);
        rect.style.stroke_width = 2.0;
        assert!(rect.hit_test(Point::new(0.0, 25.0), 2.0));
        assert!(!rect.hit_test(Point::new(50.0, 25.0), 2.0));
        rect.style.fill_color = Some(super::super::SerializableColor::white());
        assert!(rect.hit_test(Point::new(50.0, 25.0), 2.0));
    }

    #[test]
    fn test_translate() {
        let mut rect = Rectangle::new(Point::new(10.0, 10.0), 20.0, 20.0);
        rect.translate(Vec2::new(5.0, -5.0));
        assert!((rect.origin.x - 15.0).abs() < f64::EPSILON);
        assert!((rect.origin.y - 5.0).abs() < f64::EPSILON);
    }
}
