//! Diamond shape.

use super::{signed_rect, GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A diamond (rhombus) inscribed in its drag rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diamond {
    pub(crate) id: ShapeId,
    /// Drag origin.
    pub origin: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Rotation angle in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Diamond {
    /// Create a new diamond.
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            width,
            height,
            rotation: 0.0,
            group: None,
            style: ShapeStyle::default(),
        }
    }

    /// The four vertices: top, right, bottom, left.
    pub fn vertices(&self) -> [Point; 4] {
        let rect = self.bounds();
        let center = rect.center();
        [
            Point::new(center.x, rect.y0),
            Point::new(rect.x1, center.y),
            Point::new(center.x, rect.y1),
            Point::new(rect.x0, center.y),
        ]
    }
}

impl ShapeTrait for Diamond {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        signed_rect(self.origin, self.width, self.height)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.bounds();
        let half_w = rect.width() / 2.0 + tolerance;
        let half_h = rect.height() / 2.0 + tolerance;
        if half_w < f64::EPSILON || half_h < f64::EPSILON {
            return false;
        }
        let center = rect.center();
        // |x|/a + |y|/b <= 1 inside the rhombus
        let nx = (point.x - center.x).abs() / half_w;
        let ny = (point.y - center.y).abs() / half_h;
        if nx + ny > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        let edge = tolerance + self.style.stroke_width / 2.0;
        let inner_w = (rect.width() / 2.0 - edge).max(0.0);
        let inner_h = (rect.height() / 2.0 - edge).max(0.0);
        if inner_w < f64::EPSILON || inner_h < f64::EPSILON {
            return true;
        }
        (point.x - center.x).abs() / inner_w + (point.y - center.y).abs() / inner_h > 1.0
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
