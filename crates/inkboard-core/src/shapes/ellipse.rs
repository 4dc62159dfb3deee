//! Ellipse shape.

use super::{signed_rect, GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in its drag rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    /// Drag origin.
    pub origin: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub rotation: f64,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
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

    /// Center of the ellipse.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Horizontal radius.
    pub fn radius_x(&self) -> f64 {
        self.width.abs() / 2.0
    }

    /// Vertical radius.
    pub fn radius_y(&self) -> f64 {
        self.height.abs() / 2.0
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> kurbo::Ellipse {
        kurbo::Ellipse::new(self.center(), (self.radius_x(), self.radius_y()), 0.0)
    }
}

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        signed_rect(self.origin, self.width, self.height)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let center = self.center();
        let half_sw = self.style.stroke_width / 2.0;
        let rx = self.radius_x() + tolerance + half_sw;
        let ry = self.radius_y() + tolerance + half_sw;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let dx_outer = (point.x - center.x) / rx;
        let dy_outer = (point.y - center.y) / ry;
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.style.fill_color.is_some() {
            return true;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = (self.radius_x() - tolerance - half_sw).max(0.0);
        let inner_ry = (self.radius_y() - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - center.x) / inner_rx;
        let dy_inner = (point.y - center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
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
