//! Shape definitions for the whiteboard.

mod arrow;
mod diamond;
mod ellipse;
mod image;
mod line;
mod rectangle;
mod stroke;
mod text;

pub use arrow::Arrow;
pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use image::{Image, ImageFormat};
pub use line::Line;
pub use rectangle::Rectangle;
pub use stroke::{Appended, Stroke, MAX_STROKE_POINTS, MIN_POINT_DISTANCE};
pub use text::Text;

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Identifier shared by shapes grouped together.
pub type GroupId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Light gray used by the context-menu recolor action.
    pub fn light_gray() -> Self {
        Self::new(0xe0, 0xe0, 0xe0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke style for lines and arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Style properties for shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Stroke style (Solid, Dashed, Dotted).
    #[serde(default)]
    pub stroke_style: StrokeStyle,
}

impl ShapeStyle {
    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            stroke_style: StrokeStyle::default(),
        }
    }
}

/// A connector endpoint bound to another shape.
///
/// Records the endpoint position at bind time so that moving the target
/// can translate the endpoint by the same delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Endpoint position when the binding was established.
    pub anchor: Point,
    /// Id of the bound shape. May dangle after the target is deleted.
    pub target: ShapeId,
}

/// Distance from a point to a line segment (a->b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Move the shape by a delta in world coordinates.
    fn translate(&mut self, delta: Vec2);
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Diamond(Diamond),
    Ellipse(Ellipse),
    Line(Line),
    Arrow(Arrow),
    Freehand(Stroke),
    Eraser(Stroke),
    Text(Text),
    Image(Image),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Diamond(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Line(s) => s.id(),
            Shape::Arrow(s) => s.id(),
            Shape::Freehand(s) => s.id(),
            Shape::Eraser(s) => s.id(),
            Shape::Text(s) => s.id(),
            Shape::Image(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Diamond(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Freehand(s) => s.bounds(),
            Shape::Eraser(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Diamond(s) => s.hit_test(point, tolerance),
            Shape::Ellipse(s) => s.hit_test(point, tolerance),
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Arrow(s) => s.hit_test(point, tolerance),
            Shape::Freehand(s) => s.hit_test(point, tolerance),
            Shape::Eraser(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Image(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Diamond(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Arrow(s) => s.style(),
            Shape::Freehand(s) => s.style(),
            Shape::Eraser(s) => s.style(),
            Shape::Text(s) => s.style(),
            Shape::Image(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Diamond(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Line(s) => s.style_mut(),
            Shape::Arrow(s) => s.style_mut(),
            Shape::Freehand(s) => s.style_mut(),
            Shape::Eraser(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
            Shape::Image(s) => s.style_mut(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rectangle(s) => s.translate(delta),
            Shape::Diamond(s) => s.translate(delta),
            Shape::Ellipse(s) => s.translate(delta),
            Shape::Line(s) => s.translate(delta),
            Shape::Arrow(s) => s.translate(delta),
            Shape::Freehand(s) => s.translate(delta),
            Shape::Eraser(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
            Shape::Image(s) => s.translate(delta),
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// This is used when duplicating shapes to ensure they have unique IDs.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Rectangle(s) => s.id = new_id,
            Shape::Diamond(s) => s.id = new_id,
            Shape::Ellipse(s) => s.id = new_id,
            Shape::Line(s) => s.id = new_id,
            Shape::Arrow(s) => s.id = new_id,
            Shape::Freehand(s) => s.id = new_id,
            Shape::Eraser(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
            Shape::Image(s) => s.id = new_id,
        }
    }

    /// Get the group membership tag, if any.
    pub fn group(&self) -> Option<GroupId> {
        match self {
            Shape::Rectangle(s) => s.group,
            Shape::Diamond(s) => s.group,
            Shape::Ellipse(s) => s.group,
            Shape::Line(s) => s.group,
            Shape::Arrow(s) => s.group,
            Shape::Freehand(s) => s.group,
            Shape::Eraser(s) => s.group,
            Shape::Text(s) => s.group,
            Shape::Image(s) => s.group,
        }
    }

    /// Set or clear the group membership tag.
    pub fn set_group(&mut self, group: Option<GroupId>) {
        match self {
            Shape::Rectangle(s) => s.group = group,
            Shape::Diamond(s) => s.group = group,
            Shape::Ellipse(s) => s.group = group,
            Shape::Line(s) => s.group = group,
            Shape::Arrow(s) => s.group = group,
            Shape::Freehand(s) => s.group = group,
            Shape::Eraser(s) => s.group = group,
            Shape::Text(s) => s.group = group,
            Shape::Image(s) => s.group = group,
        }
    }

    /// Get the connector binding for lines and arrows.
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            Shape::Line(s) => s.binding.as_ref(),
            Shape::Arrow(s) => s.binding.as_ref(),
            _ => None,
        }
    }

    /// Translate the bound endpoint of a line or arrow and refresh its anchor.
    /// No-op for shapes without a binding.
    pub fn follow_binding(&mut self, delta: Vec2) {
        match self {
            Shape::Line(s) => s.follow_binding(delta),
            Shape::Arrow(s) => s.follow_binding(delta),
            _ => {}
        }
    }

    /// Whether connectors may bind to this shape.
    pub fn is_bind_target(&self) -> bool {
        matches!(
            self,
            Shape::Rectangle(_) | Shape::Diamond(_) | Shape::Ellipse(_)
        )
    }

    /// Check if this shape is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Shape::Image(_))
    }

    /// Get the image if this shape is an image.
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Shape::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Get the rotation angle in radians (0 for shapes that don't support rotation).
    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Diamond(s) => s.rotation,
            Shape::Ellipse(s) => s.rotation,
            Shape::Text(s) => s.rotation,
            Shape::Image(s) => s.rotation,
            _ => 0.0,
        }
    }

    /// Set the rotation angle in radians.
    pub fn set_rotation(&mut self, rotation: f64) {
        match self {
            Shape::Rectangle(s) => s.rotation = rotation,
            Shape::Diamond(s) => s.rotation = rotation,
            Shape::Ellipse(s) => s.rotation = rotation,
            Shape::Text(s) => s.rotation = rotation,
            Shape::Image(s) => s.rotation = rotation,
            _ => {}
        }
    }
}

/// Normalize a rectangle described by an origin and signed extents.
pub(crate) fn signed_rect(origin: Point, width: f64, height: f64) -> Rect {
    Rect::new(origin.x, origin.y, origin.x + width, origin.y + height).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        let a = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        let b = Shape::Rectangle(Rectangle::new(Point::ZERO, 10.0, 10.0));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_regenerate_id() {
        let mut shape = Shape::Ellipse(Ellipse::new(Point::ZERO, 10.0, 10.0));
        let old = shape.id();
        shape.regenerate_id();
        assert_ne!(shape.id(), old);
    }

    #[test]
    fn test_signed_rect_normalizes() {
        let r = signed_rect(Point::new(40.0, 25.0), -30.0, -15.0);
        assert!((r.x0 - 10.0).abs() < f64::EPSILON);
        assert!((r.y0 - 10.0).abs() < f64::EPSILON);
        assert!((r.x1 - 40.0).abs() < f64::EPSILON);
        assert!((r.y1 - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bind_targets() {
        assert!(Shape::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0)).is_bind_target());
        assert!(Shape::Diamond(Diamond::new(Point::ZERO, 1.0, 1.0)).is_bind_target());
        assert!(Shape::Ellipse(Ellipse::new(Point::ZERO, 1.0, 1.0)).is_bind_target());
        assert!(!Shape::Line(Line::new(Point::ZERO, Point::ZERO)).is_bind_target());
    }

    #[test]
    fn test_point_to_segment_dist() {
        let d = point_to_segment_dist(
            Point::new(5.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < f64::EPSILON);
    }
}
