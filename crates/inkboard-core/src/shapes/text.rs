//! Text shape.

use super::{GroupId, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default font size for newly placed text.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Top-left anchor position.
    pub position: Point,
    /// Text content. Empty right after placement, until edited.
    pub content: String,
    /// Font size in world units.
    pub font_size: f64,
    /// Rotation angle in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    /// Create an empty text shape ready for editing.
    pub fn new(position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            rotation: 0.0,
            group: None,
            style: ShapeStyle::default(),
        }
    }

    /// Estimated extents of the laid-out text.
    ///
    /// A monospace-style approximation; the renderer lays out the real
    /// glyphs. Empty content still reports a one-line caret box.
    pub fn estimated_size(&self) -> (f64, f64) {
        let max_cols = self
            .content
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let lines = self.content.lines().count().max(1);
        let width = (max_cols.max(1) as f64) * self.font_size * 0.6;
        let height = lines as f64 * self.font_size * 1.2;
        (width, height)
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let (w, h) = self.estimated_size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + w,
            self.position.y + h,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_text_is_empty() {
        let text = Text::new(Point::new(5.0, 5.0));
        assert!(text.content.is_empty());
        assert!((text.font_size - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_text_still_has_bounds() {
        let text = Text::new(Point::new(0.0, 0.0));
        let bounds = text.bounds();
        assert!(bounds.width() > 0.0);
        assert!(bounds.height() > 0.0);
    }

    #[test]
    fn test_multiline_grows_height() {
        let mut text = Text::new(Point::ZERO);
        text.content = "one".to_string();
        let single = text.bounds().height();
        text.content = "one\ntwo".to_string();
        assert!(text.bounds().height() > single);
    }
}
