//! Freehand pen and eraser tools.

use super::{pressure_stroke_width, ToolContext, ToolHandler};
use crate::input::PointerInput;
use crate::scene::Scene;
use crate::shapes::{Appended, SerializableColor, Shape, ShapeId, Stroke};
use kurbo::Point;

/// Which stroke variant the tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeKind {
    #[default]
    Freehand,
    Eraser,
}

impl StrokeKind {
    fn wrap(&self, stroke: Stroke) -> Shape {
        match self {
            StrokeKind::Freehand => Shape::Freehand(stroke),
            StrokeKind::Eraser => Shape::Eraser(stroke),
        }
    }

    /// Pressure multiplier for the stroke width; the eraser is broader.
    fn width_multiplier(&self) -> f64 {
        match self {
            StrokeKind::Freehand => 2.0,
            StrokeKind::Eraser => 4.0,
        }
    }
}

/// Draws polyline strokes, splitting at the point cap.
#[derive(Debug, Default)]
pub struct StrokeTool {
    kind: StrokeKind,
    active: Option<ShapeId>,
}

impl StrokeTool {
    pub fn new(kind: StrokeKind) -> Self {
        Self { kind, active: None }
    }
}

impl ToolHandler for StrokeTool {
    fn pointer_down(
        &mut self,
        scene: &mut Scene,
        ctx: &ToolContext,
        input: &PointerInput,
        pos: Point,
    ) -> bool {
        let mut stroke = Stroke::new(pos);
        stroke.style.stroke_width = pressure_stroke_width(input, self.kind.width_multiplier());
        stroke.style.stroke_color = match self.kind {
            // The eraser paints in the background color
            StrokeKind::Eraser => SerializableColor::white(),
            StrokeKind::Freehand => ctx.stroke_color,
        };
        self.active = Some(scene.add(self.kind.wrap(stroke)));
        true
    }

    fn pointer_move(&mut self, scene: &mut Scene, _input: &PointerInput, pos: Point) {
        let Some(id) = self.active else {
            return;
        };
        let mut continuation = None;
        if let Some(Shape::Freehand(stroke) | Shape::Eraser(stroke)) = scene.get_mut(id) {
            if stroke.append(pos) == Appended::Full {
                // At capacity: start a continuation sharing the split point
                let mut next = stroke.continuation();
                next.append(pos);
                continuation = Some(next);
            }
        }
        if let Some(next) = continuation {
            self.active = Some(scene.add(self.kind.wrap(next)));
        }
    }

    fn pointer_up(&mut self, _scene: &mut Scene) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ShapeTrait, MAX_STROKE_POINTS};

    fn ctx() -> ToolContext {
        ToolContext {
            stroke_color: SerializableColor::black(),
        }
    }

    fn pen_input() -> PointerInput {
        PointerInput {
            pointer_type: crate::input::PointerType::Pen,
            pressure: 1.0,
            ..PointerInput::mouse(Point::ZERO)
        }
    }

    #[test]
    fn test_eraser_paints_background_color() {
        let mut scene = Scene::new();
        let mut tool = StrokeTool::new(StrokeKind::Eraser);
        tool.pointer_down(&mut scene, &ctx(), &pen_input(), Point::ZERO);
        let shape = &scene.shapes()[0];
        assert!(matches!(shape, Shape::Eraser(_)));
        assert_eq!(shape.style().stroke_color, SerializableColor::white());
        assert!((shape.style().stroke_width - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_long_gesture_splits_at_cap() {
        let mut scene = Scene::new();
        let mut tool = StrokeTool::new(StrokeKind::Eraser);
        let input = pen_input();
        tool.pointer_down(&mut scene, &ctx(), &input, Point::ZERO);
        for i in 1..=(MAX_STROKE_POINTS + 50) {
            tool.pointer_move(&mut scene, &input, Point::new(i as f64 * 3.0, 0.0));
        }
        tool.pointer_up(&mut scene);

        assert_eq!(scene.len(), 2);
        let Shape::Eraser(first) = &scene.shapes()[0] else {
            panic!("expected eraser stroke");
        };
        let Shape::Eraser(second) = &scene.shapes()[1] else {
            panic!("expected eraser stroke");
        };
        assert_eq!(first.points.len(), MAX_STROKE_POINTS);
        // Continuity at the split point
        assert_eq!(second.points[0], *first.points.last().unwrap());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_mouse_stroke_fixed_width() {
        let mut scene = Scene::new();
        let mut tool = StrokeTool::new(StrokeKind::Freehand);
        let input = PointerInput::mouse(Point::ZERO);
        tool.pointer_down(&mut scene, &ctx(), &input, Point::ZERO);
        assert!((scene.shapes()[0].style().stroke_width - 2.0).abs() < f64::EPSILON);
    }
}
