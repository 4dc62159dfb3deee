//! Rectangle, diamond, and ellipse drag tools.

use super::{pressure_stroke_width, ToolContext, ToolHandler};
use crate::input::PointerInput;
use crate::scene::Scene;
use crate::shapes::{Diamond, Ellipse, Rectangle, Shape, ShapeId};
use kurbo::Point;

/// Which box-drag shape the tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxKind {
    #[default]
    Rectangle,
    Diamond,
    Ellipse,
}

impl BoxKind {
    fn create(&self, origin: Point) -> Shape {
        match self {
            BoxKind::Rectangle => Shape::Rectangle(Rectangle::new(origin, 1.0, 1.0)),
            BoxKind::Diamond => Shape::Diamond(Diamond::new(origin, 1.0, 1.0)),
            BoxKind::Ellipse => Shape::Ellipse(Ellipse::new(origin, 1.0, 1.0)),
        }
    }
}

/// Drag state: the shape being sized and its drag origin.
#[derive(Debug, Default)]
pub struct BoxTool {
    kind: BoxKind,
    active: Option<(ShapeId, Point)>,
}

impl BoxTool {
    pub fn new(kind: BoxKind) -> Self {
        Self { kind, active: None }
    }
}

impl ToolHandler for BoxTool {
    fn pointer_down(
        &mut self,
        scene: &mut Scene,
        ctx: &ToolContext,
        input: &PointerInput,
        pos: Point,
    ) -> bool {
        let mut shape = self.kind.create(pos);
        shape.style_mut().stroke_width = pressure_stroke_width(input, 2.0);
        shape.style_mut().stroke_color = ctx.stroke_color;
        self.active = Some((scene.add(shape), pos));
        true
    }

    fn pointer_move(&mut self, scene: &mut Scene, input: &PointerInput, pos: Point) {
        let Some((id, origin)) = self.active else {
            return;
        };
        let mut dx = pos.x - origin.x;
        let mut dy = pos.y - origin.y;
        // A degenerate axis still draws something visible
        if dx == 0.0 {
            dx = 1.0;
        }
        if dy == 0.0 {
            dy = 1.0;
        }
        if input.modifiers.shift {
            // Constrain to a square, keeping each axis' direction
            let size = dx.abs().max(dy.abs());
            dx = size * dx.signum();
            dy = size * dy.signum();
        }
        scene.patch(id, |shape| match shape {
            Shape::Rectangle(r) => {
                r.width = dx;
                r.height = dy;
            }
            Shape::Diamond(d) => {
                d.width = dx;
                d.height = dy;
            }
            Shape::Ellipse(e) => {
                e.width = dx;
                e.height = dy;
            }
            _ => {}
        });
    }

    fn pointer_up(&mut self, _scene: &mut Scene) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::SerializableColor;

    fn ctx() -> ToolContext {
        ToolContext {
            stroke_color: SerializableColor::black(),
        }
    }

    #[test]
    fn test_drag_sets_signed_extents() {
        let mut scene = Scene::new();
        let mut tool = BoxTool::new(BoxKind::Rectangle);
        let input = PointerInput::mouse(Point::ZERO);
        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(50.0, 50.0));
        tool.pointer_move(&mut scene, &input, Point::new(20.0, 80.0));
        tool.pointer_up(&mut scene);

        let Shape::Rectangle(rect) = &scene.shapes()[0] else {
            panic!("expected rectangle");
        };
        assert!((rect.width + 30.0).abs() < f64::EPSILON);
        assert!((rect.height - 30.0).abs() < f64::EPSILON);
        assert!((rect.origin.x - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shift_constrains_to_square() {
        let mut scene = Scene::new();
        let mut tool = BoxTool::new(BoxKind::Rectangle);
        let input = PointerInput::mouse(Point::ZERO);
        let shifted = input.with_modifiers(Modifiers {
            shift: true,
            ..Modifiers::default()
        });
        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(10.0, 10.0));
        tool.pointer_move(&mut scene, &shifted, Point::new(40.0, 25.0));

        let Shape::Rectangle(rect) = &scene.shapes()[0] else {
            panic!("expected rectangle");
        };
        assert!((rect.width - 30.0).abs() < f64::EPSILON);
        assert!((rect.height - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shift_square_applies_to_ellipse() {
        let mut scene = Scene::new();
        let mut tool = BoxTool::new(BoxKind::Ellipse);
        let input = PointerInput::mouse(Point::ZERO);
        let shifted = input.with_modifiers(Modifiers {
            shift: true,
            ..Modifiers::default()
        });
        tool.pointer_down(&mut scene, &ctx(), &input, Point::ZERO);
        tool.pointer_move(&mut scene, &shifted, Point::new(-50.0, 20.0));

        let Shape::Ellipse(ellipse) = &scene.shapes()[0] else {
            panic!("expected ellipse");
        };
        assert!((ellipse.width + 50.0).abs() < f64::EPSILON);
        assert!((ellipse.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_axis_coerced_to_one() {
        let mut scene = Scene::new();
        let mut tool = BoxTool::new(BoxKind::Diamond);
        let input = PointerInput::mouse(Point::ZERO);
        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(10.0, 10.0));
        tool.pointer_move(&mut scene, &input, Point::new(10.0, 40.0));

        let Shape::Diamond(diamond) = &scene.shapes()[0] else {
            panic!("expected diamond");
        };
        assert!((diamond.width - 1.0).abs() < f64::EPSILON);
        assert!((diamond.height - 30.0).abs() < f64::EPSILON);
    }
}
