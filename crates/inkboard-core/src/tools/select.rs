//! Selection tool: hit-testing, selection updates, drag-to-move,
//! corner resize handles, and context-menu requests.

use super::{ToolContext, ToolHandler};
use crate::input::{PointerButton, PointerInput};
use crate::scene::{Scene, HIT_TOLERANCE};
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect};

/// World-space grab radius around a corner handle.
const HANDLE_TOLERANCE: f64 = 6.0;

/// Corner handle positions of a bounds rect, clockwise from top-left.
pub fn corner_handles(bounds: Rect) -> [Point; 4] {
    [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        Point::new(bounds.x0, bounds.y1),
    ]
}

/// Shapes with a resizable frame; these get corner handles when they
/// are the lone selection.
pub fn has_resize_handles(shape: &Shape) -> bool {
    matches!(
        shape,
        Shape::Rectangle(_) | Shape::Diamond(_) | Shape::Ellipse(_) | Shape::Image(_)
    )
}

#[derive(Debug)]
enum Drag {
    Move {
        last: Point,
    },
    /// Corner resize; `anchor` is the opposite corner, which stays put.
    Resize {
        id: ShapeId,
        anchor: Point,
        rotation: f64,
    },
}

/// Selection and drag state machine.
#[derive(Debug, Default)]
pub struct SelectTool {
    drag: Option<Drag>,
    pending_menu: Option<Vec<ShapeId>>,
}

impl SelectTool {
    /// Take the ids a right-click asked to show a context menu for.
    /// Drained by the editor after dispatching the down event.
    pub fn take_menu_request(&mut self) -> Option<Vec<ShapeId>> {
        self.pending_menu.take()
    }

    /// Resize drag for a corner handle under the pointer, when exactly
    /// one resizable shape is selected.
    fn hit_handle(&self, scene: &Scene, pos: Point) -> Option<Drag> {
        let &[id] = scene.selection.as_slice() else {
            return None;
        };
        let shape = scene.get(id)?;
        if !has_resize_handles(shape) {
            return None;
        }
        let corners = corner_handles(shape.bounds());
        let rotation = shape.rotation();
        for (i, corner) in corners.iter().enumerate() {
            if (pos - *corner).hypot() <= HANDLE_TOLERANCE {
                let anchor = corners[(i + 2) % 4];
                return Some(Drag::Resize {
                    id,
                    anchor,
                    rotation,
                });
            }
        }
        None
    }
}

impl ToolHandler for SelectTool {
    fn pointer_down(
        &mut self,
        scene: &mut Scene,
        _ctx: &ToolContext,
        input: &PointerInput,
        pos: Point,
    ) -> bool {
        let hit = scene.top_shape_at(pos, HIT_TOLERANCE);
        // Edit mode survives only a down on the text being edited
        if scene.editing_text != hit {
            scene.editing_text = None;
        }
        if input.button == PointerButton::Left {
            if let Some(resize) = self.hit_handle(scene, pos) {
                self.drag = Some(resize);
                return true;
            }
        }
        let Some(hit) = hit else {
            if !input.modifiers.extends_selection() {
                scene.clear_selection();
            }
            return true;
        };
        if input.button == PointerButton::Right {
            // Menu over the whole selection when the hit is part of it
            let ids = if scene.is_selected(hit) {
                scene.selection.clone()
            } else {
                vec![hit]
            };
            self.pending_menu = Some(ids);
            return true;
        }
        if input.modifiers.extends_selection() {
            scene.toggle_selected(hit);
        } else {
            scene.select_only(hit);
        }
        if scene.is_selected(hit) {
            self.drag = Some(Drag::Move { last: pos });
        }
        true
    }

    fn pointer_move(&mut self, scene: &mut Scene, _input: &PointerInput, pos: Point) {
        match &mut self.drag {
            Some(Drag::Move { last }) => {
                let delta = pos - *last;
                let ids = scene.selection.clone();
                scene.move_shapes(&ids, delta);
                *last = pos;
            }
            Some(Drag::Resize {
                id,
                anchor,
                rotation,
            }) => {
                let width = (pos.x - anchor.x).abs().max(1.0);
                let height = (pos.y - anchor.y).abs().max(1.0);
                let origin = Point::new(anchor.x.min(pos.x), anchor.y.min(pos.y));
                scene.update_frame(*id, origin, width, height, *rotation);
            }
            None => {}
        }
    }

    fn pointer_up(&mut self, _scene: &mut Scene) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{Binding, Line, Rectangle, SerializableColor, Shape};

    fn ctx() -> ToolContext {
        ToolContext {
            stroke_color: SerializableColor::black(),
        }
    }

    fn filled_rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        let mut rect = Rectangle::new(Point::new(x, y), w, h);
        rect.style.fill_color = Some(SerializableColor::white());
        Shape::Rectangle(rect)
    }

    #[test]
    fn test_click_selects_topmost() {
        let mut scene = Scene::new();
        scene.add(filled_rect(0.0, 0.0, 100.0, 100.0));
        let top = scene.add(filled_rect(0.0, 0.0, 100.0, 100.0));
        let mut tool = SelectTool::default();
        tool.pointer_down(
            &mut scene,
            &ctx(),
            &PointerInput::mouse(Point::ZERO),
            Point::new(50.0, 50.0),
        );
        assert_eq!(scene.selection, vec![top]);
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let mut scene = Scene::new();
        let id = scene.add(filled_rect(0.0, 0.0, 10.0, 10.0));
        scene.select_only(id);
        let mut tool = SelectTool::default();
        tool.pointer_down(
            &mut scene,
            &ctx(),
            &PointerInput::mouse(Point::ZERO),
            Point::new(500.0, 500.0),
        );
        assert!(scene.selection.is_empty());
    }

    #[test]
    fn test_modifier_click_toggles_membership() {
        let mut scene = Scene::new();
        let a = scene.add(filled_rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.add(filled_rect(100.0, 0.0, 10.0, 10.0));
        let mut tool = SelectTool::default();
        let shift = PointerInput::mouse(Point::ZERO).with_modifiers(Modifiers {
            shift: true,
            ..Modifiers::default()
        });
        tool.pointer_down(&mut scene, &ctx(), &shift, Point::new(5.0, 5.0));
        tool.pointer_up(&mut scene);
        tool.pointer_down(&mut scene, &ctx(), &shift, Point::new(105.0, 5.0));
        tool.pointer_up(&mut scene);
        assert_eq!(scene.selection, vec![a, b]);
        // Shift-click again removes
        tool.pointer_down(&mut scene, &ctx(), &shift, Point::new(5.0, 5.0));
        tool.pointer_up(&mut scene);
        assert_eq!(scene.selection, vec![b]);
    }

    #[test]
    fn test_right_click_requests_menu() {
        let mut scene = Scene::new();
        let a = scene.add(filled_rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.add(filled_rect(100.0, 0.0, 10.0, 10.0));
        scene.selection = vec![a, b];
        let mut tool = SelectTool::default();
        let right = PointerInput::mouse(Point::ZERO).with_button(PointerButton::Right);

        // Hit inside the selection: menu covers the whole selection
        tool.pointer_down(&mut scene, &ctx(), &right, Point::new(5.0, 5.0));
        assert_eq!(tool.take_menu_request(), Some(vec![a, b]));

        // Hit outside the selection: menu covers just the hit
        scene.selection = vec![b];
        tool.pointer_down(&mut scene, &ctx(), &right, Point::new(5.0, 5.0));
        assert_eq!(tool.take_menu_request(), Some(vec![a]));
        assert!(tool.take_menu_request().is_none());
    }

    #[test]
    fn test_drag_moves_selection_with_bindings() {
        let mut scene = Scene::new();
        let target = scene.add(filled_rect(100.0, 100.0, 50.0, 50.0));
        let mut line = Line::new(Point::ZERO, Point::new(110.0, 110.0));
        line.binding = Some(Binding {
            anchor: line.end,
            target,
        });
        let line_id = scene.add(Shape::Line(line));

        let mut tool = SelectTool::default();
        let input = PointerInput::mouse(Point::ZERO);
        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(120.0, 120.0));
        tool.pointer_move(&mut scene, &input, Point::new(130.0, 115.0));
        tool.pointer_up(&mut scene);

        let rect_bounds = scene.get(target).map(|s| s.bounds()).unwrap();
        assert!((rect_bounds.x0 - 110.0).abs() < f64::EPSILON);
        assert!((rect_bounds.y0 - 95.0).abs() < f64::EPSILON);
        let Some(Shape::Line(line)) = scene.get(line_id) else {
            panic!("line missing");
        };
        assert!((line.end - Point::new(120.0, 105.0)).hypot() < 1e-9);
        assert_eq!(line.binding.as_ref().map(|b| b.anchor), Some(line.end));
    }

    #[test]
    fn test_corner_drag_resizes_lone_selection() {
        let mut scene = Scene::new();
        let id = scene.add(filled_rect(10.0, 10.0, 50.0, 40.0));
        scene.select_only(id);
        let mut tool = SelectTool::default();
        let input = PointerInput::mouse(Point::ZERO);

        // Grab the bottom-right handle and drag outward
        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(60.0, 50.0));
        tool.pointer_move(&mut scene, &input, Point::new(90.0, 80.0));
        tool.pointer_up(&mut scene);

        let bounds = scene.get(id).map(|s| s.bounds()).unwrap();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 90.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_drag_past_anchor_keeps_minimum_size() {
        let mut scene = Scene::new();
        let id = scene.add(filled_rect(10.0, 10.0, 50.0, 40.0));
        scene.select_only(id);
        let mut tool = SelectTool::default();
        let input = PointerInput::mouse(Point::ZERO);

        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(60.0, 50.0));
        tool.pointer_move(&mut scene, &input, Point::new(10.0, 10.0));
        tool.pointer_up(&mut scene);

        let bounds = scene.get(id).map(|s| s.bounds()).unwrap();
        assert!((bounds.width() - 1.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_handles_absent_with_multi_selection() {
        let mut scene = Scene::new();
        let a = scene.add(filled_rect(10.0, 10.0, 50.0, 40.0));
        let b = scene.add(filled_rect(200.0, 10.0, 50.0, 40.0));
        scene.selection = vec![a, b];
        let mut tool = SelectTool::default();
        let input = PointerInput::mouse(Point::ZERO);

        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(60.0, 50.0));
        tool.pointer_move(&mut scene, &input, Point::new(90.0, 80.0));
        tool.pointer_up(&mut scene);

        // The shape may move but never changes size
        let bounds = scene.get(a).map(|s| s.bounds()).unwrap();
        assert!((bounds.width() - 50.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_propagates_to_bound_connector() {
        let mut scene = Scene::new();
        let target = scene.add(filled_rect(100.0, 100.0, 50.0, 50.0));
        let mut line = Line::new(Point::ZERO, Point::new(110.0, 110.0));
        line.binding = Some(Binding {
            anchor: line.end,
            target,
        });
        let line_id = scene.add(Shape::Line(line));
        scene.select_only(target);

        let mut tool = SelectTool::default();
        let input = PointerInput::mouse(Point::ZERO);
        // Drag the top-left handle; the frame origin moves by (-20, -10)
        tool.pointer_down(&mut scene, &ctx(), &input, Point::new(100.0, 100.0));
        tool.pointer_move(&mut scene, &input, Point::new(80.0, 90.0));
        tool.pointer_up(&mut scene);

        let Some(Shape::Line(line)) = scene.get(line_id) else {
            panic!("line missing");
        };
        assert!((line.end - Point::new(90.0, 100.0)).hypot() < 1e-9);
        assert_eq!(line.binding.as_ref().map(|b| b.anchor), Some(line.end));
    }

    #[test]
    fn test_click_on_edited_text_keeps_edit_mode() {
        let mut scene = Scene::new();
        let id = scene.add(filled_rect(0.0, 0.0, 100.0, 100.0));
        scene.editing_text = Some(id);
        let mut tool = SelectTool::default();
        tool.pointer_down(
            &mut scene,
            &ctx(),
            &PointerInput::mouse(Point::ZERO),
            Point::new(50.0, 50.0),
        );
        assert_eq!(scene.editing_text, Some(id));
    }

    #[test]
    fn test_click_closes_text_editing() {
        let mut scene = Scene::new();
        let id = scene.add(filled_rect(0.0, 0.0, 10.0, 10.0));
        scene.editing_text = Some(id);
        let mut tool = SelectTool::default();
        tool.pointer_down(
            &mut scene,
            &ctx(),
            &PointerInput::mouse(Point::ZERO),
            Point::new(500.0, 500.0),
        );
        assert!(scene.editing_text.is_none());
    }
}
