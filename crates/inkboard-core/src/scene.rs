//! Scene store: the ordered shape list plus selection and edit state.

use crate::shapes::{GroupId, Shape, ShapeId};
use kurbo::{Point, Vec2};
use uuid::Uuid;

/// Hit-test tolerance in world units.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Offset applied to duplicated shapes.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// The scene holds all shapes in z-order (index 0 is bottom-most),
/// the current selection, and which text shape is being edited.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
    /// Selected shape ids, in selection order.
    pub selection: Vec<ShapeId>,
    /// Text shape currently in edit mode.
    pub editing_text: Option<ShapeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes in z-order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Add a shape on top of the stack, returning its id.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Apply a mutation to the shape with the given id.
    /// Returns false (and does nothing) when the id is absent.
    pub fn patch<F: FnOnce(&mut Shape)>(&mut self, id: ShapeId, f: F) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                f(shape);
                true
            }
            None => false,
        }
    }

    /// Remove the listed shapes. Bindings that targeted a removed shape
    /// are left in place; they are inert until the id reappears.
    pub fn remove_ids(&mut self, ids: &[ShapeId]) {
        self.shapes.retain(|s| !ids.contains(&s.id()));
        self.selection.retain(|id| !ids.contains(id));
        if let Some(editing) = self.editing_text {
            if ids.contains(&editing) {
                self.editing_text = None;
            }
        }
    }

    /// Replace the entire shape list (undo/redo restore path).
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        let ids: Vec<ShapeId> = self.shapes.iter().map(|s| s.id()).collect();
        self.selection.retain(|id| ids.contains(id));
        if let Some(editing) = self.editing_text {
            if !ids.contains(&editing) {
                self.editing_text = None;
            }
        }
    }

    /// Whole-list copy for history snapshots.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.clone()
    }

    /// Topmost shape whose hit test passes at the given point.
    pub fn top_shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(|s| s.id())
    }

    /// First bindable shape (in list order) whose bounding box contains
    /// the point. Connectors bind to rectangles, diamonds, and ellipses.
    pub fn bind_target_at(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .find(|s| s.is_bind_target() && s.bounds().contains(point))
            .map(|s| s.id())
    }

    /// Translate the listed shapes by a delta, then drag along the bound
    /// endpoint of every connector (outside the moved set) whose binding
    /// targets a moved shape.
    pub fn move_shapes(&mut self, ids: &[ShapeId], delta: Vec2) {
        if delta == Vec2::ZERO || ids.is_empty() {
            return;
        }
        for shape in &mut self.shapes {
            if ids.contains(&shape.id()) {
                shape.translate(delta);
            }
        }
        for shape in &mut self.shapes {
            if ids.contains(&shape.id()) {
                continue;
            }
            let bound_to_moved = shape
                .binding()
                .is_some_and(|b| ids.contains(&b.target));
            if bound_to_moved {
                shape.follow_binding(delta);
            }
        }
    }

    /// Move/resize a shape to a new frame (transform-handle path).
    /// Connectors bound to it follow the positional delta of its anchor.
    pub fn update_frame(
        &mut self,
        id: ShapeId,
        origin: Point,
        width: f64,
        height: f64,
        rotation: f64,
    ) {
        let delta = {
            let Some(shape) = self.get_mut(id) else {
                return;
            };
            let delta = origin - shape.bounds().origin();
            match shape {
                Shape::Rectangle(r) => {
                    r.origin = origin;
                    r.width = width;
                    r.height = height;
                    r.rotation = rotation;
                }
                Shape::Diamond(d) => {
                    d.origin = origin;
                    d.width = width;
                    d.height = height;
                    d.rotation = rotation;
                }
                Shape::Ellipse(e) => {
                    e.origin = origin;
                    e.width = width;
                    e.height = height;
                    e.rotation = rotation;
                }
                Shape::Image(i) => {
                    i.position = origin;
                    i.width = width;
                    i.height = height;
                    i.rotation = rotation;
                }
                Shape::Text(t) => {
                    t.position = origin;
                    t.rotation = rotation;
                }
                other => other.translate(delta),
            }
            delta
        };
        for shape in &mut self.shapes {
            if shape.id() == id {
                continue;
            }
            if shape.binding().is_some_and(|b| b.target == id) {
                shape.follow_binding(delta);
            }
        }
    }

    /// Clone the listed shapes with fresh ids and a small offset,
    /// returning the new ids in list order.
    pub fn duplicate(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let mut clones: Vec<Shape> = self
            .shapes
            .iter()
            .filter(|s| ids.contains(&s.id()))
            .cloned()
            .collect();
        let mut new_ids = Vec::with_capacity(clones.len());
        for clone in &mut clones {
            clone.regenerate_id();
            clone.translate(DUPLICATE_OFFSET);
            new_ids.push(clone.id());
        }
        self.shapes.extend(clones);
        new_ids
    }

    /// Tag the listed shapes with a shared fresh group id.
    /// Requires at least two shapes; returns the new group id.
    pub fn group(&mut self, ids: &[ShapeId]) -> Option<GroupId> {
        if ids.len() < 2 {
            return None;
        }
        let group = Uuid::new_v4();
        for shape in &mut self.shapes {
            if ids.contains(&shape.id()) {
                shape.set_group(Some(group));
            }
        }
        Some(group)
    }

    /// Clear the group tag from the listed shapes.
    pub fn ungroup(&mut self, ids: &[ShapeId]) {
        for shape in &mut self.shapes {
            if ids.contains(&shape.id()) {
                shape.set_group(None);
            }
        }
    }

    /// All shapes sharing a group with the given shape (including it).
    pub fn group_members(&self, id: ShapeId) -> Vec<ShapeId> {
        let Some(group) = self.get(id).and_then(|s| s.group()) else {
            return vec![id];
        };
        self.shapes
            .iter()
            .filter(|s| s.group() == Some(group))
            .map(|s| s.id())
            .collect()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Replace the selection with a single shape.
    pub fn select_only(&mut self, id: ShapeId) {
        self.selection.clear();
        self.selection.push(id);
    }

    /// Toggle a shape's selection membership (modifier-click).
    pub fn toggle_selected(&mut self, id: ShapeId) {
        if let Some(pos) = self.selection.iter().position(|s| *s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arrow, Binding, Line, Rectangle, Shape};

    fn rect_at(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h))
    }

    #[test]
    fn test_top_shape_at_prefers_topmost() {
        let mut scene = Scene::new();
        let mut bottom = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        bottom.style.fill_color = Some(crate::shapes::SerializableColor::white());
        let mut top = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        top.style.fill_color = Some(crate::shapes::SerializableColor::black());
        let bottom_id = scene.add(Shape::Rectangle(bottom));
        let top_id = scene.add(Shape::Rectangle(top));
        assert_ne!(bottom_id, top_id);
        assert_eq!(
            scene.top_shape_at(Point::new(50.0, 50.0), HIT_TOLERANCE),
            Some(top_id)
        );
    }

    #[test]
    fn test_bind_target_first_in_list_order() {
        let mut scene = Scene::new();
        let first = scene.add(rect_at(0.0, 0.0, 100.0, 100.0));
        let _second = scene.add(rect_at(0.0, 0.0, 100.0, 100.0));
        assert_eq!(scene.bind_target_at(Point::new(50.0, 50.0)), Some(first));
    }

    #[test]
    fn test_bind_target_skips_lines() {
        let mut scene = Scene::new();
        scene.add(Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
        )));
        assert_eq!(scene.bind_target_at(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_move_shapes_propagates_to_bound_connector() {
        let mut scene = Scene::new();
        let target = scene.add(rect_at(100.0, 100.0, 50.0, 50.0));
        let mut arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(110.0, 110.0));
        arrow.binding = Some(Binding {
            anchor: arrow.end,
            target,
        });
        let arrow_id = scene.add(Shape::Arrow(arrow));

        scene.move_shapes(&[target], Vec2::new(30.0, -20.0));

        let Some(Shape::Arrow(moved)) = scene.get(arrow_id) else {
            panic!("arrow missing");
        };
        assert!((moved.end.x - 140.0).abs() < f64::EPSILON);
        assert!((moved.end.y - 90.0).abs() < f64::EPSILON);
        assert_eq!(moved.binding.as_ref().map(|b| b.anchor), Some(moved.end));
        // Tail untouched
        assert!((moved.start.x - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_move_shapes_skips_connector_in_moved_set() {
        let mut scene = Scene::new();
        let target = scene.add(rect_at(100.0, 100.0, 50.0, 50.0));
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(110.0, 110.0));
        line.binding = Some(Binding {
            anchor: line.end,
            target,
        });
        let line_id = scene.add(Shape::Line(line));

        // Both move together: the endpoint translates once, not twice.
        scene.move_shapes(&[target, line_id], Vec2::new(10.0, 0.0));

        let Some(Shape::Line(moved)) = scene.get(line_id) else {
            panic!("line missing");
        };
        assert!((moved.end.x - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dangling_binding_is_inert() {
        let mut scene = Scene::new();
        let target = scene.add(rect_at(0.0, 0.0, 50.0, 50.0));
        let mut arrow = Arrow::new(Point::new(100.0, 100.0), Point::new(25.0, 25.0));
        arrow.binding = Some(Binding {
            anchor: arrow.end,
            target,
        });
        let arrow_id = scene.add(Shape::Arrow(arrow));

        scene.remove_ids(&[target]);
        assert!(scene.get(target).is_none());
        // The binding survives deletion but moving anything is safe.
        let other = scene.add(rect_at(200.0, 200.0, 10.0, 10.0));
        scene.move_shapes(&[other], Vec2::new(5.0, 5.0));
        let Some(Shape::Arrow(arrow)) = scene.get(arrow_id) else {
            panic!("arrow missing");
        };
        assert!(arrow.binding.is_some());
        assert!((arrow.end.x - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_fresh_ids_and_offset() {
        let mut scene = Scene::new();
        let original = scene.add(rect_at(10.0, 10.0, 20.0, 20.0));
        let new_ids = scene.duplicate(&[original]);
        assert_eq!(new_ids.len(), 1);
        assert_ne!(new_ids[0], original);
        let clone = scene.get(new_ids[0]).map(|s| s.bounds());
        assert!((clone.map(|b| b.x0).unwrap_or(0.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_requires_two() {
        let mut scene = Scene::new();
        let a = scene.add(rect_at(0.0, 0.0, 10.0, 10.0));
        assert!(scene.group(&[a]).is_none());
        let b = scene.add(rect_at(20.0, 0.0, 10.0, 10.0));
        let group = scene.group(&[a, b]);
        assert!(group.is_some());
        assert_eq!(scene.group_members(a).len(), 2);
        scene.ungroup(&[a, b]);
        assert_eq!(scene.group_members(a), vec![a]);
    }

    #[test]
    fn test_update_frame_propagates() {
        let mut scene = Scene::new();
        let target = scene.add(rect_at(0.0, 0.0, 50.0, 50.0));
        let mut arrow = Arrow::new(Point::new(-50.0, 0.0), Point::new(10.0, 10.0));
        arrow.binding = Some(Binding {
            anchor: arrow.end,
            target,
        });
        let arrow_id = scene.add(Shape::Arrow(arrow));

        scene.update_frame(target, Point::new(20.0, 5.0), 80.0, 40.0, 0.0);

        let Some(Shape::Arrow(moved)) = scene.get(arrow_id) else {
            panic!("arrow missing");
        };
        assert!((moved.end.x - 30.0).abs() < f64::EPSILON);
        assert!((moved.end.y - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_ids_clears_selection_and_edit() {
        let mut scene = Scene::new();
        let id = scene.add(rect_at(0.0, 0.0, 10.0, 10.0));
        scene.select_only(id);
        scene.editing_text = Some(id);
        scene.remove_ids(&[id]);
        assert!(scene.selection.is_empty());
        assert!(scene.editing_text.is_none());
    }
}
