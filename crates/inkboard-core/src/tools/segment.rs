//! Line and arrow tools with angle snapping and connector binding.

use super::{pressure_stroke_width, ToolContext, ToolHandler};
use crate::input::PointerInput;
use crate::scene::Scene;
use crate::shapes::{Arrow, Binding, Line, Shape, ShapeId};
use kurbo::{Point, Vec2};
use std::f64::consts::FRAC_PI_4;

/// Which segment shape the tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentKind {
    #[default]
    Line,
    Arrow,
}

impl SegmentKind {
    fn create(&self, start: Point) -> Shape {
        match self {
            SegmentKind::Line => Shape::Line(Line::new(start, start)),
            SegmentKind::Arrow => Shape::Arrow(Arrow::new(start, start)),
        }
    }
}

/// Snap an endpoint to the nearest 45-degree ray from `start`,
/// preserving the drag length.
fn snap_endpoint(start: Point, end: Point) -> Point {
    let d = end - start;
    let len = d.hypot();
    if len < f64::EPSILON {
        return end;
    }
    let snapped = (d.y.atan2(d.x) / FRAC_PI_4).round() * FRAC_PI_4;
    start + Vec2::new(snapped.cos(), snapped.sin()) * len
}

/// Drag state: the segment being drawn and its start point.
#[derive(Debug, Default)]
pub struct SegmentTool {
    kind: SegmentKind,
    active: Option<(ShapeId, Point)>,
}

impl SegmentTool {
    pub fn new(kind: SegmentKind) -> Self {
        Self { kind, active: None }
    }
}

impl ToolHandler for SegmentTool {
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
        let Some((id, start)) = self.active else {
            return;
        };
        let end = if input.modifiers.shift {
            snap_endpoint(start, pos)
        } else {
            pos
        };
        // Binding is tested at the raw pointer position, not the snapped
        // endpoint, and re-evaluated on every move.
        let binding = scene
            .bind_target_at(pos)
            .map(|target| Binding { anchor: end, target });
        scene.patch(id, |shape| match shape {
            Shape::Line(line) => {
                line.end = end;
                line.binding = binding;
            }
            Shape::Arrow(arrow) => {
                arrow.end = end;
                arrow.binding = binding;
            }
            _ => {}
        });
    }

    fn pointer_up(&mut self, _scene: &mut Scene) {
        self.active = None;
    }
}
