//! Text placement tool.

use super::{ToolContext, ToolHandler};
use crate::input::PointerInput;
use crate::scene::Scene;
use crate::shapes::{Shape, Text};
use kurbo::Point;

/// Places an empty text record and opens it for editing.
#[derive(Debug, Default)]
pub struct TextTool;

impl ToolHandler for TextTool {
    fn pointer_down(
        &mut self,
        scene: &mut Scene,
        ctx: &ToolContext,
        _input: &PointerInput,
        pos: Point,
    ) -> bool {
        let mut text = Text::new(pos);
        text.style.stroke_color = ctx.stroke_color;
        let id = scene.add(Shape::Text(text));
        scene.editing_text = Some(id);
        true
    }

    fn pointer_move(&mut self, _scene: &mut Scene, _input: &PointerInput, _pos: Point) {}

    fn pointer_up(&mut self, _scene: &mut Scene) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{SerializableColor, ShapeTrait};

    #[test]
    fn test_placed_text_enters_edit_mode() {
        let mut scene = Scene::new();
        let mut tool = TextTool;
        let ctx = ToolContext {
            stroke_color: SerializableColor::new(10, 20, 30, 255),
        };
        let handled = tool.pointer_down(
            &mut scene,
            &ctx,
            &PointerInput::mouse(Point::ZERO),
            Point::new(40.0, 50.0),
        );
        assert!(handled);
        assert_eq!(scene.len(), 1);
        let Shape::Text(text) = &scene.shapes()[0] else {
            panic!("expected text");
        };
        assert!(text.content.is_empty());
        assert_eq!(scene.editing_text, Some(text.id()));
        assert_eq!(text.style.stroke_color, ctx.stroke_color);
    }
}
