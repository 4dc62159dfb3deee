//! Drawing tools and their pointer state machines.

mod boxes;
mod segment;
mod select;
mod stroke;
mod text;

pub use boxes::{BoxKind, BoxTool};
pub use segment::{SegmentKind, SegmentTool};
pub use select::{corner_handles, has_resize_handles, SelectTool};
pub use stroke::{StrokeKind, StrokeTool};
pub use text::TextTool;

use crate::input::PointerInput;
use crate::scene::Scene;
use crate::shapes::SerializableColor;
use kurbo::Point;

/// The available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    Hand,
    #[default]
    Select,
    Rectangle,
    Diamond,
    Ellipse,
    Arrow,
    Line,
    Freehand,
    Text,
    Eraser,
    Image,
}

impl ToolKind {
    /// Map a single-key shortcut to a tool.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'h' => Some(Self::Hand),
            'v' | '1' => Some(Self::Select),
            'r' | '2' => Some(Self::Rectangle),
            'd' => Some(Self::Diamond),
            'o' => Some(Self::Ellipse),
            'l' | 'a' => Some(Self::Arrow),
            'p' | '/' => Some(Self::Line),
            'x' => Some(Self::Freehand),
            't' => Some(Self::Text),
            'e' => Some(Self::Eraser),
            _ => None,
        }
    }

    /// Display name for the toolbar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hand => "Hand",
            Self::Select => "Select",
            Self::Rectangle => "Rectangle",
            Self::Diamond => "Diamond",
            Self::Ellipse => "Ellipse",
            Self::Arrow => "Arrow",
            Self::Line => "Line",
            Self::Freehand => "Pen",
            Self::Text => "Text",
            Self::Eraser => "Eraser",
            Self::Image => "Image",
        }
    }
}

/// Editor-level state a tool needs when creating shapes.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext {
    /// Current stroke color from the toolbar.
    pub stroke_color: SerializableColor,
}

/// Pointer contract shared by all tools. Positions are in world
/// coordinates; the raw input carries device and modifier state.
pub trait ToolHandler {
    /// Handle a pointer down. Returns whether the tool started a gesture.
    fn pointer_down(
        &mut self,
        scene: &mut Scene,
        ctx: &ToolContext,
        input: &PointerInput,
        pos: Point,
    ) -> bool;

    /// Handle a pointer move during a gesture.
    fn pointer_move(&mut self, scene: &mut Scene, input: &PointerInput, pos: Point);

    /// Handle a pointer up, ending the gesture.
    fn pointer_up(&mut self, scene: &mut Scene);
}

/// Stroke width from pointer pressure. Pens get a pressure-scaled width,
/// everything else draws at the base width.
pub(crate) fn pressure_stroke_width(input: &PointerInput, multiplier: f64) -> f64 {
    if input.is_pen() {
        let pressure = if input.pressure > 0.0 {
            input.pressure
        } else {
            0.5
        };
        2.0 + pressure * multiplier
    } else {
        2.0
    }
}

/// One live instance per tool so in-progress gesture state survives
/// between events.
#[derive(Debug, Default)]
pub struct ToolSet {
    pub select: SelectTool,
    freehand: StrokeTool,
    eraser: StrokeTool,
    rectangle: BoxTool,
    diamond: BoxTool,
    ellipse: BoxTool,
    arrow: SegmentTool,
    line: SegmentTool,
    text: TextTool,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            select: SelectTool::default(),
            freehand: StrokeTool::new(StrokeKind::Freehand),
            eraser: StrokeTool::new(StrokeKind::Eraser),
            rectangle: BoxTool::new(BoxKind::Rectangle),
            diamond: BoxTool::new(BoxKind::Diamond),
            ellipse: BoxTool::new(BoxKind::Ellipse),
            arrow: SegmentTool::new(SegmentKind::Arrow),
            line: SegmentTool::new(SegmentKind::Line),
            text: TextTool::default(),
        }
    }

    /// The handler for a tool kind. Hand and Image have no pointer
    /// handler; the editor pans the camera and inserts images itself.
    pub fn handler_mut(&mut self, kind: ToolKind) -> Option<&mut dyn ToolHandler> {
        match kind {
            ToolKind::Select => Some(&mut self.select),
            ToolKind::Freehand => Some(&mut self.freehand),
            ToolKind::Eraser => Some(&mut self.eraser),
            ToolKind::Rectangle => Some(&mut self.rectangle),
            ToolKind::Diamond => Some(&mut self.diamond),
            ToolKind::Ellipse => Some(&mut self.ellipse),
            ToolKind::Arrow => Some(&mut self.arrow),
            ToolKind::Line => Some(&mut self.line),
            ToolKind::Text => Some(&mut self.text),
            ToolKind::Hand | ToolKind::Image => None,
        }
    }
}
