//! Editor: routes filtered pointer events to tools, owns history and
//! camera, and executes context-menu batch actions.

use crate::camera::Camera;
use crate::history::HistoryLog;
use crate::input::{Modifiers, PointerGate, PointerInput};
use crate::scene::Scene;
use crate::shapes::{Image, ImageFormat, SerializableColor, Shape, ShapeId};
use crate::throttle::{Clock, MonotonicClock, MoveThrottle};
use crate::tools::{ToolContext, ToolKind, ToolSet};
use kurbo::Point;

/// Corner-radius increment for the context-menu action.
pub const CORNER_RADIUS_STEP: f64 = 5.0;

/// Screen position where inserted images land.
pub const IMAGE_INSERT_POS: Point = Point::new(100.0, 100.0);

/// An open context menu: where to draw it and which shapes it acts on.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    /// Screen position of the triggering right-click.
    pub position: Point,
    /// Shapes the menu actions apply to.
    pub ids: Vec<ShapeId>,
}

/// Top-level editor state.
pub struct Editor {
    pub scene: Scene,
    pub history: HistoryLog,
    pub camera: Camera,
    pub active_tool: ToolKind,
    pub stroke_color: SerializableColor,
    pub context_menu: Option<ContextMenu>,
    tools: ToolSet,
    gate: PointerGate,
    throttle: MoveThrottle,
    clock: Box<dyn Clock>,
    gesture_active: bool,
    pan_last: Option<Point>,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_clock(Box::new(MonotonicClock::new()))
    }

    /// Build with an injected clock (tests drive throttling manually).
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            scene: Scene::new(),
            history: HistoryLog::new(),
            camera: Camera::new(),
            active_tool: ToolKind::default(),
            stroke_color: SerializableColor::black(),
            context_menu: None,
            tools: ToolSet::new(),
            gate: PointerGate::new(),
            throttle: MoveThrottle::default(),
            clock,
            gesture_active: false,
            pan_last: None,
        }
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.active_tool != kind {
            log::debug!("tool switched to {:?}", kind);
        }
        self.active_tool = kind;
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.stroke_color = color;
    }

    /// Route a pointer-down through the admission gate to the active
    /// tool. Events without a position are no-ops.
    pub fn pointer_down(&mut self, input: &PointerInput) {
        let Some(screen) = input.position else {
            return;
        };
        if !self.gate.admit_down(input) {
            return;
        }
        self.context_menu = None;
        if self.active_tool == ToolKind::Hand {
            self.pan_last = Some(screen);
            self.gesture_active = false;
            return;
        }
        let world = self.camera.screen_to_world(screen);
        let ctx = ToolContext {
            stroke_color: self.stroke_color,
        };
        let handled = match self.tools.handler_mut(self.active_tool) {
            Some(tool) => tool.pointer_down(&mut self.scene, &ctx, input, world),
            None => false,
        };
        self.gesture_active = handled;
        if self.active_tool == ToolKind::Select {
            if let Some(ids) = self.tools.select.take_menu_request() {
                self.context_menu = Some(ContextMenu {
                    position: screen,
                    ids,
                });
                // Opening a menu is not an edit
                self.gesture_active = false;
            }
        }
    }

    /// Route a pointer-move: panning for the hand tool, otherwise gate,
    /// throttle (pens bypass), then the active tool.
    pub fn pointer_move(&mut self, input: &PointerInput) {
        let Some(screen) = input.position else {
            return;
        };
        if self.active_tool == ToolKind::Hand {
            if let Some(last) = self.pan_last {
                self.camera.pan(screen - last);
                self.pan_last = Some(screen);
            }
            return;
        }
        if !self.gate.admit_move(input) {
            return;
        }
        if !self.throttle.admit(self.clock.as_ref(), input.is_pen()) {
            return;
        }
        let world = self.camera.screen_to_world(screen);
        if let Some(tool) = self.tools.handler_mut(self.active_tool) {
            tool.pointer_move(&mut self.scene, input, world);
        }
    }

    /// End the gesture: release capture, notify the tool, and record a
    /// history snapshot when the gesture edited the scene.
    pub fn pointer_up(&mut self, input: &PointerInput) {
        if !self.gate.release(input) {
            return;
        }
        self.pan_last = None;
        self.throttle.reset();
        if let Some(tool) = self.tools.handler_mut(self.active_tool) {
            tool.pointer_up(&mut self.scene);
        }
        if self.gesture_active && !self.scene.is_empty() {
            self.history.record(self.scene.snapshot());
        }
        self.gesture_active = false;
    }

    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.scene.replace_all(snapshot);
        }
    }

    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.scene.replace_all(snapshot);
        }
    }

    /// Handle a character key. Returns whether the key was consumed.
    /// Tool shortcuts are suppressed while a text shape is being edited.
    pub fn handle_key(&mut self, key: char, modifiers: Modifiers) -> bool {
        if modifiers.ctrl {
            return match key.to_ascii_lowercase() {
                'z' if modifiers.shift => {
                    self.redo();
                    true
                }
                'z' => {
                    self.undo();
                    true
                }
                'y' => {
                    self.redo();
                    true
                }
                _ => false,
            };
        }
        if self.scene.editing_text.is_some() {
            return false;
        }
        match ToolKind::from_key(key) {
            Some(kind) => {
                self.set_tool(kind);
                true
            }
            None => false,
        }
    }

    /// Delete the current selection (Delete/Backspace).
    pub fn delete_selection(&mut self) {
        let ids = self.scene.selection.clone();
        if ids.is_empty() {
            return;
        }
        self.scene.remove_ids(&ids);
        self.history.record(self.scene.snapshot());
    }

    /// Replace the content of a text shape while it is being edited.
    /// No history entry; `finish_text_editing` records one.
    pub fn update_text(&mut self, id: ShapeId, content: String) {
        self.scene.patch(id, |shape| {
            if let Shape::Text(text) = shape {
                text.content = content;
            }
        });
    }

    /// Leave text edit mode and record the edit.
    pub fn finish_text_editing(&mut self) {
        if self.scene.editing_text.take().is_some() {
            self.history.record(self.scene.snapshot());
        }
    }

    /// Insert an image near the top-left of the view at its natural
    /// pixel size, scaled down by the current zoom.
    pub fn insert_image(
        &mut self,
        bytes: &[u8],
        format: ImageFormat,
        natural_width: u32,
        natural_height: u32,
    ) -> ShapeId {
        let position = self.camera.screen_to_world(IMAGE_INSERT_POS);
        let mut image = Image::from_bytes(position, bytes, format, natural_width, natural_height);
        image.width = natural_width as f64 / self.camera.zoom;
        image.height = natural_height as f64 / self.camera.zoom;
        log::info!(
            "inserted {}x{} image at ({:.1}, {:.1})",
            natural_width,
            natural_height,
            position.x,
            position.y
        );
        let id = self.scene.add(Shape::Image(image));
        self.history.record(self.scene.snapshot());
        id
    }

    // --- context-menu actions ---

    fn take_menu_ids(&mut self) -> Vec<ShapeId> {
        self.context_menu.take().map(|m| m.ids).unwrap_or_default()
    }

    fn record_edit(&mut self) {
        self.history.record(self.scene.snapshot());
    }

    /// Recolor the fill of the menu shapes to light gray.
    pub fn menu_recolor_fill(&mut self) {
        let ids = self.take_menu_ids();
        for id in &ids {
            self.scene.patch(*id, |shape| {
                shape.style_mut().fill_color = Some(SerializableColor::light_gray());
            });
        }
        if !ids.is_empty() {
            self.record_edit();
        }
    }

    /// Duplicate the menu shapes with fresh ids and a small offset.
    pub fn menu_duplicate(&mut self) {
        let ids = self.take_menu_ids();
        if ids.is_empty() {
            return;
        }
        self.scene.duplicate(&ids);
        self.record_edit();
    }

    /// Delete the menu shapes. Bindings that targeted them go stale.
    pub fn menu_delete(&mut self) {
        let ids = self.take_menu_ids();
        if ids.is_empty() {
            return;
        }
        self.scene.remove_ids(&ids);
        self.record_edit();
    }

    /// Tag the menu shapes with a shared group id (two or more shapes).
    pub fn menu_group(&mut self) {
        let ids = self.take_menu_ids();
        if self.scene.group(&ids).is_some() {
            self.record_edit();
        }
    }

    /// Clear the group tag from the menu shapes.
    pub fn menu_ungroup(&mut self) {
        let ids = self.take_menu_ids();
        if ids.is_empty() {
            return;
        }
        self.scene.ungroup(&ids);
        self.record_edit();
    }

    /// Grow the corner radius of a single selected rectangle.
    pub fn menu_increase_corner_radius(&mut self) {
        let ids = self.take_menu_ids();
        let [id] = ids[..] else {
            return;
        };
        let patched = self.scene.patch(id, |shape| {
            if let Shape::Rectangle(rect) = shape {
                rect.corner_radius += CORNER_RADIUS_STEP;
            }
        });
        if patched {
            self.record_edit();
        }
    }

    /// Swap the content of a single selected image.
    pub fn menu_replace_image(
        &mut self,
        bytes: &[u8],
        format: ImageFormat,
        natural_width: u32,
        natural_height: u32,
    ) {
        let ids = self.take_menu_ids();
        let [id] = ids[..] else {
            return;
        };
        let patched = self.scene.patch(id, |shape| {
            if let Shape::Image(image) = shape {
                image.replace_content(bytes, format, natural_width, natural_height);
            }
        });
        if patched {
            self.record_edit();
        }
    }

    /// Whether the open menu covers exactly one rectangle (enables the
    /// corner-radius action).
    pub fn menu_single_rectangle(&self) -> bool {
        self.single_menu_shape()
            .is_some_and(|s| matches!(s, Shape::Rectangle(_)))
    }

    /// Whether the open menu covers exactly one image (enables the
    /// replace-image action).
    pub fn menu_single_image(&self) -> bool {
        self.single_menu_shape().is_some_and(|s| s.is_image())
    }

    /// Whether the open menu covers enough shapes to group.
    pub fn menu_can_group(&self) -> bool {
        self.context_menu
            .as_ref()
            .is_some_and(|m| m.ids.len() >= 2)
    }

    fn single_menu_shape(&self) -> Option<&Shape> {
        let menu = self.context_menu.as_ref()?;
        let [id] = menu.ids[..] else {
            return None;
        };
        self.scene.get(id)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
