//! UI chrome using egui: toolbar, context menu, and the text overlay.

use egui::{Color32, Context, Pos2, Vec2};
use inkboard_core::shapes::ShapeId;
use inkboard_core::{Editor, Shape, ToolKind};

/// Toolbar color palette.
const PALETTE: &[(Color32, &str)] = &[
    (Color32::BLACK, "Black"),
    (Color32::from_rgb(0xef, 0x44, 0x44), "Red"),
    (Color32::from_rgb(0x3b, 0x82, 0xf6), "Blue"),
    (Color32::from_rgb(0x22, 0xc5, 0x5e), "Green"),
    (Color32::from_rgb(0xf5, 0x9e, 0x0b), "Orange"),
];

const TOOLS: &[ToolKind] = &[
    ToolKind::Select,
    ToolKind::Hand,
    ToolKind::Rectangle,
    ToolKind::Diamond,
    ToolKind::Ellipse,
    ToolKind::Arrow,
    ToolKind::Line,
    ToolKind::Freehand,
    ToolKind::Text,
    ToolKind::Eraser,
    ToolKind::Image,
];

/// Actions emitted by the chrome, applied to the editor after the UI pass.
#[derive(Debug, Clone)]
pub enum UiAction {
    SelectTool(ToolKind),
    SetStrokeColor(Color32),
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    MenuRecolorFill,
    MenuDuplicate,
    MenuDelete,
    MenuGroup,
    MenuUngroup,
    MenuIncreaseCornerRadius,
    MenuReplaceImage,
    CloseMenu,
    TextChanged(String),
    TextCommitted,
}

/// Chrome state that is not derivable from the editor.
pub struct UiState {
    /// Current stroke color swatch.
    pub stroke_color: Color32,
    /// Working buffer for the text overlay.
    pub text_buffer: String,
    /// Shape the buffer mirrors; resynced when editing moves on.
    text_shape: Option<ShapeId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            text_buffer: String::new(),
            text_shape: None,
        }
    }
}

/// Render all chrome for one frame and collect the resulting actions.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, editor: &Editor) -> Vec<UiAction> {
    let mut actions = Vec::new();

    render_toolbar(ctx, ui_state, editor, &mut actions);
    render_context_menu(ctx, editor, &mut actions);
    render_text_overlay(ctx, ui_state, editor, &mut actions);

    actions
}

fn render_toolbar(
    ctx: &Context,
    ui_state: &mut UiState,
    editor: &Editor,
    actions: &mut Vec<UiAction>,
) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for &tool in TOOLS {
                let selected = editor.active_tool == tool;
                if ui.selectable_label(selected, tool.label()).clicked() {
                    actions.push(UiAction::SelectTool(tool));
                }
            }

            ui.separator();

            for &(color, name) in PALETTE {
                let selected = ui_state.stroke_color == color;
                let size = Vec2::splat(18.0);
                let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
                ui.painter().rect_filled(rect, 3.0, color);
                if selected {
                    ui.painter().rect_stroke(
                        rect.expand(2.0),
                        4.0,
                        egui::Stroke::new(2.0, ui.visuals().selection.stroke.color),
                        egui::StrokeKind::Outside,
                    );
                }
                if response.on_hover_text(name).clicked() {
                    ui_state.stroke_color = color;
                    actions.push(UiAction::SetStrokeColor(color));
                }
            }

            ui.separator();

            if ui
                .add_enabled(editor.history.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                actions.push(UiAction::Undo);
            }
            if ui
                .add_enabled(editor.history.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                actions.push(UiAction::Redo);
            }

            ui.separator();

            if ui.button("\u{2212}").clicked() {
                actions.push(UiAction::ZoomOut);
            }
            let zoom_label = format!("{:.0}%", editor.camera.zoom * 100.0);
            if ui
                .button(zoom_label)
                .on_hover_text("Reset view")
                .clicked()
            {
                actions.push(UiAction::ZoomReset);
            }
            if ui.button("+").clicked() {
                actions.push(UiAction::ZoomIn);
            }
        });
    });
}

fn render_context_menu(ctx: &Context, editor: &Editor, actions: &mut Vec<UiAction>) {
    let Some(menu) = &editor.context_menu else {
        return;
    };

    // The menu position is in physical pixels, egui wants points
    let ppp = ctx.pixels_per_point();
    let pos = Pos2::new(menu.position.x as f32 / ppp, menu.position.y as f32 / ppp);

    let mut clicked_any = false;
    let area = egui::Area::new(egui::Id::new("context_menu"))
        .fixed_pos(pos)
        .order(egui::Order::Foreground);
    let response = area.show(ctx, |ui| {
        egui::Frame::popup(ui.style()).show(ui, |ui| {
            ui.set_min_width(160.0);

            if ui.button("Recolor fill").clicked() {
                actions.push(UiAction::MenuRecolorFill);
                clicked_any = true;
            }
            if ui.button("Duplicate").clicked() {
                actions.push(UiAction::MenuDuplicate);
                clicked_any = true;
            }
            if ui.button("Delete").clicked() {
                actions.push(UiAction::MenuDelete);
                clicked_any = true;
            }

            ui.separator();

            if ui
                .add_enabled(editor.menu_can_group(), egui::Button::new("Group"))
                .clicked()
            {
                actions.push(UiAction::MenuGroup);
                clicked_any = true;
            }
            if ui.button("Ungroup").clicked() {
                actions.push(UiAction::MenuUngroup);
                clicked_any = true;
            }

            if editor.menu_single_rectangle() {
                ui.separator();
                if ui.button("Increase corner radius").clicked() {
                    actions.push(UiAction::MenuIncreaseCornerRadius);
                    clicked_any = true;
                }
            }
            if editor.menu_single_image() {
                ui.separator();
                if ui.button("Replace image...").clicked() {
                    actions.push(UiAction::MenuReplaceImage);
                    clicked_any = true;
                }
            }
        });
    });

    // Click elsewhere dismisses the menu
    if !clicked_any && response.response.clicked_elsewhere() {
        actions.push(UiAction::CloseMenu);
    }
}

fn render_text_overlay(
    ctx: &Context,
    ui_state: &mut UiState,
    editor: &Editor,
    actions: &mut Vec<UiAction>,
) {
    let Some(id) = editor.scene.editing_text else {
        ui_state.text_shape = None;
        return;
    };
    let Some(Shape::Text(text)) = editor.scene.get(id) else {
        return;
    };

    // Resync the buffer when editing switches to another shape
    if ui_state.text_shape != Some(id) {
        ui_state.text_buffer = text.content.clone();
        ui_state.text_shape = Some(id);
    }

    let ppp = ctx.pixels_per_point();
    let screen = editor.camera.world_to_screen(text.position);
    let pos = Pos2::new(screen.x as f32 / ppp, screen.y as f32 / ppp);

    egui::Area::new(egui::Id::new("text_overlay"))
        .fixed_pos(pos)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(&mut ui_state.text_buffer)
                        .desired_width(240.0)
                        .desired_rows(1)
                        .hint_text("Type..."),
                );
                response.request_focus();
                if response.changed() {
                    actions.push(UiAction::TextChanged(ui_state.text_buffer.clone()));
                }
                if ui.button("Done").clicked() {
                    actions.push(UiAction::TextCommitted);
                }
            });
        });
}
