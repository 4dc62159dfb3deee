//! Core application state and lifecycle.

use inkboard_core::input::{Modifiers, PointerButton, PointerInput, PointerType};
use inkboard_core::{Editor, SerializableColor, ToolKind};
use inkboard_render::{RenderContext, Renderer, VelloRenderer};
use kurbo::{Point, Size, Vec2};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::ui::{render_ui, UiAction, UiState};

mod file_ops {
    use inkboard_core::shapes::ImageFormat;

    /// An image picked from disk, decoded far enough to know its size.
    pub struct LoadedImage {
        pub bytes: Vec<u8>,
        pub format: ImageFormat,
        pub width: u32,
        pub height: u32,
    }

    /// Pick an image file with a native dialog and probe its dimensions.
    pub fn pick_image() -> Option<LoadedImage> {
        let dialog = rfd::FileDialog::new()
            .set_title("Choose Image")
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"]);

        let path = dialog.pick_file()?;
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                log::error!("Failed to read file: {}", e);
                return None;
            }
        };

        let format = match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Png) => ImageFormat::Png,
            Ok(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
            Ok(image::ImageFormat::WebP) => ImageFormat::Webp,
            Ok(other) => {
                log::error!("Unsupported image format: {:?}", other);
                return None;
            }
            Err(e) => {
                log::error!("Failed to detect image format: {}", e);
                return None;
            }
        };

        let (width, height) = match image::load_from_memory(&bytes) {
            Ok(decoded) => {
                use image::GenericImageView;
                decoded.dimensions()
            }
            Err(e) => {
                log::error!("Failed to decode image: {}", e);
                return None;
            }
        };

        log::info!("Loaded image from {:?} ({}x{})", path, width, height);
        Some(LoadedImage {
            bytes,
            format,
            width,
            height,
        })
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Inkboard".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::WHITE,
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // Editor
    editor: Editor,
    config: AppConfig,

    // Raw input tracked across events
    cursor_pos: Point,
    modifiers: Modifiers,
    /// First touch of the current contact set; winit does not flag one.
    primary_touch: Option<u64>,
}

impl AppState {
    /// Pointer event for the tracked mouse cursor.
    fn mouse_input(&self) -> PointerInput {
        PointerInput::mouse(self.cursor_pos).with_modifiers(self.modifiers)
    }

    fn apply_ui_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            match action {
                UiAction::SelectTool(kind) => {
                    self.editor.set_tool(kind);
                    if kind == ToolKind::Image {
                        if let Some(img) = file_ops::pick_image() {
                            self.editor
                                .insert_image(&img.bytes, img.format, img.width, img.height);
                        }
                        // Image placement is a one-shot action
                        self.editor.set_tool(ToolKind::Select);
                    }
                }
                UiAction::SetStrokeColor(color) => {
                    let [r, g, b, a] = color.to_array();
                    self.editor
                        .set_stroke_color(SerializableColor::new(r, g, b, a));
                }
                UiAction::Undo => self.editor.undo(),
                UiAction::Redo => self.editor.redo(),
                UiAction::ZoomIn => self.editor.camera.zoom_in(),
                UiAction::ZoomOut => self.editor.camera.zoom_out(),
                UiAction::ZoomReset => self.editor.camera.reset(),
                UiAction::MenuRecolorFill => self.editor.menu_recolor_fill(),
                UiAction::MenuDuplicate => self.editor.menu_duplicate(),
                UiAction::MenuDelete => self.editor.menu_delete(),
                UiAction::MenuGroup => self.editor.menu_group(),
                UiAction::MenuUngroup => self.editor.menu_ungroup(),
                UiAction::MenuIncreaseCornerRadius => self.editor.menu_increase_corner_radius(),
                UiAction::MenuReplaceImage => {
                    if let Some(img) = file_ops::pick_image() {
                        self.editor
                            .menu_replace_image(&img.bytes, img.format, img.width, img.height);
                    } else {
                        self.editor.context_menu = None;
                    }
                }
                UiAction::CloseMenu => self.editor.context_menu = None,
                UiAction::TextChanged(content) => {
                    if let Some(id) = self.editor.scene.editing_text {
                        self.editor.update_text(id, content);
                    }
                }
                UiAction::TextCommitted => self.editor.finish_text_editing(),
            }
        }
    }

    /// Keyboard input when no text shape is being edited.
    fn handle_canvas_key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::Delete) | Key::Named(NamedKey::Backspace) => {
                self.editor.delete_selection();
            }
            Key::Named(NamedKey::Escape) => {
                self.editor.context_menu = None;
                self.editor.scene.clear_selection();
            }
            Key::Character(c) => {
                if let Some(ch) = c.chars().next() {
                    self.editor.handle_key(ch, self.modifiers);
                }
            }
            _ => {}
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application until the window is closed.
    pub fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    /// Finish initialization after the surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self
            .render_cx
            .as_ref()
            .expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm for compute shader compatibility;
        // the surface format may differ, hence the blit.
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "Inkboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!(
            "Keyboard shortcuts: V=Select, H=Hand, R=Rectangle, D=Diamond, O=Ellipse, A=Arrow, P=Line, X=Pen, T=Text, E=Eraser"
        );

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            editor: Editor::new(),
            config: self.config.clone(),
            cursor_pos: Point::ZERO,
            modifiers: Modifiers::default(),
            primary_touch: None,
        });

        window.request_redraw();
    }

    fn render_frame(&mut self) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Run the UI pass first so chrome actions land before drawing
        let raw_input = state.egui_state.take_egui_input(&state.window);
        let mut actions = Vec::new();
        let editor_ref = &state.editor;
        let ui_state = &mut state.ui_state;
        let egui_output = state.egui_ctx.run(raw_input, |ctx| {
            actions = render_ui(ctx, ui_state, editor_ref);
        });
        state
            .egui_state
            .handle_platform_output(&state.window, egui_output.platform_output);
        let egui_primitives = state
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        state.apply_ui_actions(actions);

        // Build the Vello scene
        let width = state.surface.config.width;
        let height = state.surface.config.height;
        let viewport_size = Size::new(width as f64, height as f64);

        let render_ctx = RenderContext::new(&state.editor.scene, &state.editor.camera, viewport_size)
            .with_scale_factor(state.window.scale_factor())
            .with_background(state.config.background_color)
            .with_editing_shape(state.editor.scene.editing_text);

        state.shape_renderer.build_scene(&render_ctx);

        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };
        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let params = RenderParams {
            base_color: state.config.background_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Intermediate texture with StorageBinding usage for Vello's
        // compute pipeline; blitted to the surface afterwards.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            state.shape_renderer.scene(),
            &render_texture_view,
            &params,
        ) {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("blit encoder"),
                });
            state
                .texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        // egui on top
        for (id, image_delta) in &egui_output.textures_delta.set {
            state
                .egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder =
                device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                    label: Some("egui encoder"),
                });
            state.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            state
                .egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            state.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        state.window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);

        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        // Transmute lifetime to 'static - safe because App owns everything
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
        self.finish_init(window, surface);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui see the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        let egui_wants_input = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input()
            || state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                self.render_frame();
            }

            WindowEvent::ModifiersChanged(mods) => {
                let mods = mods.state();
                state.modifiers = Modifiers {
                    shift: mods.shift_key(),
                    ctrl: mods.control_key(),
                    alt: mods.alt_key(),
                };
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.cursor_pos = Point::new(position.x, position.y);
                if egui_wants_input {
                    return;
                }
                let input = state.mouse_input();
                state.editor.pointer_move(&input);
            }

            WindowEvent::MouseInput {
                state: btn_state,
                button,
                ..
            } => {
                if egui_wants_input {
                    return;
                }
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Right => PointerButton::Right,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                let input = state.mouse_input().with_button(button);
                match btn_state {
                    ElementState::Pressed => state.editor.pointer_down(&input),
                    ElementState::Released => state.editor.pointer_up(&input),
                }
            }

            WindowEvent::Touch(touch) => {
                if egui_wants_input {
                    return;
                }
                if touch.phase == TouchPhase::Started && state.primary_touch.is_none() {
                    state.primary_touch = Some(touch.id);
                }
                let position = Point::new(touch.location.x, touch.location.y);
                let input = PointerInput {
                    position: Some(position),
                    pointer_id: touch.id,
                    pointer_type: PointerType::Touch,
                    pressure: touch.force.map_or(0.5, |f| f.normalized()),
                    is_primary: state.primary_touch == Some(touch.id),
                    button: PointerButton::Left,
                    modifiers: state.modifiers,
                };
                match touch.phase {
                    TouchPhase::Started => state.editor.pointer_down(&input),
                    TouchPhase::Moved => state.editor.pointer_move(&input),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        state.editor.pointer_up(&input);
                        if state.primary_touch == Some(touch.id) {
                            state.primary_touch = None;
                        }
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if egui_wants_input {
                    return;
                }
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => {
                        Vec2::new(x as f64 * 20.0, y as f64 * 20.0)
                    }
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x, pos.y),
                };
                if state.modifiers.ctrl {
                    let factor = if scroll.y > 0.0 { 1.1 } else { 0.9 };
                    state.editor.camera.zoom_at(state.cursor_pos, factor);
                } else {
                    state.editor.camera.pan(scroll);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if egui_wants_input || event.state != ElementState::Pressed {
                    return;
                }
                // The text overlay owns the keyboard while editing
                if state.editor.scene.editing_text.is_some() {
                    if event.logical_key == Key::Named(NamedKey::Escape) {
                        state.editor.finish_text_editing();
                    }
                    return;
                }
                state.handle_canvas_key(&event.logical_key);
            }

            _ => {}
        }
    }
}
