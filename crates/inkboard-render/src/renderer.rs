//! Renderer trait abstraction.

use inkboard_core::camera::Camera;
use inkboard_core::scene::Scene;
use inkboard_core::shapes::ShapeId;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// The camera providing the view transform.
    pub camera: &'a Camera,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Shape currently being edited in an overlay (skipped while drawing).
    pub editing_shape_id: Option<ShapeId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(scene: &'a Scene, camera: &'a Camera, viewport_size: Size) -> Self {
        Self {
            scene,
            camera,
            viewport_size,
            scale_factor: 1.0,
            background_color: Color::WHITE,
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            editing_shape_id: None,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the shape being edited (skipped in build_scene).
    pub fn with_editing_shape(mut self, shape_id: Option<ShapeId>) -> Self {
        self.editing_shape_id = shape_id;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// Called once per frame; prepares all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
