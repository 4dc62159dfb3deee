//! Image shape.

use super::{GroupId, ShapeId, ShapeStyle, ShapeTrait};
use base64::Engine as _;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Encoded image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

/// A raster image placed on the canvas.
///
/// The encoded bytes are kept base64-encoded so the record stays plain
/// data; decoding happens in the renderer, cached by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left anchor position.
    pub position: Point,
    /// Display width in world units.
    pub width: f64,
    /// Display height in world units.
    pub height: f64,
    /// Pixel width of the source image.
    pub natural_width: u32,
    /// Pixel height of the source image.
    pub natural_height: u32,
    /// Encoded format of the source bytes.
    pub format: ImageFormat,
    /// Base64-encoded source bytes.
    pub data: String,
    /// Rotation angle in radians.
    #[serde(default)]
    pub rotation: f64,
    /// Group membership tag.
    #[serde(default)]
    pub group: Option<GroupId>,
    /// Style properties (unused for drawing, kept for batch actions).
    #[serde(default)]
    pub style: ShapeStyle,
}

impl Image {
    /// Create an image from encoded bytes, displayed at natural size.
    pub fn from_bytes(
        position: Point,
        bytes: &[u8],
        format: ImageFormat,
        natural_width: u32,
        natural_height: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width: natural_width as f64,
            height: natural_height as f64,
            natural_width,
            natural_height,
            format,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            rotation: 0.0,
            group: None,
            style: ShapeStyle::default(),
        }
    }

    /// Decode the base64 source bytes.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .ok()
    }

    /// Swap the image content in place, resizing to the new natural size.
    pub fn replace_content(
        &mut self,
        bytes: &[u8],
        format: ImageFormat,
        natural_width: u32,
        natural_height: u32,
    ) {
        self.data = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.format = format;
        self.natural_width = natural_width;
        self.natural_height = natural_height;
        self.width = natural_width as f64;
        self.height = natural_height as f64;
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
