//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use inkboard_core::shapes::{
    Arrow, Image, Line, Shape, ShapeId, ShapeStyle, ShapeTrait, Stroke as InkStroke, StrokeStyle,
    Text,
};
use inkboard_core::tools::{corner_handles, has_resize_handles};
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, RoundedRect, Shape as KurboShape, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use std::collections::HashMap;
use vello::Scene;

/// Cache key for decoded images: the shape id plus its natural size,
/// so replacing an image's content invalidates the old entry.
type ImageCacheKey = (ShapeId, u32, u32);

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Font context (system font collection, cached across frames).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level (for zoom-independent UI elements).
    zoom: f64,
    /// Background color; eraser strokes paint in it.
    background_color: Color,
    /// Decoded images, keyed so content replacement re-decodes.
    image_cache: HashMap<ImageCacheKey, peniko::ImageData>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
            background_color: Color::WHITE,
            image_cache: HashMap::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Kurbo stroke for a shape style, including dash pattern.
    fn stroke_for(style: &ShapeStyle) -> Stroke {
        let stroke = Stroke::new(style.stroke_width);
        match style.stroke_style {
            StrokeStyle::Solid => stroke,
            StrokeStyle::Dashed => stroke.with_dashes(0.0, [8.0, 8.0]),
            StrokeStyle::Dotted => {
                stroke.with_dashes(0.0, [style.stroke_width, style.stroke_width * 2.0])
            }
        }
    }

    /// Fill (when present) then stroke a path.
    fn render_path(&mut self, path: &BezPath, style: &ShapeStyle, transform: Affine) {
        if let Some(fill_color) = style.fill() {
            self.scene
                .fill(Fill::NonZero, transform, fill_color, None, path);
        }
        self.scene
            .stroke(&Self::stroke_for(style), transform, style.stroke(), None, path);
    }

    /// Render a freehand or eraser stroke as a round-capped polyline.
    /// Erasers paint in the background color.
    fn render_stroke(&mut self, stroke: &InkStroke, transform: Affine, erases: bool) {
        let style = &stroke.style;
        let color = if erases {
            self.background_color
        } else {
            style.stroke()
        };
        if stroke.points.len() < 2 {
            // A tap leaves a dot
            if let Some(p) = stroke.points.first() {
                let dot = kurbo::Circle::new(*p, style.stroke_width / 2.0);
                self.scene
                    .fill(Fill::NonZero, transform, color, None, &dot.to_path(0.1));
            }
            return;
        }
        let mut path = BezPath::new();
        path.move_to(stroke.points[0]);
        for p in &stroke.points[1..] {
            path.line_to(*p);
        }
        let pen = Stroke::new(style.stroke_width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        self.scene.stroke(&pen, transform, color, None, &path);
    }

    fn render_line(&mut self, line: &Line, transform: Affine) {
        let mut path = BezPath::new();
        path.move_to(line.start);
        path.line_to(line.end);
        self.scene.stroke(
            &Self::stroke_for(&line.style),
            transform,
            line.style.stroke(),
            None,
            &path,
        );
    }

    fn render_arrow(&mut self, arrow: &Arrow, transform: Affine) {
        let mut shaft = BezPath::new();
        shaft.move_to(arrow.start);
        shaft.line_to(arrow.end);
        self.scene.stroke(
            &Self::stroke_for(&arrow.style),
            transform,
            arrow.style.stroke(),
            None,
            &shaft,
        );

        // The head stays solid even on dashed arrows
        let [left, right] = arrow.head_points();
        let mut head = BezPath::new();
        head.move_to(left);
        head.line_to(arrow.end);
        head.line_to(right);
        let pen = Stroke::new(arrow.style.stroke_width)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        self.scene
            .stroke(&pen, transform, arrow.style.stroke(), None, &head);
    }

    /// Render a text shape using Parley for layout.
    fn render_text(&mut self, text: &Text, transform: Affine) {
        if text.content.is_empty() {
            // Placeholder caret for freshly placed text
            let caret = kurbo::Line::new(
                text.position,
                Point::new(text.position.x, text.position.y + text.font_size * 1.2),
            );
            self.scene.stroke(
                &Stroke::new(2.0),
                transform,
                Color::from_rgba8(100, 100, 100, 200),
                None,
                &caret,
            );
            return;
        }

        let brush = Brush::Solid(text.style.stroke());
        let mut builder =
            self.layout_cx
                .ranged_builder(&mut self.font_cx, &text.content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(text.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
        )));
        let mut layout = builder.build(&text.content);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let text_transform = transform * Affine::translate((text.position.x, text.position.y));

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }

    /// Render an image shape, decoding once and caching by id + size.
    fn render_image(&mut self, image: &Image, transform: Affine) {
        use std::sync::Arc;

        let key = (image.id(), image.natural_width, image.natural_height);
        let image_data = if let Some(cached) = self.image_cache.get(&key) {
            cached.clone()
        } else {
            let Some(raw) = image.decode_bytes() else {
                self.render_image_placeholder(image, transform);
                return;
            };
            match ::image::load_from_memory(&raw) {
                Ok(decoded) => {
                    let rgba = decoded.to_rgba8();
                    let (width, height) = rgba.dimensions();
                    let blob = peniko::Blob::new(Arc::new(rgba.into_vec()));
                    let data = peniko::ImageData {
                        data: blob,
                        format: peniko::ImageFormat::Rgba8,
                        width,
                        height,
                        alpha_type: peniko::ImageAlphaType::Alpha,
                    };
                    self.image_cache.insert(key, data.clone());
                    data
                }
                Err(err) => {
                    log::warn!("image decode failed: {err}");
                    self.render_image_placeholder(image, transform);
                    return;
                }
            }
        };

        let bounds = image.bounds();
        let scale_x = bounds.width() / image_data.width as f64;
        let scale_y = bounds.height() / image_data.height as f64;
        let image_transform = transform
            * Affine::translate((bounds.x0, bounds.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);
        self.scene.draw_image(&image_data, image_transform);
    }

    /// Gray box with an X for images that could not be decoded.
    fn render_image_placeholder(&mut self, image: &Image, transform: Affine) {
        let bounds = image.bounds();
        let rect_path = bounds.to_path(0.1);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(200, 200, 200, 255),
            None,
            &rect_path,
        );
        let stroke = Stroke::new(2.0);
        let mut x_path = BezPath::new();
        x_path.move_to(Point::new(bounds.x0, bounds.y0));
        x_path.line_to(Point::new(bounds.x1, bounds.y1));
        x_path.move_to(Point::new(bounds.x1, bounds.y0));
        x_path.line_to(Point::new(bounds.x0, bounds.y1));
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(150, 150, 150, 255),
            None,
            &x_path,
        );
        self.scene.stroke(
            &stroke,
            transform,
            Color::from_rgba8(100, 100, 100, 255),
            None,
            &rect_path,
        );
    }

    /// Render one shape with the camera transform applied.
    fn render_shape(&mut self, shape: &Shape, transform: Affine) {
        // Rotation is around the shape's center
        let transform = if shape.rotation() != 0.0 {
            transform * Affine::rotate_about(shape.rotation(), shape.bounds().center())
        } else {
            transform
        };
        match shape {
            Shape::Rectangle(rect) => {
                let path = if rect.corner_radius > 0.0 {
                    RoundedRect::from_rect(rect.as_rect(), rect.corner_radius).to_path(0.1)
                } else {
                    rect.as_rect().to_path(0.1)
                };
                self.render_path(&path, &rect.style, transform);
            }
            Shape::Diamond(diamond) => {
                let [top, right, bottom, left] = diamond.vertices();
                let mut path = BezPath::new();
                path.move_to(top);
                path.line_to(right);
                path.line_to(bottom);
                path.line_to(left);
                path.close_path();
                self.render_path(&path, &diamond.style, transform);
            }
            Shape::Ellipse(ellipse) => {
                let path = ellipse.as_kurbo().to_path(0.1);
                self.render_path(&path, &ellipse.style, transform);
            }
            Shape::Line(line) => self.render_line(line, transform),
            Shape::Arrow(arrow) => self.render_arrow(arrow, transform),
            Shape::Freehand(stroke) => self.render_stroke(stroke, transform, false),
            Shape::Eraser(stroke) => self.render_stroke(stroke, transform, true),
            Shape::Text(text) => self.render_text(text, transform),
            Shape::Image(image) => self.render_image(image, transform),
        }
    }

    /// Dashed outline around a selected shape's bounds.
    /// Stroke widths are scaled inversely with zoom to keep a constant
    /// screen size.
    fn render_selection_outline(&mut self, shape: &Shape, transform: Affine) {
        let stroke_width = 1.0 / self.zoom;
        let dash_len = 4.0 / self.zoom;
        let bounds = shape.bounds().inflate(2.0 / self.zoom, 2.0 / self.zoom);
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, [dash_len, dash_len]);
        self.scene.stroke(
            &stroke,
            transform,
            self.selection_color,
            None,
            &bounds.to_path(0.1),
        );
    }

    /// Filled corner handles on a lone resizable selection, kept at a
    /// constant screen size.
    fn render_resize_handles(&mut self, shape: &Shape, transform: Affine) {
        let half = 3.0 / self.zoom;
        for corner in corner_handles(shape.bounds()) {
            let handle = Rect::new(
                corner.x - half,
                corner.y - half,
                corner.x + half,
                corner.y + half,
            );
            self.scene
                .fill(Fill::NonZero, transform, self.selection_color, None, &handle);
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.zoom = ctx.camera.zoom;
        self.background_color = ctx.background_color;

        // Background
        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            ctx.background_color,
            None,
            &viewport,
        );

        let camera_transform = ctx.camera.transform();

        for shape in ctx.scene.shapes() {
            // The text-edit overlay draws the edited shape itself
            if ctx.editing_shape_id == Some(shape.id()) {
                continue;
            }
            self.render_shape(shape, camera_transform);
        }

        for id in &ctx.scene.selection {
            if let Some(shape) = ctx.scene.get(*id) {
                self.render_selection_outline(shape, camera_transform);
            }
        }
        if let &[id] = ctx.scene.selection.as_slice() {
            if let Some(shape) = ctx.scene.get(id) {
                if has_resize_handles(shape) {
                    self.render_resize_handles(shape, camera_transform);
                }
            }
        }
    }
}
