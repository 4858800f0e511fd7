use egui::{Color32, Pos2, Rect, Vec2};
use tiny_skia::{
    BlendMode as SkiaBlendMode, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder,
    Pixmap, PixmapPaint, Stroke as SkiaStroke, Transform,
};

use crate::canvas_state::CanvasState;
use crate::error::{CanvasError, CanvasResult};
use crate::stroke::{BlendMode, DrawSession, Point, Stroke, Tool};

/// Rectangle that fits `image_size` inside `surface_size` preserving aspect
/// ratio, centered, without cropping.
pub fn contain_rect(image_size: [u32; 2], surface_size: [u32; 2]) -> Rect {
    let image = Vec2::new(image_size[0] as f32, image_size[1] as f32);
    let surface = Vec2::new(surface_size[0] as f32, surface_size[1] as f32);
    if image.x <= 0.0 || image.y <= 0.0 {
        return Rect::NOTHING;
    }
    let scale = (surface.x / image.x).min(surface.y / image.y);
    let size = image * scale;
    let min = Pos2::new((surface.x - size.x) / 2.0, (surface.y - size.y) / 2.0);
    Rect::from_min_size(min, size)
}

/// Anything that can be painted as a stroke: committed strokes and the live session.
trait StrokeLike {
    fn points(&self) -> &[Point];
    fn color(&self) -> Color32;
    fn width(&self) -> f32;
    fn blend_mode(&self) -> BlendMode;
}

impl StrokeLike for Stroke {
    fn points(&self) -> &[Point] {
        Stroke::points(self)
    }

    fn color(&self) -> Color32 {
        Stroke::color(self)
    }

    fn width(&self) -> f32 {
        Stroke::width(self)
    }

    fn blend_mode(&self) -> BlendMode {
        Stroke::blend_mode(self)
    }
}

impl StrokeLike for DrawSession {
    fn points(&self) -> &[Point] {
        DrawSession::points(self)
    }

    fn color(&self) -> Color32 {
        match self.tool() {
            Tool::Marker => DrawSession::color(self),
            Tool::Eraser => Color32::TRANSPARENT,
        }
    }

    fn width(&self) -> f32 {
        DrawSession::width(self)
    }

    fn blend_mode(&self) -> BlendMode {
        self.tool().blend_mode()
    }
}

/// Rasterizes a canvas state onto a fresh transparent surface.
///
/// Painting order is background, then committed strokes in sequence, then
/// the live stroke. Output depends only on the inputs.
#[derive(Debug, Clone, Copy)]
pub struct CanvasCompositor {
    anti_alias: bool,
}

impl Default for CanvasCompositor {
    fn default() -> Self {
        Self { anti_alias: true }
    }
}

impl CanvasCompositor {
    pub fn new(anti_alias: bool) -> Self {
        Self { anti_alias }
    }

    /// Render committed state only
    pub fn render(&self, state: &CanvasState, size: [u32; 2]) -> CanvasResult<Pixmap> {
        self.render_live(state, None, size)
    }

    /// Render committed state plus the in-progress stroke, if any
    pub fn render_live(
        &self,
        state: &CanvasState,
        session: Option<&DrawSession>,
        size: [u32; 2],
    ) -> CanvasResult<Pixmap> {
        let [width, height] = size;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidSurface { width, height })?;

        if let Some(background) = state.background() {
            match background.upgrade() {
                Some(image) => draw_background(&mut pixmap, &image, background.size(), size),
                None => log::warn!(
                    "Background image {} was released by its owner, skipping it",
                    background.id()
                ),
            }
        }

        for stroke in state.strokes() {
            self.draw_stroke(&mut pixmap, &**stroke);
        }

        if let Some(session) = session {
            self.draw_stroke(&mut pixmap, session);
        }

        Ok(pixmap)
    }

    fn draw_stroke(&self, pixmap: &mut Pixmap, stroke: &impl StrokeLike) {
        let points = stroke.points();
        let Some(first) = points.first() else {
            return;
        };

        let mut paint = Paint::default();
        paint.anti_alias = self.anti_alias;
        match stroke.blend_mode() {
            BlendMode::Normal => {
                let [r, g, b, a] = stroke.color().to_srgba_unmultiplied();
                paint.set_color_rgba8(r, g, b, a);
                paint.blend_mode = SkiaBlendMode::SourceOver;
            }
            BlendMode::Clear => {
                // Coverage alone decides how much is removed; the color is irrelevant.
                paint.set_color_rgba8(0, 0, 0, 255);
                paint.blend_mode = SkiaBlendMode::Clear;
            }
        }

        let width = stroke.width();
        if points.iter().all(|p| p == first) {
            // A tap: paint a round dot the size of the pen.
            if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width / 2.0) {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(first.x, first.y);
        for point in &points[1..] {
            builder.line_to(point.x, point.y);
        }
        let Some(path) = builder.finish() else {
            return;
        };

        let style = SkiaStroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..SkiaStroke::default()
        };
        pixmap.stroke_path(&path, &paint, &style, Transform::identity(), None);
    }
}

fn draw_background(pixmap: &mut Pixmap, image: &Pixmap, natural: [u32; 2], surface: [u32; 2]) {
    let target = contain_rect(natural, surface);
    if target.is_negative() {
        return;
    }
    let scale_x = target.width() / image.width() as f32;
    let scale_y = target.height() / image.height() as f32;
    let transform = Transform::from_row(scale_x, 0.0, 0.0, scale_y, target.min.x, target.min.y);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
}
