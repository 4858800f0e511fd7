use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tiny_skia::Pixmap;

use crate::canvas_state::CanvasState;
use crate::error::{CanvasError, CanvasResult};
use crate::renderer::CanvasCompositor;

/// A flattened, PNG-encoded rendering of a canvas state.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png", &format!("<{} bytes>", self.png.len()))
            .finish()
    }
}

impl Snapshot {
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// `data:image/png;base64,...` form, as most upload endpoints expect
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

/// Flattens committed canvas state into PNG bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotExporter {
    compositor: CanvasCompositor,
}

impl SnapshotExporter {
    pub fn new(compositor: CanvasCompositor) -> Self {
        Self { compositor }
    }

    /// Render `state` at `size` and encode it.
    ///
    /// Fails with [`CanvasError::EmptyCanvas`] if there is neither a
    /// background nor a stroke. Only committed strokes are included, so the
    /// result depends on nothing but `state` and `size`.
    pub fn export(&self, state: &CanvasState, size: [u32; 2]) -> CanvasResult<Snapshot> {
        if state.is_empty() {
            return Err(CanvasError::EmptyCanvas);
        }
        let pixmap = self.compositor.render(state, size)?;
        let png = encode_png(&pixmap)?;
        log::info!(
            "Exported {}x{} snapshot ({} strokes, {} bytes)",
            size[0],
            size[1],
            state.strokes().len(),
            png.len()
        );
        Ok(Snapshot {
            png,
            width: size[0],
            height: size[1],
        })
    }
}

/// Convert a premultiplied surface into a straight-alpha image
pub fn to_rgba_image(pixmap: &Pixmap) -> CanvasResult<image::RgbaImage> {
    let mut raw = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        raw.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), raw).ok_or_else(|| {
        CanvasError::Encoding(format!(
            "pixel buffer does not match {}x{}",
            pixmap.width(),
            pixmap.height()
        ))
    })
}

fn encode_png(pixmap: &Pixmap) -> CanvasResult<Vec<u8>> {
    let rgba = to_rgba_image(pixmap)?;
    let mut bytes = Vec::new();
    rgba.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|err| CanvasError::Encoding(err.to_string()))?;
    Ok(bytes)
}
