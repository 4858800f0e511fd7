use std::sync::{Arc, Weak};

use tiny_skia::{ColorU8, Pixmap};
use uuid::Uuid;

use crate::error::{CanvasError, CanvasResult};

/// A decoded background raster, owned by whoever loaded it.
///
/// The engine never keeps one of these alive; it only stores the weak
/// [`BackgroundRef`] obtained from [`BackgroundImage::handle`].
#[derive(Clone)]
pub struct BackgroundImage {
    id: Uuid,
    pixels: Arc<Pixmap>,
}

impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("id", &self.id)
            .field("size", &self.size())
            .finish()
    }
}

impl BackgroundImage {
    /// Wrap an already decoded image.
    pub fn from_rgba(image: &image::RgbaImage) -> CanvasResult<Self> {
        let (width, height) = image.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(CanvasError::InvalidSurface { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self {
            id: Uuid::new_v4(),
            pixels: Arc::new(pixmap),
        })
    }

    /// Decode an encoded image (PNG, JPEG, ...) from memory.
    pub fn decode(bytes: &[u8]) -> CanvasResult<Self> {
        let image = image::load_from_memory(bytes)?;
        log::debug!("Decoded background image: {}x{}", image.width(), image.height());
        Self::from_rgba(&image.to_rgba8())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Natural size in pixels.
    pub fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    /// Weak handle suitable for storing in a canvas state.
    pub fn handle(&self) -> BackgroundRef {
        BackgroundRef {
            id: self.id,
            size: self.size(),
            pixels: Arc::downgrade(&self.pixels),
        }
    }
}

/// Opaque, non-owning reference to a background image.
#[derive(Clone)]
pub struct BackgroundRef {
    id: Uuid,
    size: [u32; 2],
    pixels: Weak<Pixmap>,
}

impl BackgroundRef {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Natural size in pixels, known even after the image was released.
    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// The pixels, if the owner still holds the image.
    pub(crate) fn upgrade(&self) -> Option<Arc<Pixmap>> {
        self.pixels.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.pixels.strong_count() > 0
    }
}

impl PartialEq for BackgroundRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.size == other.size
    }
}

impl Eq for BackgroundRef {}

impl std::fmt::Debug for BackgroundRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundRef")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> image::RgbaImage {
        image::RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn handle_does_not_keep_image_alive() {
        let image = BackgroundImage::from_rgba(&checker(4, 2)).unwrap();
        let handle = image.handle();
        assert_eq!(handle.size(), [4, 2]);
        assert!(handle.upgrade().is_some());

        drop(image);
        assert!(!handle.is_alive());
        assert!(handle.upgrade().is_none());
        assert_eq!(handle.size(), [4, 2]);
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let empty = image::RgbaImage::new(0, 3);
        assert!(matches!(
            BackgroundImage::from_rgba(&empty),
            Err(CanvasError::InvalidSurface { width: 0, height: 3 })
        ));
    }

    #[test]
    fn decode_round_trips_png() {
        let mut bytes = Vec::new();
        checker(3, 3)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let image = BackgroundImage::decode(&bytes).unwrap();
        assert_eq!(image.size(), [3, 3]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            BackgroundImage::decode(b"not an image"),
            Err(CanvasError::ImageDecode(_))
        ));
    }
}
