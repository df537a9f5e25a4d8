//! Fixed-size RGBA rasterization of bitmap and SVG images

use image::imageops::FilterType;
use resvg::{tiny_skia, usvg};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::errors::{MatchError, MatchResultOf};

/// Square, row-major, straight-alpha RGBA pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    size: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap raw RGBA bytes, checking they hold exactly `size * size` pixels
    pub fn from_rgba(size: u32, data: Vec<u8>) -> MatchResultOf<Self> {
        let expected = Self::byte_len(size);
        if data.len() != expected {
            return Err(MatchError::Comparison {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// A buffer with every pixel set to the same colour
    pub fn filled(size: u32, rgba: [u8; 4]) -> Self {
        let pixels = (size as usize) * (size as usize);
        Self {
            size,
            data: rgba.repeat(pixels),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixel_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn byte_len(size: u32) -> usize {
        (size as usize) * (size as usize) * 4
    }
}

/// Turns encoded image bytes into [`RasterBuffer`]s of one fixed size
///
/// SVG parsing options, including the system font database used for
/// `<text>`, are built once and shared between clones.
#[derive(Clone)]
pub struct Rasterizer {
    size: u32,
    svg_options: Arc<usvg::Options<'static>>,
}

impl fmt::Debug for Rasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rasterizer")
            .field("size", &self.size)
            .field("fonts", &self.svg_options.fontdb.len())
            .finish()
    }
}

impl Rasterizer {
    pub fn new(size: u32) -> Self {
        let mut svg_options = usvg::Options::default();
        svg_options.fontdb_mut().load_system_fonts();
        debug!(
            "Loaded {} system font faces for SVG text",
            svg_options.fontdb.len()
        );

        Self {
            size,
            svg_options: Arc::new(svg_options),
        }
    }

    /// Decode and stretch an image to `size x size`
    ///
    /// Bitmap formats the `image` crate recognises by their magic bytes are
    /// decoded with it; anything else is parsed as SVG. `origin` names the
    /// image in error messages.
    pub fn rasterize(&self, bytes: &[u8], origin: &str) -> MatchResultOf<RasterBuffer> {
        if bytes.is_empty() {
            return Err(MatchError::rasterization(origin, "image data is empty"));
        }

        match image::guess_format(bytes) {
            Ok(format) => {
                trace!("Rasterizing {} as {:?}", origin, format);
                self.rasterize_bitmap(bytes, format, origin)
            }
            Err(_) => {
                trace!("Rasterizing {} as SVG", origin);
                self.rasterize_svg(bytes, origin)
            }
        }
    }

    fn rasterize_bitmap(
        &self,
        bytes: &[u8],
        format: image::ImageFormat,
        origin: &str,
    ) -> MatchResultOf<RasterBuffer> {
        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| MatchError::rasterization(origin, e))?;

        let resized = img
            .resize_exact(self.size, self.size, FilterType::Lanczos3)
            .to_rgba8();

        RasterBuffer::from_rgba(self.size, resized.into_raw())
    }

    fn rasterize_svg(&self, bytes: &[u8], origin: &str) -> MatchResultOf<RasterBuffer> {
        let tree = usvg::Tree::from_data(bytes, &self.svg_options)
            .map_err(|e| MatchError::rasterization(origin, format!("invalid SVG: {e}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(self.size, self.size).ok_or_else(|| {
            MatchError::rasterization(origin, "failed to allocate pixmap")
        })?;

        // Independent axis scales stretch the view box over the whole pixmap
        let svg_size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            self.size as f32 / svg_size.width(),
            self.size as f32 / svg_size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let data = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();

        RasterBuffer::from_rgba(self.size, data)
    }
}
