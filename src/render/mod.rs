//! Rendering of a selected source into an icon-sized image.
//!
//! Decoding, encoding and SVG rasterization sit behind the [`ImageCodec`] and
//! [`Rasterizer`] traits so the pipeline can run against fakes in tests. The
//! [`Renderer`] turns a [`SourceDescriptor`] into the image that the
//! [`Compositor`] later places onto its background canvas.

pub mod codec;
pub mod color;
pub mod compositor;
pub mod svg;

pub use codec::ImageRsCodec;
pub use compositor::{Compositor, create_canvas};
pub use svg::ResvgRasterizer;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::error::FaviconResult;
use crate::icon::IconSpec;
use crate::source::SourceDescriptor;

// ============================================================================
// Capabilities
// ============================================================================

/// Turns SVG markup into pixels.
pub trait Rasterizer: Send + Sync {
    /// Renders `svg` into an image of exactly `width` x `height`, scaled to
    /// fit and centered.
    fn rasterize(&self, svg: &[u8], width: u32, height: u32) -> FaviconResult<RgbaImage>;
}

/// Decodes raster sources and encodes finished icons.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> FaviconResult<RgbaImage>;

    fn encode_png(&self, image: &RgbaImage) -> FaviconResult<Vec<u8>>;

    /// Packs square frames into a single `.ico` file.
    fn encode_ico(&self, frames: &[RgbaImage]) -> FaviconResult<Vec<u8>>;
}

// ============================================================================
// Renderer
// ============================================================================

/// Renders sources to the effective size of an [`IconSpec`].
pub struct Renderer<'a> {
    rasterizer: &'a dyn Rasterizer,
    codec: &'a dyn ImageCodec,
}

impl<'a> Renderer<'a> {
    pub fn new(rasterizer: &'a dyn Rasterizer, codec: &'a dyn ImageCodec) -> Self {
        Self { rasterizer, codec }
    }

    /// Renders `source` into the spec's box minus padding.
    ///
    /// Vector sources are rasterized at that size directly; raster sources
    /// are decoded and contain-fitted. With `rotate` set the result is turned
    /// 90 degrees and its swapped dimensions are kept.
    pub fn render(&self, source: &SourceDescriptor, spec: &IconSpec) -> FaviconResult<RgbaImage> {
        let size = spec.effective_size()?;

        let image = if source.is_svg() {
            self.rasterizer.rasterize(&source.file, size.width, size.height)?
        } else {
            let decoded = self.codec.decode(&source.file)?;
            contain(&decoded, size.width, size.height)
        };

        tracing::trace!(
            width = size.width,
            height = size.height,
            svg = source.is_svg(),
            rotate = spec.rotate,
            "rendered source"
        );

        if spec.rotate {
            Ok(imageops::rotate90(&image))
        } else {
            Ok(image)
        }
    }
}

/// Scales `image` to the largest size that fits `width` x `height` without
/// cropping, centered on a transparent image of exactly that size.
pub fn contain(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = image.dimensions();
    if (src_w, src_h) == (width, height) {
        return image.clone();
    }

    let scale = (width as f32 / src_w as f32).min(height as f32 / src_h as f32);
    let fit_w = ((src_w as f32 * scale).round() as u32).clamp(1, width);
    let fit_h = ((src_h as f32 * scale).round() as u32).clamp(1, height);
    let resized = imageops::resize(image, fit_w, fit_h, FilterType::Lanczos3);

    let mut out = RgbaImage::new(width, height);
    imageops::replace(
        &mut out,
        &resized,
        i64::from((width - fit_w) / 2),
        i64::from((height - fit_h) / 2),
    );
    out
}
