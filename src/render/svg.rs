//! SVG rasterization with resvg, and alpha compositing helpers.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::Rasterizer;
use crate::error::{FaviconError, FaviconResult};

// ============================================================================
// Rasterizer
// ============================================================================

/// The default [`Rasterizer`], backed by resvg.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgRasterizer;

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, svg: &[u8], width: u32, height: u32) -> FaviconResult<RgbaImage> {
        let tree = Tree::from_data(svg, &Options::default())
            .map_err(|e| FaviconError::rasterization(e.to_string()))?;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            FaviconError::canvas(format!("cannot allocate a {width}x{height} pixmap"))
        })?;

        // Uniform scale so the drawing fits, then center it in the box.
        let svg_size = tree.size();
        let scale = (width as f32 / svg_size.width()).min(height as f32 / svg_size.height());
        let tx = (width as f32 - svg_size.width() * scale) / 2.0;
        let ty = (height as f32 - svg_size.height() * scale) / 2.0;
        let transform = Transform::from_scale(scale, scale).post_translate(tx, ty);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap_to_rgba_image(&pixmap))
    }
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    // tiny_skia stores premultiplied alpha
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    img
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites a source image onto a destination image at the specified position.
///
/// Uses standard alpha blending (source over destination). Pixels falling
/// outside the destination are dropped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let dest_width = i64::from(dest.width());
    let dest_height = i64::from(dest.height());

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + i64::from(sx);
        let dy = y + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }

        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Multiplies the alpha of `dest` by the alpha of `mask` where they overlap.
pub fn apply_alpha_mask(dest: &mut RgbaImage, mask: &RgbaImage) {
    let width = dest.width().min(mask.width());
    let height = dest.height().min(mask.height());
    for y in 0..height {
        for x in 0..width {
            let coverage = u16::from(mask.get_pixel(x, y)[3]);
            let pixel = dest.get_pixel_mut(x, y);
            pixel[3] = ((u16::from(pixel[3]) * coverage + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><circle cx="50" cy="50" r="40" fill="#ff0000"/></svg>"##;

    #[test]
    fn rasterizes_to_exact_size() {
        let img = ResvgRasterizer.rasterize(SIMPLE_SVG.as_bytes(), 50, 30).unwrap();
        assert_eq!(img.dimensions(), (50, 30));

        // drawing is centered: the middle is red, the side margins are empty
        let center = img.get_pixel(25, 15);
        assert!(center[0] > 200 && center[3] > 200);
        assert_eq!(img.get_pixel(2, 15)[3], 0);
    }

    #[test]
    fn invalid_svg_is_a_rasterization_error() {
        let err = ResvgRasterizer.rasterize(b"<svg", 10, 10).unwrap_err();
        assert!(matches!(err, FaviconError::Rasterization(_)));
    }

    #[test]
    fn composite_simple() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn composite_clips_out_of_bounds() {
        let mut dest = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));

        composite_over(&mut dest, &src, 2, -2);

        assert_eq!(dest.get_pixel(3, 1).0, [0, 255, 0, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(dest.get_pixel(3, 3).0, [0, 0, 0, 0]);
    }

    #[test]
    fn composite_with_transparency() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        let pixel = dest.get_pixel(0, 0);
        assert!(pixel[0] > 0, "Should have some red");
        assert!(pixel[2] > 0, "Should have some blue");
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn alpha_mask_scales_alpha() {
        let mut dest = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        let mut mask = RgbaImage::from_pixel(1, 2, Rgba([255, 255, 255, 255]));
        mask.put_pixel(0, 1, Rgba([255, 255, 255, 0]));

        apply_alpha_mask(&mut dest, &mask);

        assert_eq!(dest.get_pixel(0, 0)[3], 255);
        assert_eq!(dest.get_pixel(0, 1)[3], 0);
        // outside the mask nothing changes
        assert_eq!(dest.get_pixel(1, 1)[3], 255);
    }
}
