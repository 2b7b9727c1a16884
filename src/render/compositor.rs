//! Canvas allocation and final icon compositing.
//!
//! Every output icon is built the same way: a canvas of the slot size is
//! filled with the background (or left transparent), optionally clipped to a
//! circle with a ring overlay on top, and the rendered source is drawn over it
//! at the padding offset.

use std::sync::OnceLock;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::color::{TRANSPARENT, parse_color};
use super::svg::{ResvgRasterizer, apply_alpha_mask, composite_over};
use super::{ImageCodec, Rasterizer};
use crate::error::{FaviconError, FaviconResult};
use crate::icon::IconSpec;
use crate::platform::Background;

const MASK_SVG: &[u8] = include_bytes!("assets/mask.svg");
const OVERLAY_SVG: &[u8] = include_bytes!("assets/overlay.svg");

/// Resolution the built-in assets are rasterized at before being resized.
const ASSET_SIZE: u32 = 512;

static ASSETS: OnceLock<MaskAssets> = OnceLock::new();

// ============================================================================
// Canvas
// ============================================================================

/// Allocates the canvas an icon is composited onto.
///
/// A transparent slot, or one without an opaque background, starts fully
/// transparent. Otherwise the canvas is filled with the background color.
pub fn create_canvas(
    width: u32,
    height: u32,
    background: Option<&Background>,
    transparent: bool,
) -> FaviconResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(FaviconError::canvas(format!(
            "cannot allocate a {width}x{height} canvas"
        )));
    }

    let fill = match background {
        Some(Background::Color(color)) if !transparent => parse_color(color)?,
        _ => TRANSPARENT,
    };
    Ok(RgbaImage::from_pixel(width, height, fill))
}

// ============================================================================
// Mask assets
// ============================================================================

/// The circular clip and the ring drawn on top of it.
struct MaskAssets {
    mask: RgbaImage,
    overlay: RgbaImage,
}

impl MaskAssets {
    fn load() -> FaviconResult<Self> {
        let rasterizer = ResvgRasterizer;
        Ok(Self {
            mask: rasterizer.rasterize(MASK_SVG, ASSET_SIZE, ASSET_SIZE)?,
            overlay: rasterizer.rasterize(OVERLAY_SVG, ASSET_SIZE, ASSET_SIZE)?,
        })
    }

    fn get() -> FaviconResult<&'static Self> {
        if let Some(assets) = ASSETS.get() {
            return Ok(assets);
        }
        let loaded = Self::load()?;
        tracing::debug!(size = ASSET_SIZE, "rasterized mask assets");
        Ok(ASSETS.get_or_init(|| loaded))
    }
}

/// Resizes a square asset to `max_side` wide, keeping its aspect ratio.
fn fit_asset(asset: &RgbaImage, max_side: u32) -> RgbaImage {
    let height = ((u64::from(asset.height()) * u64::from(max_side)) / u64::from(asset.width()))
        .max(1) as u32;
    imageops::resize(asset, max_side, height, FilterType::Lanczos3)
}

/// Clips `canvas` to the built-in circle and draws the ring overlay over it.
pub fn apply_mask(canvas: &mut RgbaImage, max_side: u32) -> FaviconResult<()> {
    let assets = MaskAssets::get()?;
    apply_alpha_mask(canvas, &fit_asset(&assets.mask, max_side));
    composite_over(canvas, &fit_asset(&assets.overlay, max_side), 0, 0);
    Ok(())
}

// ============================================================================
// Compositor
// ============================================================================

/// Places rendered icons onto their canvas and encodes the result.
pub struct Compositor<'a> {
    codec: &'a dyn ImageCodec,
}

impl<'a> Compositor<'a> {
    pub fn new(codec: &'a dyn ImageCodec) -> Self {
        Self { codec }
    }

    /// Draws `icon` onto `canvas` at the spec's offset, masking the canvas
    /// first when the spec asks for it.
    pub fn flatten(
        &self,
        mut canvas: RgbaImage,
        icon: &RgbaImage,
        spec: &IconSpec,
        max_side: u32,
    ) -> FaviconResult<RgbaImage> {
        if spec.mask {
            apply_mask(&mut canvas, max_side)?;
        }

        let offset = i64::from(spec.offset);
        composite_over(&mut canvas, icon, offset, offset);
        Ok(canvas)
    }

    /// [`flatten`](Self::flatten) followed by PNG encoding.
    pub fn composite(
        &self,
        canvas: RgbaImage,
        icon: &RgbaImage,
        spec: &IconSpec,
        max_side: u32,
    ) -> FaviconResult<Vec<u8>> {
        let flat = self.flatten(canvas, icon, spec, max_side)?;
        self.codec.encode_png(&flat)
    }
}
