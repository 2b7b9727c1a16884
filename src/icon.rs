//! Icon output slot types.

use crate::error::{FaviconError, FaviconResult};
use crate::platform::PlatformOptions;
use crate::platform::icons::IconProperties;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A single requested output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Padding in pixels on every side of the rendered icon.
    pub offset: u32,
    /// Turn the rendered icon 90 degrees clockwise.
    pub rotate: bool,
    /// Clip the canvas to a circle and draw the ring overlay.
    pub mask: bool,
    /// Leave the canvas transparent instead of filling the background.
    pub transparent: bool,
}

impl IconSpec {
    /// A plain square slot: no padding, rotation or mask.
    pub fn square(size: u32, transparent: bool) -> Self {
        Self {
            width: size,
            height: size,
            offset: 0,
            rotate: false,
            mask: false,
            transparent,
        }
    }

    /// Derives the spec of a platform slot.
    ///
    /// The offset option is a percentage of the slot's largest side, and
    /// `disable_transparency` forces an opaque canvas.
    pub fn from_slot(props: &IconProperties, options: &PlatformOptions) -> Self {
        let max_side = props.width.max(props.height);
        let offset = (f64::from(max_side) * f64::from(options.offset) / 100.0).round() as u32;
        Self {
            width: props.width,
            height: props.height,
            offset,
            rotate: props.rotate,
            mask: options.mask,
            transparent: props.transparent && !options.disable_transparency,
        }
    }

    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }

    /// The box the source is rendered into: the slot minus the offset on
    /// both sides.
    pub fn effective_size(&self) -> FaviconResult<SizePx> {
        let padding = self.offset.saturating_mul(2);
        match (
            self.width.checked_sub(padding),
            self.height.checked_sub(padding),
        ) {
            (Some(width), Some(height)) if width > 0 && height > 0 => Ok(SizePx::new(width, height)),
            _ => Err(FaviconError::canvas(format!(
                "offset {} leaves no room in a {}x{} icon",
                self.offset, self.width, self.height
            ))),
        }
    }
}
