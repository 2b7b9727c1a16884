//! PNG and ICO encoding on top of the `image` crate.

use std::io::Cursor;

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::{ExtendedColorType, ImageFormat, RgbaImage};

use super::ImageCodec;
use crate::error::{FaviconError, FaviconResult};

/// The default [`ImageCodec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsCodec;

impl ImageCodec for ImageRsCodec {
    fn decode(&self, bytes: &[u8]) -> FaviconResult<RgbaImage> {
        let image = image::load_from_memory(bytes).map_err(|e| FaviconError::decode(e.to_string()))?;
        Ok(image.to_rgba8())
    }

    fn encode_png(&self, image: &RgbaImage) -> FaviconResult<Vec<u8>> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| FaviconError::encode(e.to_string()))?;
        Ok(buf)
    }

    fn encode_ico(&self, frames: &[RgbaImage]) -> FaviconResult<Vec<u8>> {
        if frames.is_empty() {
            return Err(FaviconError::encode("an ico file needs at least one frame"));
        }

        // Every frame is stored PNG-compressed.
        let frames = frames
            .iter()
            .map(|frame| {
                IcoFrame::as_png(
                    frame.as_raw(),
                    frame.width(),
                    frame.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| FaviconError::encode(e.to_string()))
            })
            .collect::<FaviconResult<Vec<_>>>()?;

        let mut buf = Vec::new();
        IcoEncoder::new(&mut buf)
            .encode_images(&frames)
            .map_err(|e| FaviconError::encode(e.to_string()))?;
        Ok(buf)
    }
}
