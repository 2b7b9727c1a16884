//! Source image normalization and best-fit selection.
//!
//! Callers may hand over raw bytes, a file path, or a flat list of either.
//! [`normalize`] turns all of them into a [`Sourceset`]: an ordered, non-empty
//! list of [`SourceDescriptor`]s whose dimensions and format have been probed.

use std::io::Cursor;
use std::path::PathBuf;

use futures_util::future::try_join_all;
use image::{ImageFormat, ImageReader};
use quick_xml::Reader;
use quick_xml::events::Event;
use resvg::usvg;
use serde_json::Value;

use crate::error::{FaviconError, FaviconResult};

// ============================================================================
// Source input
// ============================================================================

/// Caller-supplied source input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Bytes(Vec<u8>),
    Path(PathBuf),
    /// A flat list of bytes or paths. Nested lists are rejected.
    List(Vec<Source>),
}

impl Source {
    /// Builds a source from JSON: a string is a path, an array a list.
    pub fn from_json(value: &Value) -> FaviconResult<Self> {
        match value {
            Value::String(path) => Ok(Self::Path(PathBuf::from(path))),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<FaviconResult<Vec<_>>>()
                .map(Self::List),
            other => Err(FaviconError::invalid_source_type(format!(
                "expected a path or a list of paths, got {other}"
            ))),
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Source {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&std::path::Path> for Source {
    fn from(path: &std::path::Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<Source>> for Source {
    fn from(items: Vec<Source>) -> Self {
        Self::List(items)
    }
}

// ============================================================================
// SourceDescriptor
// ============================================================================

/// Vector or raster encoding of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Svg,
    Raster(ImageFormat),
}

impl SourceFormat {
    pub fn is_svg(self) -> bool {
        matches!(self, Self::Svg)
    }
}

/// Probed dimensions and format of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSize {
    /// Intrinsic width in pixels (rounded up for SVG).
    pub width: u32,
    /// Intrinsic height in pixels (rounded up for SVG).
    pub height: u32,
    pub format: SourceFormat,
}

impl SourceSize {
    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// One source image with its probed size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub size: SourceSize,
    pub file: Vec<u8>,
}

impl SourceDescriptor {
    /// Probes `file` for its format and dimensions.
    pub fn from_bytes(file: Vec<u8>) -> FaviconResult<Self> {
        let size = probe(&file)?;
        Ok(Self { size, file })
    }

    pub fn is_svg(&self) -> bool {
        self.size.format.is_svg()
    }
}

/// True when the first element of an XML document is `<svg>`, however long
/// the prolog (declaration, comments, doctype) before it.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if !text.starts_with('<') {
        return false;
    }

    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) | Ok(Event::Empty(tag)) => {
                return tag.local_name().as_ref() == b"svg";
            }
            Ok(Event::Eof) | Err(_) => return false,
            Ok(_) => {}
        }
    }
}

fn probe(bytes: &[u8]) -> FaviconResult<SourceSize> {
    if looks_like_svg(bytes) {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .map_err(|e| FaviconError::invalid_image(format!("unreadable SVG: {e}")))?;
        let size = tree.size();
        return Ok(SourceSize {
            width: size.width().ceil() as u32,
            height: size.height().ceil() as u32,
            format: SourceFormat::Svg,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FaviconError::invalid_image(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| FaviconError::invalid_image("unrecognized image format"))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| FaviconError::invalid_image(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(FaviconError::invalid_image("image has no pixels"));
    }

    Ok(SourceSize {
        width,
        height,
        format: SourceFormat::Raster(format),
    })
}

// ============================================================================
// Sourceset
// ============================================================================

/// The ordered, non-empty set of sources for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourceset {
    sources: Vec<SourceDescriptor>,
}

impl Sourceset {
    pub fn new(sources: Vec<SourceDescriptor>) -> FaviconResult<Self> {
        if sources.is_empty() {
            return Err(FaviconError::EmptySource);
        }
        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    /// Picks the source to render a `width` x `height` icon from.
    ///
    /// A vector source always wins. Otherwise the scan keeps the smallest
    /// raster whose largest side reaches the target's largest side; while no
    /// source reaches it, larger candidates replace smaller ones, so the
    /// fallback is the largest source available.
    pub fn select(&self, width: u32, height: u32) -> &SourceDescriptor {
        if let Some(svg) = self.sources.iter().find(|s| s.is_svg()) {
            return svg;
        }

        let side = width.max(height);
        let mut best = &self.sources[0];
        for candidate in &self.sources {
            let size = candidate.size.max_side();
            let best_size = best.size.max_side();
            let fits = size >= side && (best_size < side || size < best_size);
            let grows = best_size < side && size > best_size;
            if fits || grows {
                best = candidate;
            }
        }
        best
    }
}

impl IntoIterator for Sourceset {
    type Item = SourceDescriptor;
    type IntoIter = std::vec::IntoIter<SourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sourceset {
    type Item = &'a SourceDescriptor;
    type IntoIter = std::slice::Iter<'a, SourceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalizes caller input into a [`Sourceset`].
///
/// List elements are read and probed concurrently; the result keeps input
/// order. Shape errors (empty or nested lists) are reported before any file
/// is read.
#[tracing::instrument(skip(source))]
pub async fn normalize(source: Source) -> FaviconResult<Sourceset> {
    let items = match source {
        Source::List(items) => {
            if items.is_empty() {
                return Err(FaviconError::EmptySource);
            }
            if items.iter().any(|item| matches!(item, Source::List(_))) {
                return Err(FaviconError::invalid_source_type(
                    "nested source lists are not supported",
                ));
            }
            items
        }
        single => vec![single],
    };

    let sources = try_join_all(items.into_iter().map(describe)).await?;
    tracing::debug!(count = sources.len(), "normalized sources");
    Sourceset::new(sources)
}

async fn describe(source: Source) -> FaviconResult<SourceDescriptor> {
    match source {
        Source::Bytes(bytes) => SourceDescriptor::from_bytes(bytes),
        Source::Path(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| FaviconError::io(&path, e))?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "read source");
            SourceDescriptor::from_bytes(bytes)
        }
        Source::List(_) => Err(FaviconError::invalid_source_type(
            "nested source lists are not supported",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use serde_json::json;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect width="100" height="50" fill="#00f"/></svg>"##;

    fn raster(side: u32) -> SourceDescriptor {
        SourceDescriptor::from_bytes(png(side, side)).unwrap()
    }

    fn sides(set: &Sourceset, width: u32, height: u32) -> u32 {
        set.select(width, height).size.max_side()
    }

    #[test]
    fn probes_raster_and_svg() {
        let desc = SourceDescriptor::from_bytes(png(20, 10)).unwrap();
        assert_eq!((desc.size.width, desc.size.height), (20, 10));
        assert_eq!(desc.size.format, SourceFormat::Raster(ImageFormat::Png));

        let desc = SourceDescriptor::from_bytes(SVG.as_bytes().to_vec()).unwrap();
        assert!(desc.is_svg());
        assert_eq!((desc.size.width, desc.size.height), (100, 50));
    }

    #[test]
    fn svg_root_found_after_long_prolog() {
        let svg = format!(
            "<?xml version=\"1.0\"?>\n<!-- {} -->\n{SVG}",
            "x".repeat(4096)
        );
        let desc = SourceDescriptor::from_bytes(svg.into_bytes()).unwrap();
        assert!(desc.is_svg());
        assert_eq!((desc.size.width, desc.size.height), (100, 50));
    }

    #[test]
    fn non_svg_xml_is_not_vector() {
        assert!(!looks_like_svg(b"<html><svg/></html>"));
        assert!(looks_like_svg(b"\xef\xbb\xbf  <svg/>"));
        assert!(looks_like_svg(
            br#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "svg11.dtd"><svg/>"#
        ));
    }

    #[test]
    fn garbage_is_invalid_image() {
        let err = SourceDescriptor::from_bytes(b"definitely not an image".to_vec()).unwrap_err();
        assert!(matches!(err, FaviconError::InvalidImage(_)));
    }

    #[test]
    fn selects_smallest_sufficient_raster() {
        let set = Sourceset::new(vec![raster(16), raster(32), raster(256)]).unwrap();
        assert_eq!(sides(&set, 48, 48), 256);
        assert_eq!(sides(&set, 16, 16), 16);
        assert_eq!(sides(&set, 20, 32), 32);
    }

    #[test]
    fn falls_back_to_largest_when_nothing_fits() {
        let set = Sourceset::new(vec![raster(16), raster(256), raster(32)]).unwrap();
        assert_eq!(sides(&set, 512, 512), 256);
    }

    #[test]
    fn order_does_not_change_the_pick() {
        let set = Sourceset::new(vec![raster(256), raster(32), raster(16), raster(64)]).unwrap();
        assert_eq!(sides(&set, 48, 48), 64);
        assert_eq!(sides(&set, 16, 16), 16);
    }

    #[test]
    fn vector_source_always_wins() {
        let svg = SourceDescriptor::from_bytes(SVG.as_bytes().to_vec()).unwrap();
        let set = Sourceset::new(vec![raster(512), svg, raster(16)]).unwrap();
        for side in [16, 48, 512, 4096] {
            assert!(set.select(side, side).is_svg());
        }
    }

    #[test]
    fn empty_sourceset_is_rejected() {
        assert!(matches!(Sourceset::new(vec![]), Err(FaviconError::EmptySource)));
    }

    #[tokio::test]
    async fn normalize_keeps_input_order() {
        let inputs = [png(64, 64), png(16, 16), png(32, 32)];
        let set = normalize(Source::List(inputs.into_iter().map(Source::Bytes).collect()))
            .await
            .unwrap();
        let widths: Vec<u32> = set.iter().map(|s| s.size.width).collect();
        assert_eq!(widths, vec![64, 16, 32]);
    }

    #[tokio::test]
    async fn normalize_reads_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, png(24, 24)).unwrap();

        let set = normalize(Source::from(vec![Source::Bytes(png(8, 8)), Source::Path(path)]))
            .await
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().nth(1).unwrap().size.width, 24);
    }

    #[tokio::test]
    async fn normalize_rejects_bad_shapes() {
        let err = normalize(Source::List(vec![])).await.unwrap_err();
        assert!(matches!(err, FaviconError::EmptySource));

        let nested = Source::List(vec![Source::List(vec![Source::Bytes(png(8, 8))])]);
        let err = normalize(nested).await.unwrap_err();
        assert!(matches!(err, FaviconError::InvalidSourceType(_)));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = normalize(Source::from("/definitely/not/here.png")).await.unwrap_err();
        assert!(matches!(err, FaviconError::Io { .. }));
    }

    #[test]
    fn json_sources() {
        assert_eq!(
            Source::from_json(&json!("logo.png")).unwrap(),
            Source::Path("logo.png".into())
        );
        assert!(matches!(
            Source::from_json(&json!(["a.png", "b.svg"])).unwrap(),
            Source::List(items) if items.len() == 2
        ));
        assert!(matches!(
            Source::from_json(&json!(42)),
            Err(FaviconError::InvalidSourceType(_))
        ));
    }
}
