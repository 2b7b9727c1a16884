//! The generation pipeline: sources in, images, files and HTML out.

use std::sync::Arc;

use futures_util::future::try_join_all;
use image::RgbaImage;

use crate::config::Configuration;
use crate::error::FaviconResult;
use crate::icon::IconSpec;
use crate::platform::files;
use crate::platform::icons::{self, SlotKind};
use crate::platform::{self, PlatformOptions};
use crate::render::{
    Compositor, ImageCodec, ImageRsCodec, Rasterizer, Renderer, ResvgRasterizer, create_canvas,
};
use crate::source::{Source, Sourceset, normalize};
use crate::template::{
    DocumentSerializer, ManifestTemplater, OutputFile, StandardSerializer, TemplateProperties,
};

// ============================================================================
// Output
// ============================================================================

/// A named binary output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputImage {
    /// File name relative to the configured path.
    pub name: String,
    /// Encoded PNG or ICO bytes.
    pub contents: Vec<u8>,
}

/// Everything a generation run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaviconResponse {
    /// Icons in platform and slot order.
    pub images: Vec<OutputImage>,
    /// Manifests, config files and the optional HTML file.
    pub files: Vec<OutputFile>,
    /// Rewritten HTML tags, in platform order.
    pub html: Vec<String>,
}

impl FaviconResponse {
    /// Looks up an image by file name.
    pub fn image(&self, name: &str) -> Option<&OutputImage> {
        self.images.iter().find(|image| image.name == name)
    }

    /// Looks up a text file by file name.
    pub fn file(&self, name: &str) -> Option<&OutputFile> {
        self.files.iter().find(|file| file.name == name)
    }

    fn extend(&mut self, other: FaviconResponse) {
        self.images.extend(other.images);
        self.files.extend(other.files);
        self.html.extend(other.html);
    }
}

// ============================================================================
// FaviconGenerator
// ============================================================================

/// Drives a generation run for one [`Configuration`].
///
/// Rasterization, image coding and document serialization are pluggable; the
/// defaults use resvg, the `image` crate, serde_json and quick-xml.
///
/// # Example
///
/// ```no_run
/// use favicon_renderer::{Configuration, FaviconGenerator, Platform};
///
/// # async fn run() -> favicon_renderer::FaviconResult<()> {
/// let config = Configuration::new().with_platforms(&[Platform::Favicons]);
/// let response = FaviconGenerator::new(config)
///     .generate(std::path::PathBuf::from("logo.svg"))
///     .await?;
/// assert!(response.image("favicon.ico").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FaviconGenerator {
    config: Configuration,
    rasterizer: Arc<dyn Rasterizer>,
    codec: Arc<dyn ImageCodec>,
    serializer: Arc<dyn DocumentSerializer>,
}

impl FaviconGenerator {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            rasterizer: Arc::new(ResvgRasterizer),
            codec: Arc::new(ImageRsCodec),
            serializer: Arc::new(StandardSerializer),
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn DocumentSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Runs the whole pipeline.
    ///
    /// Every enabled platform's options are resolved before any source is
    /// rendered, so configuration mistakes fail fast. Platform runs then
    /// proceed concurrently and their outputs are concatenated in platform
    /// order.
    #[tracing::instrument(skip_all)]
    pub async fn generate(&self, source: impl Into<Source>) -> FaviconResult<FaviconResponse> {
        let templater = ManifestTemplater::new(&self.config, self.serializer.as_ref())?;

        let platforms = self
            .config
            .enabled_platforms()
            .into_iter()
            .map(|(target, user)| platform::resolve(target, &user, templater.background()))
            .collect::<FaviconResult<Vec<_>>>()?;

        let sources = normalize(source.into()).await?;
        tracing::info!(
            platforms = platforms.len(),
            sources = sources.len(),
            "generating favicons"
        );

        let runs = try_join_all(
            platforms
                .iter()
                .map(|options| self.generate_platform(&sources, options, &templater)),
        )
        .await?;

        let mut response = FaviconResponse::default();
        for run in runs {
            response.extend(run);
        }

        if let Some(name) = &self.config.html_file {
            let file = templater.template(name, TemplateProperties::Lines(response.html.clone()))?;
            response.files.push(file);
        }

        tracing::info!(
            images = response.images.len(),
            files = response.files.len(),
            html = response.html.len(),
            "generation finished"
        );
        Ok(response)
    }

    #[tracing::instrument(skip_all, fields(platform = %options.platform))]
    async fn generate_platform(
        &self,
        sources: &Sourceset,
        options: &PlatformOptions,
        templater: &ManifestTemplater<'_>,
    ) -> FaviconResult<FaviconResponse> {
        let platform = options.platform;
        let mut response = FaviconResponse::default();

        for slot in icons::slots(platform) {
            let contents = match slot.kind {
                SlotKind::Png(props) => {
                    let spec = IconSpec::from_slot(&props, options);
                    let (canvas, icon) = self.layers(sources, &spec, options)?;
                    Compositor::new(self.codec.as_ref()).composite(
                        canvas,
                        &icon,
                        &spec,
                        spec.max_side(),
                    )?
                }
                SlotKind::Ico { sizes, transparent } => {
                    let frames = sizes
                        .iter()
                        .map(|&size| {
                            let spec = IconSpec {
                                mask: options.mask,
                                ..IconSpec::square(size, transparent)
                            };
                            let (canvas, icon) = self.layers(sources, &spec, options)?;
                            Compositor::new(self.codec.as_ref()).flatten(
                                canvas,
                                &icon,
                                &spec,
                                spec.max_side(),
                            )
                        })
                        .collect::<FaviconResult<Vec<_>>>()?;
                    self.codec.encode_ico(&frames)?
                }
            };
            tracing::debug!(%platform, image = slot.name, bytes = contents.len(), "created icon");
            response.images.push(OutputImage {
                name: slot.name.to_string(),
                contents,
            });
            tokio::task::yield_now().await;
        }

        for template in files::templates(platform) {
            response
                .files
                .push(templater.template(template.name, template.properties)?);
        }

        for fragment in files::html(platform) {
            response.html.push(templater.rewrite_html(&fragment)?);
        }

        Ok(response)
    }

    /// Selects and renders the source for `spec`, and allocates its canvas.
    fn layers(
        &self,
        sources: &Sourceset,
        spec: &IconSpec,
        options: &PlatformOptions,
    ) -> FaviconResult<(RgbaImage, RgbaImage)> {
        let size = spec.effective_size()?;
        let source = sources.select(size.width, size.height);

        let renderer = Renderer::new(self.rasterizer.as_ref(), self.codec.as_ref());
        let icon = renderer.render(source, spec)?;

        let canvas = create_canvas(
            spec.width,
            spec.height,
            options.background.as_ref(),
            spec.transparent,
        )?;
        Ok((canvas, icon))
    }
}

/// Generates favicons for `config` with the default capabilities.
pub async fn favicons(
    source: impl Into<Source>,
    config: Configuration,
) -> FaviconResult<FaviconResponse> {
    FaviconGenerator::new(config).generate(source).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaviconError;
    use crate::platform::Platform;
    use crate::render::testing::SolidRasterizer;
    use serde_json::{Map, json};
    use std::sync::atomic::Ordering;

    const SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64"/>"#;

    fn options(value: serde_json::Value) -> Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn favicons_platform_produces_pngs_and_ico() {
        let rasterizer = Arc::new(SolidRasterizer::default());
        let config = Configuration::new().with_platforms(&[Platform::Favicons]);
        let response = FaviconGenerator::new(config)
            .with_rasterizer(rasterizer.clone())
            .generate(SVG.to_vec())
            .await
            .unwrap();

        let png = response.image("favicon-32x32.png").unwrap();
        let decoded = ImageRsCodec.decode(&png.contents).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));

        let ico = response.image("favicon.ico").unwrap();
        assert_eq!(&ico.contents[0..4], &[0, 0, 1, 0]);

        // one rasterization per png slot plus one per ico frame
        let png_slots = icons::slots(Platform::Favicons)
            .iter()
            .filter(|slot| matches!(slot.kind, SlotKind::Png(_)))
            .count();
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), png_slots + 5);
        assert!(response.files.is_empty());
        assert!(!response.html.is_empty());
    }

    #[tokio::test]
    async fn invalid_options_fail_before_rendering() {
        let rasterizer = Arc::new(SolidRasterizer::default());
        let config = Configuration::new()
            .with_platforms(&[Platform::Android])
            .with_platform_options(Platform::Firefox, options(json!({ "mask": "yes" })));

        let err = FaviconGenerator::new(config)
            .with_rasterizer(rasterizer.clone())
            .generate(SVG.to_vec())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unsupported_option_is_rejected() {
        let config = Configuration::new()
            .with_platforms(&[])
            .with_platform_options(Platform::Favicons, options(json!({ "offset": 10 })));

        let err = favicons(SVG.to_vec(), config).await.unwrap_err();
        assert!(matches!(
            err,
            FaviconError::UnsupportedOption {
                platform: Platform::Favicons,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn html_file_collects_all_fragments() {
        let mut config = Configuration::new().with_platforms(&[Platform::Android, Platform::Favicons]);
        config.html_file = Some("index.html".into());

        let response = FaviconGenerator::new(config)
            .with_rasterizer(Arc::new(SolidRasterizer::default()))
            .generate(SVG.to_vec())
            .await
            .unwrap();

        let html = response.file("index.html").unwrap();
        assert_eq!(html.contents, response.html.join("\n"));
        assert!(response.file("manifest.json").is_some());
    }

    #[tokio::test]
    async fn android_background_makes_icons_opaque() {
        let config = Configuration::new()
            .with_platforms(&[])
            .with_platform_options(Platform::Android, options(json!({ "background": "#ff0000" })));

        let response = FaviconGenerator::new(config)
            .generate(RgbaPng::solid(8).bytes())
            .await
            .unwrap();

        let icon = response.image("android-chrome-36x36.png").unwrap();
        let decoded = ImageRsCodec.decode(&icon.contents).unwrap();
        assert_eq!(decoded.get_pixel(0, 0)[3], 255);
    }

    /// A tiny transparent PNG source.
    struct RgbaPng(RgbaImage);

    impl RgbaPng {
        fn solid(side: u32) -> Self {
            Self(RgbaImage::new(side, side))
        }

        fn bytes(&self) -> Vec<u8> {
            ImageRsCodec.encode_png(&self.0).unwrap()
        }
    }
}
