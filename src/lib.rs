//! favicon-renderer: favicon and app icon generation
//!
//! This crate turns one or more source images (SVG or raster) into the full
//! set of icons, manifests and HTML tags that browsers and mobile platforms
//! look for.
//!
//! # Example
//!
//! ```no_run
//! use favicon_renderer::{Configuration, Platform, favicons};
//!
//! # async fn run() -> favicon_renderer::FaviconResult<()> {
//! let mut config = Configuration::new().with_platforms(&[Platform::Favicons, Platform::Android]);
//! config.app_name = Some("My App".into());
//! config.path = "/static/icons".into();
//!
//! let response = favicons(std::path::PathBuf::from("logo.svg"), config).await?;
//! for image in &response.images {
//!     println!("{} ({} bytes)", image.name, image.contents.len());
//! }
//! println!("{}", response.html.join("\n"));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! [`Configuration`] is serde-serializable, so it can be loaded from the same
//! JSON shape other favicon tools use:
//!
//! ```
//! use favicon_renderer::Configuration;
//!
//! let config = Configuration::from_json(r##"{
//!     "appName": "My App",
//!     "background": "#336699",
//!     "icons": { "android": { "offset": 10 }, "coast": false }
//! }"##).unwrap();
//! assert_eq!(config.app_name.as_deref(), Some("My App"));
//! ```
//!
//! # Pluggable capabilities
//!
//! Rasterization, image coding and document serialization go through the
//! [`Rasterizer`], [`ImageCodec`] and [`DocumentSerializer`] traits; see
//! [`FaviconGenerator`] for swapping them out.

mod config;
mod error;
mod icon;
mod pipeline;
mod source;

pub mod platform;
pub mod render;
pub mod template;

pub use config::{BackgroundSetting, Configuration, IconsSetting};
pub use error::{FaviconError, FaviconResult};
pub use icon::{IconSpec, SizePx};
pub use pipeline::{FaviconGenerator, FaviconResponse, OutputImage, favicons};
pub use platform::{Background, Platform, PlatformOption, PlatformOptions};
pub use render::{ImageCodec, ImageRsCodec, Rasterizer, ResvgRasterizer};
pub use source::{Source, SourceDescriptor, SourceFormat, SourceSize, Sourceset, normalize};
pub use template::{
    DocumentSerializer, ManifestTemplater, OutputFile, StandardSerializer, TemplateProperties,
    XmlNode,
};
