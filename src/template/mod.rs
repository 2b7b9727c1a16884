//! Manifest and config file templating.
//!
//! [`ManifestTemplater`] takes a platform's template properties, copies the
//! configured app metadata into them, rewrites relative icon references into
//! absolute URLs and serializes the result. Which rewrite applies, and which
//! format is written, depends on the file name.

pub mod html;
pub mod xml;

use serde_json::{Map, Value};

pub use xml::XmlNode;

use crate::config::Configuration;
use crate::error::{FaviconError, FaviconResult};
use crate::platform::Background;

// ============================================================================
// Template data
// ============================================================================

/// The template-shaped contents of a non-image output file.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateProperties {
    Json(Value),
    Xml(XmlNode),
    /// HTML fragments, one per line.
    Lines(Vec<String>),
    Text(String),
}

/// A named text output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// File name relative to the configured path.
    pub name: String,
    /// Serialized document text.
    pub contents: String,
}

// ============================================================================
// DocumentSerializer
// ============================================================================

/// Writes structured documents to text.
pub trait DocumentSerializer: Send + Sync {
    fn json(&self, value: &Value) -> FaviconResult<String>;
    fn xml(&self, root: &XmlNode) -> FaviconResult<String>;
}

/// Pretty-printed JSON (two-space indent) and indented XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSerializer;

impl DocumentSerializer for StandardSerializer {
    fn json(&self, value: &Value) -> FaviconResult<String> {
        serde_json::to_string_pretty(value).map_err(|e| FaviconError::serialize(e.to_string()))
    }

    fn xml(&self, root: &XmlNode) -> FaviconResult<String> {
        root.to_xml()
    }
}

// ============================================================================
// ManifestTemplater
// ============================================================================

pub struct ManifestTemplater<'a> {
    config: &'a Configuration,
    background: Background,
    serializer: &'a dyn DocumentSerializer,
}

impl<'a> ManifestTemplater<'a> {
    /// Fails if the configured background is not a valid color.
    pub fn new(
        config: &'a Configuration,
        serializer: &'a dyn DocumentSerializer,
    ) -> FaviconResult<Self> {
        Ok(Self {
            config,
            background: config.global_background()?,
            serializer,
        })
    }

    pub fn config(&self) -> &Configuration {
        self.config
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Resolves a relative file name against the configured base path.
    pub fn absolute(&self, relative: &str) -> String {
        absolute_url(&self.config.path, relative)
    }

    /// Produces the final body of `name` from its template properties.
    ///
    /// Unrecognized names are serialized unmodified.
    pub fn template(&self, name: &str, properties: TemplateProperties) -> FaviconResult<OutputFile> {
        let properties = match (name, properties) {
            ("manifest.json", TemplateProperties::Json(value)) => {
                TemplateProperties::Json(self.web_app_manifest(value)?)
            }
            ("manifest.webapp", TemplateProperties::Json(value)) => {
                TemplateProperties::Json(self.firefox_manifest(value)?)
            }
            ("browserconfig.xml", TemplateProperties::Xml(root)) => {
                TemplateProperties::Xml(self.browserconfig(root)?)
            }
            ("yandex-browser-manifest.json", TemplateProperties::Json(value)) => {
                TemplateProperties::Json(self.yandex_manifest(value)?)
            }
            (_, properties) => properties,
        };

        let contents = match properties {
            TemplateProperties::Json(value) => self.serializer.json(&value)?,
            TemplateProperties::Xml(root) => self.serializer.xml(&root)?,
            TemplateProperties::Lines(lines) => lines.join("\n"),
            TemplateProperties::Text(text) => text,
        };

        tracing::debug!(file = name, bytes = contents.len(), "templated file");
        Ok(OutputFile {
            name: name.to_string(),
            contents,
        })
    }

    fn web_app_manifest(&self, mut value: Value) -> FaviconResult<Value> {
        let config = self.config;
        let manifest = object_mut(&mut value, "manifest.json")?;

        set_optional(manifest, "name", config.app_name.as_deref());
        set_optional(manifest, "short_name", config.short_name());
        set_optional(manifest, "description", config.app_description.as_deref());
        manifest.insert("dir".into(), config.dir.clone().into());
        manifest.insert("lang".into(), config.lang.clone().into());
        manifest.insert("display".into(), config.display.clone().into());
        manifest.insert("orientation".into(), config.orientation.clone().into());
        manifest.insert("start_url".into(), config.start_url.clone().into());
        manifest.insert("background_color".into(), self.background.as_str().into());
        manifest.insert("theme_color".into(), config.theme_color.clone().into());

        if let Some(icons) = manifest.get_mut("icons").and_then(Value::as_array_mut) {
            for icon in icons {
                if let Some(src) = icon.get("src").and_then(Value::as_str).map(|s| self.absolute(s)) {
                    icon["src"] = Value::String(src);
                }
            }
        }
        Ok(value)
    }

    fn firefox_manifest(&self, mut value: Value) -> FaviconResult<Value> {
        let config = self.config;
        let manifest = object_mut(&mut value, "manifest.webapp")?;

        manifest.insert("version".into(), config.version.clone().into());
        set_optional(manifest, "name", config.app_name.as_deref());
        set_optional(manifest, "description", config.app_description.as_deref());

        let developer = manifest
            .entry("developer")
            .or_insert_with(|| Value::Object(Map::new()));
        let developer = object_mut(developer, "manifest.webapp developer")?;
        set_optional(developer, "name", config.developer_name.as_deref());
        set_optional(developer, "url", config.developer_url.as_deref());

        if let Some(icons) = manifest.get_mut("icons").and_then(Value::as_object_mut) {
            for icon in icons.values_mut() {
                if let Some(src) = icon.as_str().map(|s| self.absolute(s)) {
                    *icon = Value::String(src);
                }
            }
        }
        Ok(value)
    }

    fn browserconfig(&self, mut root: XmlNode) -> FaviconResult<XmlNode> {
        let tile = root
            .child_mut("msapplication")
            .and_then(|node| node.child_mut("tile"))
            .ok_or_else(|| {
                FaviconError::serialize("browserconfig.xml template has no msapplication/tile node")
            })?;

        for node in &mut tile.children {
            if node.name == "TileColor" {
                node.text = Some(self.background.as_str().to_string());
            } else if let Some(src) = node.attr("src").map(|s| self.absolute(s)) {
                node.set_attr("src", src);
            }
        }
        Ok(root)
    }

    fn yandex_manifest(&self, mut value: Value) -> FaviconResult<Value> {
        let manifest = object_mut(&mut value, "yandex-browser-manifest.json")?;
        manifest.insert("version".into(), self.config.version.clone().into());
        manifest.insert("api_version".into(), Value::from(1));

        let layout = manifest
            .entry("layout")
            .or_insert_with(|| Value::Object(Map::new()));
        let layout = object_mut(layout, "yandex-browser-manifest.json layout")?;
        if let Some(logo) = layout.get("logo").and_then(Value::as_str).map(|s| self.absolute(s)) {
            layout.insert("logo".into(), Value::String(logo));
        }
        layout.insert("color".into(), self.background.as_str().into());
        Ok(value)
    }
}

fn object_mut<'v>(value: &'v mut Value, what: &str) -> FaviconResult<&'v mut Map<String, Value>> {
    value
        .as_object_mut()
        .ok_or_else(|| FaviconError::serialize(format!("{what} template must be a JSON object")))
}

/// Sets `key` when a value is configured, removes it otherwise.
fn set_optional(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    match value {
        Some(value) => {
            map.insert(key.to_string(), Value::from(value));
        }
        None => {
            map.remove(key);
        }
    }
}

/// Joins `relative` onto `base` with exactly one `/` between them.
pub fn absolute_url(base: &str, relative: &str) -> String {
    let relative = relative.trim_start_matches("./").trim_start_matches('/');
    if base.is_empty() {
        return relative.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), relative)
}
