//! HTML fragment parsing and rewriting.
//!
//! Platform HTML is a list of single-tag fragments such as
//! `<link rel="icon" href="favicon.ico">`. Only the first tag of a fragment is
//! read; its attributes are parsed with HTML rules so void elements and
//! valueless attributes are accepted.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use super::ManifestTemplater;
use crate::error::{FaviconError, FaviconResult};

/// Meta tags whose empty `content` is filled with the app name.
const APP_NAME_METAS: &[&str] = &["application-name", "apple-mobile-web-app-title"];

/// The first tag of an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFragment {
    pub name: String,
    attrs: Vec<(String, String)>,
}

impl HtmlFragment {
    pub fn parse(fragment: &str) -> FaviconResult<Self> {
        let mut reader = Reader::from_str(fragment);
        loop {
            match reader.read_event() {
                Ok(Event::Start(tag)) | Ok(Event::Empty(tag)) => return Self::from_tag(&tag),
                Ok(Event::Eof) => {
                    return Err(FaviconError::serialize(format!(
                        "no tag found in HTML fragment `{fragment}`"
                    )));
                }
                Ok(_) => {}
                Err(e) => {
                    return Err(FaviconError::serialize(format!(
                        "malformed HTML fragment `{fragment}`: {e}"
                    )));
                }
            }
        }
    }

    fn from_tag(tag: &BytesStart<'_>) -> FaviconResult<Self> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in tag.html_attributes() {
            let attr = attr.map_err(|e| FaviconError::serialize(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| FaviconError::serialize(e.to_string()))?
                .into_owned();
            attrs.push((key, value));
        }
        Ok(Self { name, attrs })
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    /// Writes the tag back as an opening tag with quoted attributes.
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.name);
        for (key, value) in &self.attrs {
            html.push_str(&format!(" {}=\"{}\"", key, escape(value.as_str())));
        }
        html.push('>');
        html
    }
}

impl ManifestTemplater<'_> {
    /// Rewrites the relevant attribute of an HTML fragment.
    ///
    /// `link` tags carry their reference in `href`, everything else in
    /// `content`. File names become absolute URLs, `#` placeholders become the
    /// theme color (`theme-color`) or the background, and empty app-name metas
    /// get the configured name.
    pub fn rewrite_html(&self, fragment: &str) -> FaviconResult<String> {
        let mut tag = HtmlFragment::parse(fragment)?;
        let attribute = if tag.name.eq_ignore_ascii_case("link") {
            "href"
        } else {
            "content"
        };
        let Some(value) = tag.attr(attribute).map(str::to_owned) else {
            return Ok(tag.to_html());
        };
        let meta_name = tag.attr("name").unwrap_or_default().to_owned();
        let config = self.config();

        let replacement = if Path::new(&value).extension().is_some() {
            Some(self.absolute(&value))
        } else if value.starts_with('#') {
            if meta_name == "theme-color" {
                Some(config.theme_color.clone())
            } else {
                Some(self.background().as_str().to_string())
            }
        } else if value.is_empty() && APP_NAME_METAS.contains(&meta_name.as_str()) {
            if meta_name == "apple-mobile-web-app-title" {
                config.short_name().map(str::to_owned)
            } else {
                config.app_name.clone()
            }
        } else {
            None
        };

        if let Some(replacement) = replacement {
            tag.set_attr(attribute, replacement);
        }
        Ok(tag.to_html())
    }
}
