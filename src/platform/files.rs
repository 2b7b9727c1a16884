//! Companion files and HTML fragments emitted for each platform.
//!
//! Templates reference icons by their relative file name; the
//! [`ManifestTemplater`](crate::template::ManifestTemplater) fills in app
//! metadata and turns those names into absolute URLs.

use serde_json::{Map, Value, json};

use super::Platform;
use super::icons::{self, SlotKind};
use crate::template::{TemplateProperties, XmlNode};

/// A named file template for a platform.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTemplate {
    /// Output file name; also selects the templater rewrite.
    pub name: &'static str,
    /// Document body before app metadata is filled in.
    pub properties: TemplateProperties,
}

/// File templates generated for `platform`.
pub fn templates(platform: Platform) -> Vec<FileTemplate> {
    match platform {
        Platform::Android => vec![FileTemplate {
            name: "manifest.json",
            properties: TemplateProperties::Json(android_manifest()),
        }],
        Platform::Firefox => vec![FileTemplate {
            name: "manifest.webapp",
            properties: TemplateProperties::Json(firefox_manifest()),
        }],
        Platform::Windows => vec![FileTemplate {
            name: "browserconfig.xml",
            properties: TemplateProperties::Xml(browserconfig()),
        }],
        Platform::Yandex => vec![FileTemplate {
            name: "yandex-browser-manifest.json",
            properties: TemplateProperties::Json(yandex_manifest()),
        }],
        _ => Vec::new(),
    }
}

fn android_manifest() -> Value {
    let icons: Vec<Value> = icons::slots(Platform::Android)
        .iter()
        .filter_map(|slot| match slot.kind {
            SlotKind::Png(props) => Some(json!({
                "src": slot.name,
                "sizes": format!("{}x{}", props.width, props.height),
                "type": "image/png",
            })),
            SlotKind::Ico { .. } => None,
        })
        .collect();

    json!({
        "name": "",
        "short_name": "",
        "description": "",
        "dir": "auto",
        "lang": "en-US",
        "display": "standalone",
        "orientation": "any",
        "start_url": "/",
        "background_color": "#fff",
        "theme_color": "#fff",
        "icons": icons,
    })
}

fn firefox_manifest() -> Value {
    let mut icons = Map::new();
    for slot in icons::slots(Platform::Firefox) {
        if let SlotKind::Png(props) = slot.kind {
            icons.insert(props.width.to_string(), Value::from(slot.name));
        }
    }

    json!({
        "version": "1.0",
        "name": "",
        "description": "",
        "icons": icons,
        "developer": {
            "name": "",
            "url": "",
        },
    })
}

fn browserconfig() -> XmlNode {
    let tile = XmlNode::new("tile")
        .with_child(XmlNode::new("square70x70logo").with_attr("src", "mstile-70x70.png"))
        .with_child(XmlNode::new("square150x150logo").with_attr("src", "mstile-150x150.png"))
        .with_child(XmlNode::new("wide310x150logo").with_attr("src", "mstile-310x150.png"))
        .with_child(XmlNode::new("square310x310logo").with_attr("src", "mstile-310x310.png"))
        .with_child(XmlNode::new("TileColor").with_text("#fff"));

    XmlNode::new("browserconfig").with_child(XmlNode::new("msapplication").with_child(tile))
}

fn yandex_manifest() -> Value {
    json!({
        "version": "1.0",
        "api_version": 1,
        "layout": {
            "logo": "yandex-browser-50x50.png",
            "color": "#fff",
        },
    })
}

/// HTML fragments for `platform`, one tag per entry.
///
/// Attribute values that name a file are rewritten to absolute URLs, values
/// starting with `#` become the configured colors, and empty app-name metas
/// are filled in (see [`crate::template::html`]).
pub fn html(platform: Platform) -> Vec<String> {
    match platform {
        Platform::Android => vec![
            r#"<link rel="manifest" href="manifest.json">"#.into(),
            r#"<meta name="mobile-web-app-capable" content="yes">"#.into(),
            r##"<meta name="theme-color" content="#fff">"##.into(),
            r#"<meta name="application-name" content="">"#.into(),
        ],
        Platform::AppleIcon => {
            let mut lines: Vec<String> = icons::slots(Platform::AppleIcon)
                .iter()
                .filter(|slot| slot.name.contains('x'))
                .filter_map(|slot| match slot.kind {
                    SlotKind::Png(props) => Some(format!(
                        r#"<link rel="apple-touch-icon" sizes="{}x{}" href="{}">"#,
                        props.width, props.height, slot.name
                    )),
                    SlotKind::Ico { .. } => None,
                })
                .collect();
            lines.push(r#"<meta name="apple-mobile-web-app-capable" content="yes">"#.into());
            lines.push(
                r#"<meta name="apple-mobile-web-app-status-bar-style" content="black-translucent">"#
                    .into(),
            );
            lines.push(r#"<meta name="apple-mobile-web-app-title" content="">"#.into());
            lines
        }
        Platform::AppleStartup => icons::slots(Platform::AppleStartup)
            .iter()
            .filter_map(|slot| match slot.kind {
                SlotKind::Png(props) => Some(format!(
                    r#"<link rel="apple-touch-startup-image" media="(device-width: {}px) and (orientation: {})" href="{}">"#,
                    props.width,
                    if props.rotate { "landscape" } else { "portrait" },
                    slot.name
                )),
                SlotKind::Ico { .. } => None,
            })
            .collect(),
        Platform::Coast => vec![
            r#"<link rel="icon" type="image/png" sizes="228x228" href="coast-228x228.png">"#.into(),
        ],
        Platform::Favicons => vec![
            r#"<link rel="shortcut icon" href="favicon.ico">"#.into(),
            r#"<link rel="icon" type="image/png" sizes="16x16" href="favicon-16x16.png">"#.into(),
            r#"<link rel="icon" type="image/png" sizes="32x32" href="favicon-32x32.png">"#.into(),
        ],
        Platform::Firefox => Vec::new(),
        Platform::Windows => vec![
            r##"<meta name="msapplication-TileColor" content="#fff">"##.into(),
            r#"<meta name="msapplication-TileImage" content="mstile-144x144.png">"#.into(),
            r#"<meta name="msapplication-config" content="browserconfig.xml">"#.into(),
        ],
        Platform::Yandex => vec![
            r#"<link rel="yandex-tableau-widget" href="yandex-browser-manifest.json">"#.into(),
        ],
    }
}
