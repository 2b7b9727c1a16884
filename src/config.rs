//! Generation configuration.
//!
//! A [`Configuration`] carries the app metadata copied into manifests, the
//! base path used for absolute URLs, the global background color, and which
//! platforms to generate (with optional per-platform overrides).
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "path": "/static/icons",
//!   "appName": "Example",
//!   "background": "#336699",
//!   "theme_color": "#ffffff",
//!   "icons": {
//!     "android": { "background": true },
//!     "appleStartup": false,
//!     "firefox": { "mask": true, "offset": 10 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FaviconResult;
use crate::platform::{Background, Platform};

// ============================================================================
// Settings
// ============================================================================

/// A background given as a flag or as a color string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BackgroundSetting {
    Flag(bool),
    Color(String),
}

impl Default for BackgroundSetting {
    fn default() -> Self {
        Self::Color(DEFAULT_COLOR.into())
    }
}

/// Per-platform switch: `true`/`false`, or an object of option overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum IconsSetting {
    Enabled(bool),
    Options(Map<String, Value>),
}

const DEFAULT_COLOR: &str = "#fff";

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Configuration {
    /// Base path or URL that icon references are resolved against.
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,

    #[serde(rename = "shortName", alias = "appShortName", skip_serializing_if = "Option::is_none")]
    pub app_short_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_name: Option<String>,

    #[serde(rename = "developerURL", skip_serializing_if = "Option::is_none")]
    pub developer_url: Option<String>,

    /// Global background; replaces boolean per-platform backgrounds.
    pub background: BackgroundSetting,

    #[serde(rename = "theme_color")]
    pub theme_color: String,

    pub display: String,
    pub orientation: String,

    #[serde(rename = "start_url")]
    pub start_url: String,

    pub dir: String,
    pub lang: String,
    pub version: String,

    /// When set, all HTML fragments are also written to a file of this name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_file: Option<String>,

    /// Platforms missing from the map are generated with default options.
    pub icons: BTreeMap<Platform, IconsSetting>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            path: "/".into(),
            app_name: None,
            app_short_name: None,
            app_description: None,
            developer_name: None,
            developer_url: None,
            background: BackgroundSetting::default(),
            theme_color: DEFAULT_COLOR.into(),
            display: "standalone".into(),
            orientation: "any".into(),
            start_url: "/?homescreen=1".into(),
            dir: "auto".into(),
            lang: "en-US".into(),
            version: "1.0".into(),
            html_file: None,
            icons: BTreeMap::new(),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short name, falling back to the app name.
    pub fn short_name(&self) -> Option<&str> {
        self.app_short_name.as_deref().or(self.app_name.as_deref())
    }

    /// The global background as a resolved [`Background`].
    ///
    /// `false` means transparent and `true` the default white.
    pub fn global_background(&self) -> FaviconResult<Background> {
        match &self.background {
            BackgroundSetting::Flag(false) => Ok(Background::Transparent),
            BackgroundSetting::Flag(true) => Ok(Background::Color(DEFAULT_COLOR.into())),
            BackgroundSetting::Color(color) => Background::from_color(color),
        }
    }

    /// Enabled platforms in generation order, with their user overrides.
    pub fn enabled_platforms(&self) -> Vec<(Platform, Map<String, Value>)> {
        Platform::ALL
            .into_iter()
            .filter_map(|platform| match self.icons.get(&platform) {
                None | Some(IconsSetting::Enabled(true)) => Some((platform, Map::new())),
                Some(IconsSetting::Enabled(false)) => None,
                Some(IconsSetting::Options(options)) => Some((platform, options.clone())),
            })
            .collect()
    }

    /// Enables only the given platforms.
    pub fn with_platforms(mut self, platforms: &[Platform]) -> Self {
        for platform in Platform::ALL {
            self.icons
                .insert(platform, IconsSetting::Enabled(platforms.contains(&platform)));
        }
        self
    }

    /// Sets the overrides for one platform, enabling it.
    pub fn with_platform_options(mut self, platform: Platform, options: Map<String, Value>) -> Self {
        self.icons.insert(platform, IconsSetting::Options(options));
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Configuration::from_json("{}").unwrap();
        assert_eq!(config, Configuration::default());
        assert_eq!(config.path, "/");
        assert_eq!(config.enabled_platforms().len(), Platform::ALL.len());
    }

    #[test]
    fn field_names_follow_web_manifest_conventions() {
        let config = Configuration::from_json(
            r##"{
                "appName": "App",
                "shortName": "A",
                "developerURL": "https://dev.example",
                "theme_color": "#000",
                "start_url": "/start",
                "background": false
            }"##,
        )
        .unwrap();

        assert_eq!(config.app_name.as_deref(), Some("App"));
        assert_eq!(config.short_name(), Some("A"));
        assert_eq!(config.developer_url.as_deref(), Some("https://dev.example"));
        assert_eq!(config.theme_color, "#000");
        assert_eq!(config.start_url, "/start");
        assert_eq!(config.global_background().unwrap(), Background::Transparent);

        let json = config.to_json().unwrap();
        assert!(json.contains("\"developerURL\""));
        assert!(json.contains("\"theme_color\""));
    }

    #[test]
    fn app_short_name_alias_is_accepted() {
        let config = Configuration::from_json(r#"{ "appShortName": "S" }"#).unwrap();
        assert_eq!(config.short_name(), Some("S"));
    }

    #[test]
    fn icons_map_selects_platforms() {
        let config = Configuration::from_json(
            r#"{ "icons": { "appleStartup": false, "firefox": { "mask": true } } }"#,
        )
        .unwrap();
        let enabled = config.enabled_platforms();

        assert!(enabled.iter().all(|(p, _)| *p != Platform::AppleStartup));
        let (_, firefox) = enabled.iter().find(|(p, _)| *p == Platform::Firefox).unwrap();
        assert_eq!(firefox.get("mask"), Some(&json!(true)));
    }

    #[test]
    fn unknown_platform_is_a_parse_error() {
        assert!(Configuration::from_json(r#"{ "icons": { "palm": true } }"#).is_err());
    }

    #[test]
    fn with_platforms_disables_the_rest() {
        let config = Configuration::new().with_platforms(&[Platform::Favicons]);
        let enabled: Vec<_> = config.enabled_platforms().into_iter().map(|(p, _)| p).collect();
        assert_eq!(enabled, vec![Platform::Favicons]);
    }

    #[test]
    fn global_background_flags() {
        let mut config = Configuration::new();
        config.background = BackgroundSetting::Flag(true);
        assert_eq!(
            config.global_background().unwrap(),
            Background::Color("#fff".into())
        );
        config.background = BackgroundSetting::Color("not-a-color".into());
        assert!(config.global_background().is_err());
    }
}
